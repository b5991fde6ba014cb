use eframe::egui::{Vec2, vec2};
use serde::Serialize;

use crate::enrichment::{NodeSizeBy, Term};
use crate::util::value_range;

use super::error::NetworkWarning;
use super::graph::TermGraph;
use super::layout::LayoutKind;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneNode {
    pub index: usize,
    pub term_id: String,
    pub term_name: String,
    pub position: [f32; 2],
    /// Value selected by `node_size_by`.
    pub size_metric: f64,
    /// Always `-log10 p`.
    pub color_metric: f64,
}

impl SceneNode {
    pub fn world_pos(&self) -> Vec2 {
        vec2(self.position[0], self.position[1])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneEdge {
    pub from: usize,
    pub to: usize,
    pub from_position: [f32; 2],
    pub to_position: [f32; 2],
    pub weight: f64,
}

/// Geometry and display metrics handed to a plotting backend.
#[derive(Clone, Debug, Serialize)]
pub struct NetworkScene {
    pub layout: LayoutKind,
    pub node_size_by: NodeSizeBy,
    pub similarity_threshold: f64,
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
    pub warnings: Vec<NetworkWarning>,
    #[serde(skip)]
    pub graph: TermGraph,
}

pub(super) struct SceneInputs<'a> {
    pub(super) terms: &'a [Term],
    pub(super) graph: TermGraph,
    pub(super) positions: &'a [Vec2],
    pub(super) layout: LayoutKind,
    pub(super) node_size_by: NodeSizeBy,
    pub(super) similarity_threshold: f64,
    pub(super) warnings: Vec<NetworkWarning>,
}

impl NetworkScene {
    pub(super) fn assemble(inputs: SceneInputs<'_>) -> Self {
        let SceneInputs {
            terms,
            graph,
            positions,
            layout,
            node_size_by,
            similarity_threshold,
            warnings,
        } = inputs;

        let point = |index: usize| {
            let position = positions.get(index).copied().unwrap_or(Vec2::ZERO);
            [position.x, position.y]
        };

        let nodes = terms
            .iter()
            .take(graph.node_count())
            .enumerate()
            .map(|(index, term)| SceneNode {
                index,
                term_id: term.term_id.clone(),
                term_name: term.term_name.clone(),
                position: point(index),
                size_metric: term.size_metric(node_size_by),
                color_metric: term.neg_log10_p,
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| SceneEdge {
                from: edge.from,
                to: edge.to,
                from_position: point(edge.from),
                to_position: point(edge.to),
                weight: edge.similarity,
            })
            .collect();

        Self {
            layout,
            node_size_by,
            similarity_threshold,
            nodes,
            edges,
            warnings,
            graph,
        }
    }

    pub fn size_range(&self) -> (f64, f64) {
        value_range(self.nodes.iter().map(|node| node.size_metric)).unwrap_or((0.0, 1.0))
    }

    pub fn color_range(&self) -> (f64, f64) {
        value_range(self.nodes.iter().map(|node| node.color_metric)).unwrap_or((0.0, 1.0))
    }

    /// Largest absolute coordinate, never below 1.
    pub fn extent(&self) -> f32 {
        self.nodes
            .iter()
            .flat_map(|node| node.position)
            .fold(1.0_f32, |extent, value| extent.max(value.abs()))
    }

    pub fn node_index(&self, term_id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.term_id == term_id)
    }
}
