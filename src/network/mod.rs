//! Term-similarity network: Jaccard scoring of term names, thresholded edges,
//! and 2D layouts handed to the plotting side as a [`NetworkScene`].

mod error;
mod graph;
mod layout;
mod scene;
mod similarity;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::enrichment::{NodeSizeBy, Term};

pub use error::{NetworkFailure, NetworkWarning};
pub use layout::LayoutKind;
pub use scene::NetworkScene;

use graph::build_graph;
use layout::{ForceParams, compute_layout};
use scene::SceneInputs;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.3;
pub const DEFAULT_MAX_TERMS: usize = 100;
pub const DEFAULT_ITERATIONS: usize = 50;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkParams {
    pub similarity_threshold: f64,
    pub layout: LayoutKind,
    pub node_size_by: NodeSizeBy,
    pub max_terms: usize,
    pub iterations: usize,
    pub seed: u64,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            layout: LayoutKind::default(),
            node_size_by: NodeSizeBy::default(),
            max_terms: DEFAULT_MAX_TERMS,
            iterations: DEFAULT_ITERATIONS,
            seed: DEFAULT_SEED,
        }
    }
}

/// Builds the similarity network for a ranked term set.
///
/// Inputs longer than `max_terms` are cut to their first `max_terms` entries
/// and a [`NetworkWarning::TermCountExceeded`] is raised. Degenerate inputs
/// fail with a [`NetworkFailure`] instead of producing an empty scene; the
/// warnings travel with the scene or with the failure.
pub fn build_network(
    terms: &[Term],
    params: &NetworkParams,
) -> Result<NetworkScene, NetworkFailure> {
    let mut warnings = Vec::new();
    let terms = if terms.len() > params.max_terms {
        let warning = NetworkWarning::TermCountExceeded {
            supplied: terms.len(),
            max_terms: params.max_terms,
        };
        warn!("{warning}");
        warnings.push(warning);
        &terms[..params.max_terms]
    } else {
        terms
    };

    let graph = match build_graph(terms, params.similarity_threshold) {
        Ok(graph) => graph,
        Err(error) => return Err(NetworkFailure { error, warnings }),
    };
    let positions = compute_layout(
        params.layout,
        graph.node_count(),
        graph.edges(),
        ForceParams {
            iterations: params.iterations,
            seed: params.seed,
        },
    );

    info!(
        nodes = graph.node_count(),
        edges = graph.edges().len(),
        layout = params.layout.label(),
        threshold = params.similarity_threshold,
        "built term network"
    );

    Ok(NetworkScene::assemble(SceneInputs {
        terms,
        graph,
        positions: &positions,
        layout: params.layout,
        node_size_by: params.node_size_by,
        similarity_threshold: params.similarity_threshold,
        warnings,
    }))
}

#[cfg(test)]
mod tests {
    use super::error::NetworkError;
    use super::*;
    use crate::enrichment::term::fixtures::{term, term_with};

    fn five_terms() -> Vec<Term> {
        [
            "cell adhesion",
            "cell migration",
            "cell proliferation",
            "adhesion molecule",
            "migration factor",
        ]
        .iter()
        .enumerate()
        .map(|(rank, name)| term(name, 0.0001 * (rank + 1) as f64))
        .collect()
    }

    #[test]
    fn circle_scenario_places_five_nodes_every_72_degrees() {
        let params = NetworkParams {
            similarity_threshold: 0.2,
            layout: LayoutKind::Circle,
            ..NetworkParams::default()
        };

        let scene = build_network(&five_terms(), &params).expect("network builds");

        assert!(!scene.edges.is_empty());
        assert!(scene.warnings.is_empty());
        assert_eq!(scene.nodes.len(), 5);
        for (index, node) in scene.nodes.iter().enumerate() {
            let angle = (72.0 * index as f32).to_radians();
            assert!((node.position[0] - angle.cos()).abs() < 1e-5);
            assert!((node.position[1] - angle.sin()).abs() < 1e-5);
        }
    }

    #[test]
    fn edges_carry_endpoint_positions_and_similarity() {
        let params = NetworkParams {
            similarity_threshold: 0.2,
            layout: LayoutKind::Star,
            ..NetworkParams::default()
        };
        let scene = build_network(&five_terms(), &params).expect("network builds");

        let adhesion_pair = scene
            .edges
            .iter()
            .find(|edge| edge.from == 0 && edge.to == 1)
            .expect("cell adhesion links to cell migration");
        assert!((adhesion_pair.weight - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(adhesion_pair.from_position, [0.0, 0.0]);
        assert_eq!(adhesion_pair.to_position, scene.nodes[1].position);
    }

    #[test]
    fn oversized_input_is_truncated_with_warning() {
        let terms = (0..150)
            .map(|index| term(&format!("term{index} signaling process"), 0.001))
            .collect::<Vec<_>>();

        let scene = build_network(&terms, &NetworkParams::default()).expect("network builds");

        assert_eq!(scene.nodes.len(), 100);
        assert_eq!(
            scene.warnings,
            vec![NetworkWarning::TermCountExceeded {
                supplied: 150,
                max_terms: 100,
            }]
        );
        assert_eq!(scene.nodes[99].term_name, "term99 signaling process");
        assert!(scene.edges.iter().all(|edge| edge.from < 100 && edge.to < 100));
    }

    #[test]
    fn degenerate_inputs_are_distinguished() {
        let single = build_network(&five_terms()[..1], &NetworkParams::default());
        assert_eq!(
            single.expect_err("one term"),
            NetworkFailure::from(NetworkError::InsufficientTerms { term_count: 1 })
        );

        let strict = NetworkParams {
            similarity_threshold: 0.99,
            ..NetworkParams::default()
        };
        assert_eq!(
            build_network(&five_terms(), &strict)
                .expect_err("no pair reaches 0.99")
                .error,
            NetworkError::NoEdgesAboveThreshold {
                threshold: 0.99,
                term_count: 5,
            }
        );
    }

    #[test]
    fn truncation_warning_survives_a_failed_build() {
        let terms = (0..150)
            .map(|index| term(&format!("unique{index}"), 0.001))
            .collect::<Vec<_>>();

        let failure =
            build_network(&terms, &NetworkParams::default()).expect_err("names share no tokens");

        assert_eq!(
            failure.error,
            NetworkError::NoEdgesAboveThreshold {
                threshold: 0.3,
                term_count: 100,
            }
        );
        assert_eq!(
            failure.warnings,
            vec![NetworkWarning::TermCountExceeded {
                supplied: 150,
                max_terms: 100,
            }]
        );
    }

    #[test]
    fn node_metrics_follow_size_selection() {
        let terms = vec![
            term_with("cell adhesion", 8, 4.0, 0.001),
            term_with("cell migration", 4, 2.0, 0.01),
        ];
        let params = NetworkParams {
            node_size_by: NodeSizeBy::FoldEnrichment,
            ..NetworkParams::default()
        };

        let scene = build_network(&terms, &params).expect("network builds");
        assert!((scene.nodes[0].size_metric - 2.0).abs() < 1e-12);
        assert!((scene.nodes[1].size_metric - 1.0).abs() < 1e-12);
        assert!((scene.nodes[0].color_metric - 3.0).abs() < 1e-12);
        assert_eq!(scene.size_range(), (1.0, 2.0));
    }

    #[test]
    fn force_scenes_are_reproducible() {
        let first = build_network(&five_terms(), &NetworkParams::default());
        let second = build_network(&five_terms(), &NetworkParams::default());
        let (first, second) = (first.expect("builds"), second.expect("builds"));
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.edges, second.edges);
    }

    #[test]
    fn default_params_match_documented_defaults() {
        let params = NetworkParams::default();
        assert_eq!(params.similarity_threshold, 0.3);
        assert_eq!(params.layout, LayoutKind::Force);
        assert_eq!(params.node_size_by, NodeSizeBy::Count);
        assert_eq!(params.max_terms, 100);
    }
}
