use serde::Serialize;

use crate::enrichment::Term;

use super::error::NetworkError;
use super::similarity::similarity_matrix;

/// Undirected similarity edge, stored once with `from < to`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub similarity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TermGraph {
    node_count: usize,
    edges: Vec<Edge>,
    neighbors: Vec<Vec<(usize, f64)>>,
}

impl TermGraph {
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Neighbors of `index`, most similar first.
    pub fn neighbors(&self, index: usize) -> &[(usize, f64)] {
        self.neighbors
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn degree(&self, index: usize) -> usize {
        self.neighbors(index).len()
    }
}

/// Connects every pair of terms whose name similarity reaches `threshold`.
pub fn build_graph(terms: &[Term], threshold: f64) -> Result<TermGraph, NetworkError> {
    let term_count = terms.len();
    if term_count < 2 {
        return Err(NetworkError::InsufficientTerms { term_count });
    }
    if !(0.0..=1.0).contains(&threshold) {
        return Err(NetworkError::InvalidThreshold { threshold });
    }

    let edges = similarity_matrix(terms, threshold)
        .iter()
        .map(|(from, to, similarity)| Edge {
            from,
            to,
            similarity,
        })
        .collect::<Vec<_>>();

    if edges.is_empty() {
        return Err(NetworkError::NoEdgesAboveThreshold {
            threshold,
            term_count,
        });
    }

    let mut neighbors = vec![Vec::new(); term_count];
    for edge in &edges {
        neighbors[edge.from].push((edge.to, edge.similarity));
        neighbors[edge.to].push((edge.from, edge.similarity));
    }
    for list in &mut neighbors {
        list.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    }

    Ok(TermGraph {
        node_count: term_count,
        edges,
        neighbors,
    })
}
