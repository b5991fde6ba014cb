use std::f32::consts::TAU;

use clap::ValueEnum;
use eframe::egui::{Vec2, vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::graph::Edge;

pub const STAR_RADIUS: f32 = 0.8;

const DISTANCE_EPSILON: f32 = 0.01;
const REPULSION_STRENGTH: f32 = 0.1;
const ATTRACTION_STRENGTH: f32 = 0.01;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    Circle,
    Star,
    #[default]
    Force,
    /// Shares the force-directed simulation.
    #[value(name = "kamada_kawai", alias = "kamada-kawai")]
    #[serde(alias = "kamada-kawai")]
    KamadaKawai,
}

impl LayoutKind {
    pub const ALL: [Self; 4] = [Self::Circle, Self::Star, Self::Force, Self::KamadaKawai];

    pub fn label(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Star => "star",
            Self::Force => "force",
            Self::KamadaKawai => "kamada_kawai",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForceParams {
    pub iterations: usize,
    pub seed: u64,
}

pub fn compute_layout(
    kind: LayoutKind,
    node_count: usize,
    edges: &[Edge],
    force: ForceParams,
) -> Vec<Vec2> {
    match kind {
        LayoutKind::Circle => circle_layout(node_count),
        LayoutKind::Star => star_layout(node_count),
        LayoutKind::Force | LayoutKind::KamadaKawai => force_layout(node_count, edges, force),
    }
}

pub fn circle_layout(node_count: usize) -> Vec<Vec2> {
    (0..node_count)
        .map(|index| {
            let angle = TAU * index as f32 / node_count as f32;
            vec2(angle.cos(), angle.sin())
        })
        .collect()
}

pub fn star_layout(node_count: usize) -> Vec<Vec2> {
    if node_count == 0 {
        return Vec::new();
    }

    let spokes = node_count - 1;
    let mut positions = Vec::with_capacity(node_count);
    positions.push(Vec2::ZERO);
    for index in 1..node_count {
        let angle = TAU * (index - 1) as f32 / spokes as f32;
        positions.push(vec2(angle.cos(), angle.sin()) * STAR_RADIUS);
    }
    positions
}

/// Simplified Fruchterman-Reingold. Runs exactly `params.iterations` rounds
/// with no convergence check and no collision handling, so identical input
/// and seed always reproduce the same coordinates.
///
/// Each round: all-pairs repulsion `0.1/d²` from the round's starting
/// positions, then per-edge attraction `d²·0.01·similarity` applied in edge
/// order, then per-axis normalization to zero mean and unit variance.
pub fn force_layout(node_count: usize, edges: &[Edge], params: ForceParams) -> Vec<Vec2> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut positions = (0..node_count)
        .map(|_| {
            let x = rng.gen_range(-1.0_f32..=1.0);
            let y = rng.gen_range(-1.0_f32..=1.0);
            vec2(x, y)
        })
        .collect::<Vec<_>>();

    if node_count == 0 {
        return positions;
    }

    let mut displacement = vec![Vec2::ZERO; node_count];
    for _ in 0..params.iterations {
        displacement.fill(Vec2::ZERO);
        for i in 0..node_count {
            for j in 0..node_count {
                if i == j {
                    continue;
                }

                let delta = positions[i] - positions[j];
                let distance = delta.length() + DISTANCE_EPSILON;
                let force = REPULSION_STRENGTH / (distance * distance);
                displacement[i] += delta / distance * force;
            }
        }

        for (position, offset) in positions.iter_mut().zip(&displacement) {
            *position += *offset;
        }

        for edge in edges {
            if edge.from >= node_count || edge.to >= node_count || edge.from == edge.to {
                continue;
            }

            let delta = positions[edge.to] - positions[edge.from];
            let distance = delta.length() + DISTANCE_EPSILON;
            let pull = distance * distance * ATTRACTION_STRENGTH * edge.similarity as f32;
            let step = delta / distance * pull;

            positions[edge.from] += step;
            positions[edge.to] -= step;
        }

        normalize_axes(&mut positions);
    }

    positions
}

/// Re-centers x and y independently and scales each to unit population
/// variance. An axis with no spread is only re-centered.
fn normalize_axes(positions: &mut [Vec2]) {
    if positions.is_empty() {
        return;
    }

    let count = positions.len() as f32;
    let mean = positions
        .iter()
        .fold(Vec2::ZERO, |sum, position| sum + *position)
        / count;
    let variance = positions.iter().fold(Vec2::ZERO, |sum, position| {
        let offset = *position - mean;
        sum + vec2(offset.x * offset.x, offset.y * offset.y)
    }) / count;

    let scale_x = spread_divisor(variance.x);
    let scale_y = spread_divisor(variance.y);
    for position in positions {
        position.x = (position.x - mean.x) / scale_x;
        position.y = (position.y - mean.y) / scale_y;
    }
}

fn spread_divisor(variance: f32) -> f32 {
    let deviation = variance.sqrt();
    if deviation > f32::EPSILON { deviation } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: ForceParams = ForceParams {
        iterations: 50,
        seed: 42,
    };

    fn chain(node_count: usize) -> Vec<Edge> {
        (1..node_count)
            .map(|to| Edge {
                from: to - 1,
                to,
                similarity: 0.5,
            })
            .collect()
    }

    #[test]
    fn circle_points_sit_on_unit_circle() {
        for node_count in [1, 2, 5, 17] {
            for position in circle_layout(node_count) {
                assert!((position.length() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn circle_starts_at_zero_degrees() {
        let positions = circle_layout(4);
        assert!((positions[0] - vec2(1.0, 0.0)).length() < 1e-6);
        assert!((positions[1] - vec2(0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn star_has_hub_at_origin_and_ring_at_point_eight() {
        let positions = star_layout(6);
        assert_eq!(positions[0], Vec2::ZERO);
        for position in &positions[1..] {
            assert!((position.length() - STAR_RADIUS).abs() < 1e-5);
        }
    }

    #[test]
    fn star_with_single_node_does_not_divide_by_zero() {
        assert_eq!(star_layout(1), vec![Vec2::ZERO]);
        assert!(star_layout(0).is_empty());
    }

    #[test]
    fn force_layout_is_reproducible() {
        let edges = chain(12);
        let first = force_layout(12, &edges, PARAMS);
        let second = force_layout(12, &edges, PARAMS);
        assert_eq!(first, second);

        let reseeded = force_layout(12, &edges, ForceParams { seed: 7, ..PARAMS });
        assert_ne!(first, reseeded);
    }

    #[test]
    fn force_layout_output_is_standardized_per_axis() {
        let positions = force_layout(9, &chain(9), PARAMS);
        let count = positions.len() as f32;
        let mean = positions.iter().fold(Vec2::ZERO, |sum, p| sum + *p) / count;
        let variance_x = positions.iter().map(|p| (p.x - mean.x).powi(2)).sum::<f32>() / count;
        let variance_y = positions.iter().map(|p| (p.y - mean.y).powi(2)).sum::<f32>() / count;

        assert!(mean.length() < 1e-4);
        assert!((variance_x - 1.0).abs() < 1e-3);
        assert!((variance_y - 1.0).abs() < 1e-3);
        assert!(positions.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn zero_iterations_returns_seeded_square() {
        let positions = force_layout(5, &[], ForceParams { iterations: 0, seed: 3 });
        assert!(positions.iter().all(|p| p.x.abs() <= 1.0 && p.y.abs() <= 1.0));
    }

    #[test]
    fn force_layout_handles_tiny_graphs() {
        assert!(force_layout(0, &[], PARAMS).is_empty());
        let single = force_layout(1, &[], PARAMS);
        assert_eq!(single, vec![Vec2::ZERO]);
    }

    #[test]
    fn kamada_kawai_aliases_force() {
        let edges = chain(6);
        assert_eq!(
            compute_layout(LayoutKind::KamadaKawai, 6, &edges, PARAMS),
            compute_layout(LayoutKind::Force, 6, &edges, PARAMS)
        );
    }
}
