//! Force-directed node placement (Fruchterman-Reingold).
//!
//! Nodes repel each other with force `k²/d` and edges pull their endpoints
//! together with force `d²/k`, where `k = 1/sqrt(n)`. Each iteration moves a
//! node at most the current temperature, which cools linearly from a tenth
//! of the initial spread. Final positions are centred and scaled into
//! `[-1, 1]` on both axes.

use graphedexcel_common::constants::{DEFAULT_LAYOUT_SEED, LAYOUT_ITERATIONS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MIN_DISTANCE: f64 = 0.01;

/// A position in layout space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// Tuning of [`spring_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpringParams {
    /// Number of relaxation steps.
    pub iterations: usize,
    /// Seed of the random initial placement.
    pub seed: u64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            iterations: LAYOUT_ITERATIONS,
            seed: DEFAULT_LAYOUT_SEED,
        }
    }
}

/// Places `node_count` nodes connected by undirected `edges` (pairs of node
/// positions). Self-loops and out-of-range positions are ignored.
///
/// The result is deterministic for a given seed.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn spring_layout(node_count: usize, edges: &[(usize, usize)], params: SpringParams) -> Vec<Point> {
    match node_count {
        0 => return Vec::new(),
        1 => return vec![Point { x: 0.0, y: 0.0 }],
        _ => {}
    }

    let mut adjacency = vec![Vec::new(); node_count];
    for &(a, b) in edges {
        if a != b && a < node_count && b < node_count {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut pos: Vec<Point> = (0..node_count)
        .map(|_| Point {
            x: rng.gen_range(0.0..1.0),
            y: rng.gen_range(0.0..1.0),
        })
        .collect();

    let k = (1.0 / node_count as f64).sqrt();
    let mut temperature = spread(&pos) * 0.1;
    let cooling = temperature / (params.iterations as f64 + 1.0);

    let mut displacement = vec![Point { x: 0.0, y: 0.0 }; node_count];
    for _ in 0..params.iterations {
        for (i, disp) in displacement.iter_mut().enumerate() {
            let (mut dx_sum, mut dy_sum) = (0.0, 0.0);
            for (j, other) in pos.iter().enumerate() {
                if i == j {
                    continue;
                }
                let dx = pos[i].x - other.x;
                let dy = pos[i].y - other.y;
                let distance = dx.hypot(dy).max(MIN_DISTANCE);
                let repulsion = k * k / (distance * distance);
                dx_sum += dx * repulsion;
                dy_sum += dy * repulsion;
            }
            for &j in &adjacency[i] {
                let dx = pos[i].x - pos[j].x;
                let dy = pos[i].y - pos[j].y;
                let distance = dx.hypot(dy).max(MIN_DISTANCE);
                let attraction = distance / k;
                dx_sum -= dx * attraction;
                dy_sum -= dy * attraction;
            }
            *disp = Point { x: dx_sum, y: dy_sum };
        }

        for (p, d) in pos.iter_mut().zip(&displacement) {
            let length = d.x.hypot(d.y).max(MIN_DISTANCE);
            p.x += d.x * temperature / length;
            p.y += d.y * temperature / length;
        }
        temperature -= cooling;
    }

    rescale(&mut pos);
    pos
}

fn spread(pos: &[Point]) -> f64 {
    let (min_x, max_x) = bounds(pos.iter().map(|p| p.x));
    let (min_y, max_y) = bounds(pos.iter().map(|p| p.y));
    (max_x - min_x).max(max_y - min_y)
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Centres on the mean and scales so the largest coordinate magnitude is 1.
#[allow(clippy::cast_precision_loss)]
fn rescale(pos: &mut [Point]) {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p.y).sum::<f64>() / n;
    let mut limit: f64 = 0.0;
    for p in pos.iter_mut() {
        p.x -= mean_x;
        p.y -= mean_y;
        limit = limit.max(p.x.abs()).max(p.y.abs());
    }
    if limit > 0.0 {
        for p in pos.iter_mut() {
            p.x /= limit;
            p.y /= limit;
        }
    }
}
