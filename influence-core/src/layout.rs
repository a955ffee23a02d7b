//! Seeded force-directed (Fruchterman-Reingold) layout.
//!
//! Positions start uniformly random in the unit square from a seeded
//! `StdRng`, then every node is pushed away from every other node
//! (`k^2 / d`) and pulled toward its neighbors (`w * d^2 / k`). Step length
//! is capped by a temperature that cools linearly to zero. The result is
//! centered on the origin and scaled so the largest coordinate is 1.

use crate::config::LayoutConfig;
use crate::graph::InfluenceGraph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Distances below this are clipped to keep repulsion finite.
const MIN_DISTANCE: f64 = 0.01;

/// Stop early once the mean node step falls below this.
const CONVERGENCE_THRESHOLD: f64 = 1e-4;

/// Node positions, indexed like the graph's nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub positions: Vec<[f64; 2]>,
}

impl Layout {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Lay out `graph`. Same graph and same config give identical positions.
pub fn spring_layout(graph: &InfluenceGraph, config: &LayoutConfig) -> Layout {
    let n = graph.node_count();
    match n {
        0 => return Layout { positions: Vec::new() },
        1 => return Layout { positions: vec![[0.0, 0.0]] },
        _ => {}
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<[f64; 2]> = (0..n).map(|_| [rng.gen::<f64>(), rng.gen::<f64>()]).collect();

    // Dense weighted adjacency; a few dozen nodes at most
    let mut adjacency = vec![0.0; n * n];
    for (i, j, w) in graph.edges() {
        adjacency[i * n + j] = w;
        adjacency[j * n + i] = w;
    }

    let k = config.k;
    let mut temperature = extent(&pos) * 0.1;
    let cooling = temperature / (config.iterations as f64 + 1.0);

    for _ in 0..config.iterations {
        let mut step_norm_sq = 0.0;
        let mut next = pos.clone();

        for i in 0..n {
            let mut disp = [0.0, 0.0];
            for j in 0..n {
                if i == j {
                    continue;
                }
                let delta = [pos[i][0] - pos[j][0], pos[i][1] - pos[j][1]];
                let dist = (delta[0] * delta[0] + delta[1] * delta[1])
                    .sqrt()
                    .max(MIN_DISTANCE);
                let force = k * k / (dist * dist) - adjacency[i * n + j] * dist / k;
                disp[0] += delta[0] * force;
                disp[1] += delta[1] * force;
            }

            let mut length = (disp[0] * disp[0] + disp[1] * disp[1]).sqrt();
            if length < MIN_DISTANCE {
                length = 0.1;
            }
            let step = [disp[0] * temperature / length, disp[1] * temperature / length];
            next[i][0] += step[0];
            next[i][1] += step[1];
            step_norm_sq += step[0] * step[0] + step[1] * step[1];
        }

        pos = next;
        temperature -= cooling;

        if step_norm_sq.sqrt() / (n as f64) < CONVERGENCE_THRESHOLD {
            break;
        }
    }

    Layout {
        positions: rescale(pos),
    }
}

/// Largest side of the bounding box.
fn extent(pos: &[[f64; 2]]) -> f64 {
    let span = |axis: usize| {
        let (lo, hi) = pos.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p[axis]), hi.max(p[axis]))
        });
        hi - lo
    };
    span(0).max(span(1))
}

/// Center on the mean and scale the largest absolute coordinate to 1.
fn rescale(mut pos: Vec<[f64; 2]>) -> Vec<[f64; 2]> {
    let n = pos.len() as f64;
    for axis in 0..2 {
        let mean = pos.iter().map(|p| p[axis]).sum::<f64>() / n;
        for p in pos.iter_mut() {
            p[axis] -= mean;
        }
    }

    let lim = pos
        .iter()
        .flat_map(|p| [p[0].abs(), p[1].abs()])
        .fold(0.0, f64::max);
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p[0] /= lim;
            p[1] /= lim;
        }
    }
    pos
}
