//! Centrality measures over the influence graph.
//!
//! All three scores are dense vectors indexed by node (same order as
//! `InfluenceGraph::symbols`). Disconnected and empty graphs are handled by
//! the formulas themselves; nothing here special-cases them beyond N <= 1.

use crate::config::PageRankConfig;
use crate::error::AnalysisError;
use crate::graph::InfluenceGraph;
use std::collections::VecDeque;

/// Degree centrality: `degree / (N - 1)`. Zero when N <= 1.
pub fn degree_centrality(graph: &InfluenceGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![0.0; n];
    }
    let max_degree = (n - 1) as f64;
    (0..n)
        .map(|i| graph.degree_at(i) as f64 / max_degree)
        .collect()
}

/// Closeness centrality over unweighted hop distances.
///
/// A node reaching `r` nodes (itself included) with total distance `s`
/// scores `((r - 1) / s) * ((r - 1) / (N - 1))`: the inverse mean distance
/// over its own component, scaled down by the fraction of the graph it can
/// reach. Isolated nodes score 0.
pub fn closeness_centrality(graph: &InfluenceGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![0.0; n];
    }

    (0..n)
        .map(|source| {
            let distances = hop_distances(graph, source);
            let reached: Vec<usize> = distances.into_iter().flatten().collect();
            let total: usize = reached.iter().sum();
            let r = reached.len();

            if total == 0 {
                return 0.0;
            }
            let others = (r - 1) as f64;
            (others / total as f64) * (others / (n - 1) as f64)
        })
        .collect()
}

/// BFS hop distances from `source`; `None` for unreachable nodes.
fn hop_distances(graph: &InfluenceGraph, source: usize) -> Vec<Option<usize>> {
    let mut distances = vec![None; graph.node_count()];
    distances[source] = Some(0);

    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        let next = distances[current].map_or(0, |d| d + 1);
        for (neighbor, _) in graph.weighted_neighbors(current) {
            if distances[neighbor].is_none() {
                distances[neighbor] = Some(next);
                queue.push_back(neighbor);
            }
        }
    }

    distances
}

/// Weighted PageRank by power iteration.
///
/// Each undirected edge is walkable both ways, with transition probability
/// proportional to its weight. Teleportation is uniform, and the mass of
/// dangling (edgeless) nodes is spread uniformly as well, so the scores
/// always sum to 1. Converged when the L1 change between iterations drops
/// below `N * tolerance`.
pub fn pagerank(graph: &InfluenceGraph, config: &PageRankConfig) -> Result<Vec<f64>, AnalysisError> {
    let n = graph.node_count();
    if n == 0 {
        return Ok(Vec::new());
    }

    let alpha = config.damping;
    let uniform = 1.0 / n as f64;

    // Row-normalized transitions per node
    let transitions: Vec<Vec<(usize, f64)>> = (0..n)
        .map(|i| {
            let neighbors = graph.weighted_neighbors(i);
            let out_weight: f64 = neighbors.iter().map(|(_, w)| w).sum();
            neighbors
                .into_iter()
                .map(|(j, w)| (j, w / out_weight))
                .collect()
        })
        .collect();

    let mut x = vec![uniform; n];

    for _ in 0..config.max_iterations {
        let last = x;
        x = vec![0.0; n];

        let dangling_mass: f64 = (0..n)
            .filter(|&i| transitions[i].is_empty())
            .map(|i| last[i])
            .sum();

        for (i, row) in transitions.iter().enumerate() {
            for &(j, p) in row {
                x[j] += alpha * last[i] * p;
            }
        }
        for value in x.iter_mut() {
            *value += alpha * dangling_mass * uniform + (1.0 - alpha) * uniform;
        }

        let err: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if err < n as f64 * config.tolerance {
            return Ok(x);
        }
    }

    Err(AnalysisError::PageRankDidNotConverge {
        iterations: config.max_iterations,
    })
}

/// Per-node scores for one graph, computed once.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralityScores {
    pub symbols: Vec<String>,
    pub degree: Vec<usize>,
    pub degree_centrality: Vec<f64>,
    pub closeness: Vec<f64>,
    pub pagerank: Vec<f64>,
}

impl CentralityScores {
    pub fn compute(graph: &InfluenceGraph, config: &PageRankConfig) -> Result<Self, AnalysisError> {
        Ok(Self {
            symbols: graph.symbols().into_iter().map(String::from).collect(),
            degree: (0..graph.node_count()).map(|i| graph.degree_at(i)).collect(),
            degree_centrality: degree_centrality(graph),
            closeness: closeness_centrality(graph),
            pagerank: pagerank(graph, config)?,
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
