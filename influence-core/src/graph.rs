//! The influence graph: symbols joined by above-threshold correlation.

use crate::correlation::CorrelationMatrix;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Undirected weighted graph over the retained symbols.
///
/// Node `i` is symbol `i` of the correlation matrix it was built from, so
/// dense per-node vectors (centrality, layout) index the same way. Never
/// mutated after `build`.
#[derive(Debug, Clone)]
pub struct InfluenceGraph {
    graph: UnGraph<String, f64>,
    symbol_to_node: HashMap<String, NodeIndex>,
}

impl InfluenceGraph {
    /// One node per symbol; an edge for every unordered pair whose
    /// correlation is strictly above `threshold`, weighted by it.
    ///
    /// Both orientations of each pair are tested; the undirected graph keeps
    /// a single edge, so evaluation order cannot change the result.
    pub fn build(corr: &CorrelationMatrix, threshold: f64) -> Self {
        let mut graph = UnGraph::with_capacity(corr.len(), corr.len() * 4);
        let mut symbol_to_node = HashMap::with_capacity(corr.len());

        for symbol in corr.symbols() {
            let idx = graph.add_node(symbol.clone());
            symbol_to_node.insert(symbol.clone(), idx);
        }

        for i in 0..corr.len() {
            for j in 0..corr.len() {
                if i == j || corr.get(i, j) <= threshold {
                    continue;
                }
                let (a, b) = (NodeIndex::new(i), NodeIndex::new(j));
                if graph.find_edge(a, b).is_none() {
                    graph.add_edge(a, b, corr.get(i, j));
                }
            }
        }

        Self {
            graph,
            symbol_to_node,
        }
    }

    /// Graph from an explicit edge list `(i, j, weight)` over `symbols`.
    ///
    /// Self-loops and repeated pairs are ignored, matching `build`.
    pub fn from_edges(symbols: &[&str], edges: &[(usize, usize, f64)]) -> Self {
        let mut graph = UnGraph::with_capacity(symbols.len(), edges.len());
        let mut symbol_to_node = HashMap::with_capacity(symbols.len());

        for symbol in symbols {
            let idx = graph.add_node(symbol.to_string());
            symbol_to_node.insert(symbol.to_string(), idx);
        }
        for &(i, j, weight) in edges {
            let (a, b) = (NodeIndex::new(i), NodeIndex::new(j));
            if i != j && graph.find_edge(a, b).is_none() {
                graph.add_edge(a, b, weight);
            }
        }

        Self {
            graph,
            symbol_to_node,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Symbol of node `i`.
    pub fn symbol(&self, i: usize) -> &str {
        &self.graph[NodeIndex::new(i)]
    }

    /// All symbols in node order.
    pub fn symbols(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].as_str())
            .collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbol_to_node.contains_key(symbol)
    }

    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbol_to_node.get(symbol).map(|idx| idx.index())
    }

    /// Neighbors of node `i` with the weight of the connecting edge.
    pub fn weighted_neighbors(&self, i: usize) -> Vec<(usize, f64)> {
        let node = NodeIndex::new(i);
        self.graph
            .edges(node)
            .map(|e| {
                let other = if e.source() == node { e.target() } else { e.source() };
                (other.index(), *e.weight())
            })
            .collect()
    }

    /// Raw edge count of node `i`.
    pub fn degree_at(&self, i: usize) -> usize {
        self.graph.edges(NodeIndex::new(i)).count()
    }

    pub fn degree(&self, symbol: &str) -> usize {
        self.index_of(symbol).map_or(0, |i| self.degree_at(i))
    }

    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let a = self.symbol_to_node.get(a)?;
        let b = self.symbol_to_node.get(b)?;
        self.graph
            .find_edge(*a, *b)
            .and_then(|e| self.graph.edge_weight(e))
            .copied()
    }

    /// Every edge once, as `(i, j, weight)` with `i < j`.
    pub fn edges(&self) -> Vec<(usize, usize, f64)> {
        self.graph
            .edge_references()
            .map(|e| {
                let (a, b) = (e.source().index(), e.target().index());
                (a.min(b), a.max(b), *e.weight())
            })
            .collect()
    }

    /// Fraction of possible edges present.
    pub fn density(&self) -> f64 {
        let n = self.node_count() as f64;
        if n <= 1.0 {
            0.0
        } else {
            (2.0 * self.edge_count() as f64) / (n * (n - 1.0))
        }
    }
}
