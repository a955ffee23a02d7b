//! Influence ranking: symbols ordered by PageRank.

use crate::centrality::CentralityScores;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One ranked symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSymbol {
    pub rank: usize,
    pub symbol: String,
    pub pagerank: f64,
    /// Raw edge count (not normalized).
    pub connections: usize,
    pub degree_centrality: f64,
    pub closeness: f64,
}

/// All symbols in descending PageRank order.
///
/// Equal PageRank scores are ordered by symbol, ascending, so the ranking is
/// a pure function of the scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceRanking {
    rows: Vec<RankedSymbol>,
}

impl InfluenceRanking {
    pub fn from_scores(scores: &CentralityScores) -> Self {
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores.pagerank[b]
                .partial_cmp(&scores.pagerank[a])
                .unwrap_or(Ordering::Equal)
                .then_with(|| scores.symbols[a].cmp(&scores.symbols[b]))
        });

        let rows = order
            .into_iter()
            .enumerate()
            .map(|(rank, i)| RankedSymbol {
                rank: rank + 1,
                symbol: scores.symbols[i].clone(),
                pagerank: scores.pagerank[i],
                connections: scores.degree[i],
                degree_centrality: scores.degree_centrality[i],
                closeness: scores.closeness[i],
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[RankedSymbol] {
        &self.rows
    }

    /// The first `n` rows (fewer if the ranking is shorter).
    pub fn top(&self, n: usize) -> &[RankedSymbol] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn top_symbols(&self, n: usize) -> Vec<&str> {
        self.top(n).iter().map(|r| r.symbol.as_str()).collect()
    }

    pub fn get(&self, symbol: &str) -> Option<&RankedSymbol> {
        self.rows.iter().find(|r| r.symbol == symbol)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
