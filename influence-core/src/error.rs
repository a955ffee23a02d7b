//! Errors raised by the analysis stages (returns, correlation, ranking).

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("no symbols left after applying the missing-data policy")]
    EmptyUniverse,

    #[error("need at least {needed} price rows to compute returns, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("correlation undefined for '{symbol}': its returns have zero variance")]
    UndefinedCorrelation { symbol: String },

    #[error("non-positive price {price} for '{symbol}' on row {row}")]
    NonPositivePrice { symbol: String, row: usize, price: f64 },

    #[error("pagerank did not converge within {iterations} iterations")]
    PageRankDidNotConverge { iterations: usize },
}
