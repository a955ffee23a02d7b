//! Influence Core: price acquisition, correlation graph, centrality ranking.
//!
//! Each stage is a pure function over the previous stage's artifact:
//! - `data`: providers (Yahoo Finance, CSV), alignment, missing-data policy
//! - `returns`: day-over-day fractional returns
//! - `correlation`: pairwise Pearson correlation matrix
//! - `graph`: threshold graph over the correlation matrix
//! - `centrality`: degree, closeness and weighted PageRank
//! - `ranking`: symbols ordered by PageRank
//! - `layout`: seeded force-directed node placement
//!
//! The driver that composes them lives in `influence-runner`.

pub mod centrality;
pub mod config;
pub mod correlation;
pub mod data;
pub mod error;
pub mod graph;
pub mod layout;
pub mod ranking;
pub mod returns;

pub use centrality::CentralityScores;
pub use config::{ConfigError, InfluenceConfig};
pub use correlation::CorrelationMatrix;
pub use error::AnalysisError;
pub use graph::InfluenceGraph;
pub use layout::{spring_layout, Layout};
pub use ranking::{InfluenceRanking, RankedSymbol};
pub use returns::{daily_returns, ReturnTable};
