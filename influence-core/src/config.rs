//! Run configuration.
//!
//! Every tunable of the pipeline lives here with a documented default, so a
//! run with no config file reproduces the reference ranking. Sections are
//! consumed by exactly one stage each: `universe` by acquisition and
//! normalization, `graph` and `pagerank` by ranking, `layout` and
//! `presentation` by rendering.

use crate::data::normalize::{MissingDataPolicy, PriceField};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Top 20 and bottom 20 S&P 500 members by market cap.
pub const DEFAULT_SYMBOLS: [&str; 40] = [
    "AAPL", "MSFT", "NVDA", "AMZN", "GOOG", "GOOGL", "META", "PG", "TSLA", "AVGO", "LLY", "JPM",
    "WMT", "V", "XOM", "MA", "UNH", "NFLX", "ORCL", "COST", "HSIC", "MOS", "HAS", "FRT", "CRL",
    "MKTX", "GNRC", "HII", "MTCH", "ENPH", "PARA", "APA", "LW", "MHK", "IVZ", "BWA", "CE", "TFX",
    "CZR", "FMC",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full configuration of one ranking run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluenceConfig {
    pub universe: UniverseConfig,
    pub graph: GraphConfig,
    pub pagerank: PageRankConfig,
    pub layout: LayoutConfig,
    pub presentation: PresentationConfig,
}

/// Which symbols, which dates, and how gaps are treated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub symbols: Vec<String>,
    /// First date requested (inclusive).
    pub start_date: NaiveDate,
    /// Last date requested (inclusive).
    pub end_date: NaiveDate,
    pub price_field: PriceField,
    pub missing_data: MissingDataPolicy,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
            price_field: PriceField::AdjustedClose,
            missing_data: MissingDataPolicy::DropColumn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// An edge exists iff correlation is strictly greater than this.
    pub threshold: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { threshold: 0.40 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRankConfig {
    /// Probability of following an edge rather than teleporting.
    pub damping: f64,
    /// Per-node L1 convergence tolerance.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1.0e-6,
            max_iterations: 100,
        }
    }
}

/// Force-directed layout parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub seed: u64,
    /// Optimal distance between nodes.
    pub k: f64,
    pub iterations: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: 20,
            k: 1.2,
            iterations: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Rows printed in the ranked table.
    pub top_n: usize,
    /// Nodes highlighted in the picture.
    pub highlight_top: usize,
    /// Node area in square points per unit of PageRank.
    pub node_size_scale: f64,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            highlight_top: 3,
            node_size_scale: 6000.0,
            title: "S&P 500 Stock Influence".to_string(),
            width: 1000,
            height: 1000,
        }
    }
}

impl InfluenceConfig {
    /// Load a config from a TOML file. Missing sections take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values no stage can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let u = &self.universe;
        if u.symbols.is_empty() {
            return Err(ConfigError::Invalid("universe.symbols is empty".into()));
        }
        if u.start_date > u.end_date {
            return Err(ConfigError::Invalid(format!(
                "universe.start_date {} is after end_date {}",
                u.start_date, u.end_date
            )));
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = u.symbols.iter().find(|s| !seen.insert(s.as_str())) {
            return Err(ConfigError::Invalid(format!("duplicate symbol '{dup}'")));
        }
        // Edge weights are the correlations themselves and must stay positive
        if !(self.graph.threshold.is_finite() && self.graph.threshold >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "graph.threshold must be a finite value >= 0, got {}",
                self.graph.threshold
            )));
        }
        let pr = &self.pagerank;
        if !(pr.damping > 0.0 && pr.damping < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "pagerank.damping must be in (0, 1), got {}",
                pr.damping
            )));
        }
        if !(pr.tolerance > 0.0) || pr.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "pagerank.tolerance and max_iterations must be positive".into(),
            ));
        }
        if !(self.layout.k > 0.0) {
            return Err(ConfigError::Invalid("layout.k must be positive".into()));
        }
        let p = &self.presentation;
        if p.width == 0 || p.height == 0 || !(p.node_size_scale > 0.0) {
            return Err(ConfigError::Invalid(
                "presentation width, height and node_size_scale must be positive".into(),
            ));
        }
        Ok(())
    }

    /// BLAKE3 fingerprint of the serialized config.
    ///
    /// Two runs with identical configs (and identical data) produce identical
    /// rankings, so this identifies a run in its manifest.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&json).to_hex().to_string()
    }
}
