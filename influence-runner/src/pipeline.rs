//! Pipeline driver: fetch → normalize → returns → correlation → graph → ranking.
//!
//! Two entry points:
//! - `run_pipeline()`: fetches the configured universe through a provider. Used by CLI.
//! - `analyze()`: takes already-fetched bars. No I/O.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use influence_core::config::InfluenceConfig;
use influence_core::data::{
    align_prices, apply_policy, fetch_universe, CleanPrices, DataError, DataProvider,
    DataSource, DownloadProgress, FetchedUniverse,
};
use influence_core::{
    daily_returns, AnalysisError, CentralityScores, ConfigError, CorrelationMatrix,
    InfluenceGraph, InfluenceRanking,
};

use crate::profiling::ProfileScope;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),
}

/// Current schema version for persisted manifests.
pub const SCHEMA_VERSION: u32 = 1;

/// Serializable summary of one ranking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluenceReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub start_date: String,
    pub end_date: String,
    pub threshold: f64,
    /// Name of the provider that supplied the prices.
    pub provider: String,
    /// Where each fetched symbol's bars came from.
    pub sources: BTreeMap<String, DataSource>,
    pub symbols_requested: usize,
    /// Symbols dropped by the missing-data policy (includes unavailable ones).
    pub dropped_symbols: Vec<String>,
    /// Symbols the provider reported as not found.
    pub unavailable_symbols: Vec<String>,
    pub dropped_dates: usize,
    pub trading_days: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    /// BLAKE3 over the cleaned price table.
    pub dataset_hash: String,
    pub config_fingerprint: String,
    pub ranking: InfluenceRanking,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Everything a run produces: the manifest plus the graph the plot needs.
#[derive(Debug, Clone)]
pub struct InfluenceRun {
    pub report: InfluenceReport,
    pub graph: InfluenceGraph,
}

/// Fetch the configured universe and rank it.
pub fn run_pipeline(
    config: &InfluenceConfig,
    provider: &dyn DataProvider,
    progress: &dyn DownloadProgress,
) -> Result<InfluenceRun, RunError> {
    config.validate()?;
    let universe = &config.universe;

    let fetched = {
        let _scope = ProfileScope::new("fetch_universe");
        fetch_universe(
            provider,
            &universe.symbols,
            universe.start_date,
            universe.end_date,
            progress,
        )?
    };

    analyze(config, &fetched)
}

/// Rank already-fetched bars.
pub fn analyze(config: &InfluenceConfig, fetched: &FetchedUniverse) -> Result<InfluenceRun, RunError> {
    let universe = &config.universe;

    let clean = {
        let _scope = ProfileScope::new("normalize");
        let table = align_prices(&fetched.symbols, &fetched.bars, universe.price_field);
        apply_policy(&table, universe.missing_data)
    };
    for symbol in &clean.dropped_symbols {
        eprintln!("WARNING: dropping {symbol}: incomplete price history");
    }
    if clean.dropped_dates > 0 {
        eprintln!(
            "WARNING: dropped {} trading days with missing prices",
            clean.dropped_dates
        );
    }
    if clean.symbols.is_empty() {
        return Err(AnalysisError::EmptyUniverse.into());
    }

    let returns = {
        let _scope = ProfileScope::new("daily_returns");
        daily_returns(&clean)?
    };
    let correlation = {
        let _scope = ProfileScope::new("correlation");
        CorrelationMatrix::from_returns(&returns)?
    };
    let graph = InfluenceGraph::build(&correlation, config.graph.threshold);
    let scores = {
        let _scope = ProfileScope::new("centrality");
        CentralityScores::compute(&graph, &config.pagerank)?
    };
    let ranking = InfluenceRanking::from_scores(&scores);

    let report = InfluenceReport {
        schema_version: SCHEMA_VERSION,
        start_date: universe.start_date.to_string(),
        end_date: universe.end_date.to_string(),
        threshold: config.graph.threshold,
        provider: fetched.provider.clone(),
        sources: fetched
            .sources
            .iter()
            .map(|(symbol, source)| (symbol.clone(), *source))
            .collect(),
        symbols_requested: fetched.symbols.len(),
        dropped_symbols: clean.dropped_symbols.clone(),
        unavailable_symbols: fetched.unavailable.clone(),
        dropped_dates: clean.dropped_dates,
        trading_days: clean.row_count(),
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        density: graph.density(),
        dataset_hash: compute_dataset_hash(&clean),
        config_fingerprint: config.fingerprint(),
        ranking,
    };

    Ok(InfluenceRun { report, graph })
}

fn compute_dataset_hash(clean: &CleanPrices) -> String {
    let mut hasher = blake3::Hasher::new();

    for (symbol, column) in clean.symbols.iter().zip(&clean.columns) {
        hasher.update(symbol.as_bytes());
        for (date, price) in clean.dates.iter().zip(column) {
            hasher.update(date.to_string().as_bytes());
            hasher.update(&price.to_le_bytes());
        }
    }

    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use influence_core::data::{DataSource, RawBar};
    use std::collections::HashMap;

    fn bars(prices: &[f64]) -> Vec<RawBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| RawBar::new(start + chrono::Duration::days(i as i64), p))
            .collect()
    }

    fn fetched(series: &[(&str, Vec<f64>)], unavailable: &[&str]) -> FetchedUniverse {
        let mut symbols: Vec<String> = series.iter().map(|(s, _)| s.to_string()).collect();
        symbols.extend(unavailable.iter().map(|s| s.to_string()));
        FetchedUniverse {
            provider: "memory".to_string(),
            symbols,
            bars: series
                .iter()
                .map(|(s, p)| (s.to_string(), bars(p)))
                .collect(),
            sources: series
                .iter()
                .map(|(s, _)| (s.to_string(), DataSource::Synthetic))
                .collect::<HashMap<_, _>>(),
            unavailable: unavailable.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn sample() -> FetchedUniverse {
        fetched(
            &[
                ("AAA", vec![10.0, 11.0, 10.5, 12.0, 11.0, 12.5]),
                ("BBB", vec![20.0, 22.0, 21.0, 24.0, 22.0, 25.0]),
                ("CCC", vec![5.0, 4.8, 5.2, 5.1, 5.3, 4.9]),
            ],
            &["GONE"],
        )
    }

    #[test]
    fn analyze_ranks_available_symbols() {
        let run = analyze(&InfluenceConfig::default(), &sample()).unwrap();
        let report = &run.report;

        assert_eq!(report.symbols_requested, 4);
        assert_eq!(report.node_count, 3);
        assert_eq!(report.unavailable_symbols, vec!["GONE".to_string()]);
        assert_eq!(report.dropped_symbols, vec!["GONE".to_string()]);
        assert_eq!(report.trading_days, 6);
        assert_eq!(report.ranking.len(), 3);
        assert_eq!(report.provider, "memory");
        assert_eq!(
            report.sources.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["AAA", "BBB", "CCC"]
        );
        // AAA and BBB move in lockstep
        assert!(run.graph.edge_weight("AAA", "BBB").is_some());
    }

    #[test]
    fn dataset_hash_tracks_prices() {
        let a = analyze(&InfluenceConfig::default(), &sample()).unwrap();
        let b = analyze(&InfluenceConfig::default(), &sample()).unwrap();
        assert_eq!(a.report.dataset_hash, b.report.dataset_hash);

        let other = fetched(
            &[
                ("AAA", vec![10.0, 11.0, 10.5, 12.0, 11.0, 12.6]),
                ("BBB", vec![20.0, 22.0, 21.0, 24.0, 22.0, 25.0]),
                ("CCC", vec![5.0, 4.8, 5.2, 5.1, 5.3, 4.9]),
            ],
            &["GONE"],
        );
        let c = analyze(&InfluenceConfig::default(), &other).unwrap();
        assert_ne!(a.report.dataset_hash, c.report.dataset_hash);
    }

    #[test]
    fn nothing_left_after_policy_is_empty_universe() {
        let err = analyze(&InfluenceConfig::default(), &fetched(&[], &["X", "Y"])).unwrap_err();
        assert!(matches!(err, RunError::Analysis(AnalysisError::EmptyUniverse)));
    }

    #[test]
    fn constant_series_is_undefined_correlation() {
        let flat = fetched(
            &[
                ("AAA", vec![10.0, 11.0, 10.5, 12.0]),
                ("FLAT", vec![7.0, 7.0, 7.0, 7.0]),
            ],
            &[],
        );
        let err = analyze(&InfluenceConfig::default(), &flat).unwrap_err();
        assert!(matches!(
            err,
            RunError::Analysis(AnalysisError::UndefinedCorrelation { ref symbol }) if symbol == "FLAT"
        ));
    }
}
