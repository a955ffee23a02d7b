//! Integration tests chaining the core stages by hand:
//! bars → aligned table → policy → returns → correlation → graph → ranking.

use chrono::NaiveDate;
use influence_core::config::{LayoutConfig, PageRankConfig};
use influence_core::data::{align_prices, apply_policy, MissingDataPolicy, PriceField, RawBar};
use influence_core::{
    daily_returns, spring_layout, CentralityScores, CorrelationMatrix, InfluenceGraph,
    InfluenceRanking,
};
use std::collections::HashMap;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

/// Deterministic wiggly price path.
fn path(seed: f64, len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 100.0 + (i as f64 * 0.7 + seed).sin() * 5.0 + (i as f64 * seed).cos())
        .collect()
}

fn bars(prices: &[f64]) -> Vec<RawBar> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| RawBar::new(start() + chrono::Duration::days(i as i64), p))
        .collect()
}

fn universe() -> (Vec<String>, HashMap<String, Vec<RawBar>>) {
    let base = path(0.3, 60);
    let mut fetched = HashMap::new();
    fetched.insert("GOOG".to_string(), bars(&base));
    // Scalar multiple of GOOG
    let scaled: Vec<f64> = base.iter().map(|p| p * 1.02).collect();
    fetched.insert("GOOGL".to_string(), bars(&scaled));
    fetched.insert("XOM".to_string(), bars(&path(2.1, 60)));
    fetched.insert("LLY".to_string(), bars(&path(4.4, 60)));
    // PARA misses one session in the middle
    let mut gappy = bars(&path(1.7, 60));
    gappy.remove(30);
    fetched.insert("PARA".to_string(), gappy);

    let symbols = ["GOOG", "GOOGL", "XOM", "LLY", "PARA", "DELISTED"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    (symbols, fetched)
}

fn graph(threshold: f64) -> InfluenceGraph {
    let (symbols, fetched) = universe();
    let table = align_prices(&symbols, &fetched, PriceField::AdjustedClose);
    let clean = apply_policy(&table, MissingDataPolicy::DropColumn);
    let returns = daily_returns(&clean).unwrap();
    InfluenceGraph::build(&CorrelationMatrix::from_returns(&returns).unwrap(), threshold)
}

#[test]
fn symbols_with_missing_prices_are_absent_from_graph() {
    let g = graph(0.40);
    assert_eq!(g.node_count(), 4);
    assert!(!g.contains("PARA"));
    assert!(!g.contains("DELISTED"));
    assert!(g.contains("GOOG"));
}

#[test]
fn scalar_multiples_correlate_perfectly_and_connect() {
    let (symbols, fetched) = universe();
    let table = align_prices(&symbols, &fetched, PriceField::Close);
    let clean = apply_policy(&table, MissingDataPolicy::DropColumn);
    let corr = CorrelationMatrix::from_returns(&daily_returns(&clean).unwrap()).unwrap();

    let r = corr.between("GOOG", "GOOGL").unwrap();
    assert!((r - 1.0).abs() < 1e-9, "correlation was {r}");

    let g = InfluenceGraph::build(&corr, 0.40);
    assert!(g.edge_weight("GOOG", "GOOGL").is_some());
}

#[test]
fn threshold_above_max_correlation_disconnects_everything() {
    let g = graph(1.0);
    assert_eq!(g.edge_count(), 0);

    let scores = CentralityScores::compute(&g, &PageRankConfig::default()).unwrap();
    let n = g.node_count() as f64;
    for i in 0..g.node_count() {
        assert_eq!(scores.degree_centrality[i], 0.0);
        assert_eq!(scores.closeness[i], 0.0);
        assert!((scores.pagerank[i] - 1.0 / n).abs() < 1e-12);
    }
}

#[test]
fn rerun_reproduces_top_three_and_positions() {
    let run = || {
        let g = graph(0.40);
        let scores = CentralityScores::compute(&g, &PageRankConfig::default()).unwrap();
        let ranking = InfluenceRanking::from_scores(&scores);
        let top: Vec<String> = ranking.top_symbols(3).into_iter().map(String::from).collect();
        (top, spring_layout(&g, &LayoutConfig::default()))
    };

    let (top_a, layout_a) = run();
    let (top_b, layout_b) = run();
    assert_eq!(top_a, top_b);
    assert_eq!(layout_a, layout_b);
    assert_eq!(top_a.len(), 3);
}

#[test]
fn drop_row_policy_keeps_gappy_symbol() {
    let (symbols, fetched) = universe();
    let table = align_prices(&symbols, &fetched, PriceField::AdjustedClose);
    let clean = apply_policy(&table, MissingDataPolicy::DropRow);

    assert!(clean.symbols.contains(&"PARA".to_string()));
    assert_eq!(clean.dropped_symbols, vec!["DELISTED".to_string()]);
    assert_eq!(clean.dropped_dates, 1);
    assert_eq!(clean.row_count(), 59);
}
