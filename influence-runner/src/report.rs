//! Console report: the ranked influence table.

use influence_core::InfluenceRanking;

use crate::pipeline::InfluenceReport;

/// Render the top `top_n` rows as a fixed-width table, one symbol per row.
///
/// ```text
/// Top 10 Most Influential Stocks (by PageRank):
///
///        PageRank  Number of Connections
/// NVDA   0.053421                     14
/// ```
pub fn format_ranking_table(ranking: &InfluenceRanking, top_n: usize) -> String {
    let rows = ranking.top(top_n);
    let label_width = rows
        .iter()
        .map(|r| r.symbol.len())
        .max()
        .unwrap_or(0)
        .max(6);

    let mut out = format!("Top {top_n} Most Influential Stocks (by PageRank):\n\n");
    out.push_str(&format!(
        "{:<label_width$} {:>9}  {:>21}\n",
        "", "PageRank", "Number of Connections"
    ));
    for row in rows {
        out.push_str(&format!(
            "{:<label_width$} {:>9.6}  {:>21}\n",
            row.symbol, row.pagerank, row.connections
        ));
    }
    out
}

/// Short run summary printed after the table.
pub fn format_summary(report: &InfluenceReport) -> String {
    let mut out = format!("Source: {}\n", report.provider);
    out.push_str(&format!(
        "Period: {} .. {} ({} trading days)\n",
        report.start_date, report.end_date, report.trading_days
    ));
    out.push_str(&format!(
        "Graph: {} nodes, {} edges (threshold {:.2}, density {:.3})\n",
        report.node_count, report.edge_count, report.threshold, report.density
    ));
    if !report.dropped_symbols.is_empty() {
        out.push_str(&format!(
            "Dropped ({}): {}\n",
            report.dropped_symbols.len(),
            report.dropped_symbols.join(", ")
        ));
    }
    out.push_str(&format!("Dataset hash: {}\n", report.dataset_hash));
    out
}

pub fn print_ranking_table(ranking: &InfluenceRanking, top_n: usize) {
    print!("{}", format_ranking_table(ranking, top_n));
}
