//! Artifact export: ranking CSV, JSON manifest, SVG plot.
//!
//! All persisted manifests include a `schema_version` field. Unknown
//! versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use influence_core::RankedSymbol;

use crate::pipeline::{InfluenceReport, SCHEMA_VERSION};

// ─── JSON manifest ──────────────────────────────────────────────────

pub fn export_json(report: &InfluenceReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize InfluenceReport to JSON")
}

/// Deserialize a manifest, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<InfluenceReport> {
    let report: InfluenceReport =
        serde_json::from_str(json).context("failed to deserialize InfluenceReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Full centrality table, one row per symbol in rank order.
///
/// Columns: rank, symbol, pagerank, connections, degree_centrality, closeness
pub fn export_ranking_csv(rows: &[RankedSymbol]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "rank",
        "symbol",
        "pagerank",
        "connections",
        "degree_centrality",
        "closeness",
    ])?;

    for r in rows {
        wtr.write_record([
            &r.rank.to_string(),
            &r.symbol,
            &format!("{:.8}", r.pagerank),
            &r.connections.to_string(),
            &format!("{:.6}", r.degree_centrality),
            &format!("{:.6}", r.closeness),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set for one run.
///
/// Creates `influence_{timestamp}/` under `output_dir` containing:
/// - `manifest.json`: the full `InfluenceReport`
/// - `ranking.csv`: every symbol with its centrality scores
/// - `influence.svg`: the plot, when `svg` is given
///
/// Returns the path to the created directory.
pub fn save_artifacts(report: &InfluenceReport, svg: Option<&str>, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!("influence_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(report)?;
    std::fs::write(run_dir.join("manifest.json"), &json)?;

    let csv = export_ranking_csv(report.ranking.rows())?;
    std::fs::write(run_dir.join("ranking.csv"), &csv)?;

    if let Some(svg) = svg {
        std::fs::write(run_dir.join("influence.svg"), svg)
            .with_context(|| format!("failed to write plot to {}", run_dir.display()))?;
    }

    Ok(run_dir)
}

/// Load an `InfluenceReport` from an artifact directory's manifest.json.
pub fn load_manifest(run_dir: &Path) -> Result<InfluenceReport> {
    let path = run_dir.join("manifest.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
