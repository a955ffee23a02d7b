//! Influence Runner: pipeline orchestration, reporting and artifacts.
//!
//! This crate builds on `influence-core` to provide:
//! - The fetch → rank pipeline with stage timing
//! - The console ranking table
//! - SVG rendering of the influence graph
//! - CSV / JSON artifact export

pub mod export;
pub mod pipeline;
pub mod profiling;
pub mod render;
pub mod report;

pub use export::{export_json, export_ranking_csv, import_json, load_manifest, save_artifacts};
pub use pipeline::{analyze, run_pipeline, InfluenceReport, InfluenceRun, RunError, SCHEMA_VERSION};
pub use render::render_svg;
pub use report::{format_ranking_table, format_summary, print_ranking_table};
