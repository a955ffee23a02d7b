//! Influence CLI: rank, download and config commands.
//!
//! Commands:
//! - `rank`: fetch prices, build the correlation graph, print the PageRank table, save artifacts
//! - `download`: fetch the universe from Yahoo Finance into a wide price CSV
//! - `config`: print the default configuration as TOML

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use influence_core::data::{
    align_prices, fetch_universe, write_price_csv, CsvPriceProvider, DataProvider, NoProgress,
    StdoutProgress, YahooProvider,
};
use influence_core::{spring_layout, InfluenceConfig};
use influence_runner::{
    format_summary, print_ranking_table, profiling, render_svg, run_pipeline, save_artifacts,
};

#[derive(Parser)]
#[command(
    name = "influence",
    about = "Influence: correlation-graph PageRank ranking of equities"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the universe by PageRank on its correlation graph.
    Rank {
        /// Path to a TOML config file. Defaults reproduce the reference run.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read prices from a wide CSV (as written by `download`) instead of Yahoo Finance.
        #[arg(long)]
        prices: Option<PathBuf>,

        /// Start date (YYYY-MM-DD), overrides the config.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD, inclusive), overrides the config.
        #[arg(long)]
        end: Option<String>,

        /// Correlation threshold for an edge, overrides the config.
        #[arg(long)]
        threshold: Option<f64>,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Skip the SVG plot.
        #[arg(long, default_value_t = false)]
        no_render: bool,
    },
    /// Download the universe's prices into a wide CSV.
    Download {
        /// Path to a TOML config file (universe section is used).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD, inclusive).
        #[arg(long)]
        end: Option<String>,

        /// Destination CSV file.
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the default configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    profiling::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank {
            config,
            prices,
            start,
            end,
            threshold,
            output_dir,
            no_render,
        } => run_rank(
            config.as_deref(),
            prices.as_deref(),
            start.as_deref(),
            end.as_deref(),
            threshold,
            &output_dir,
            no_render,
        ),
        Commands::Download {
            config,
            start,
            end,
            out,
        } => run_download(config.as_deref(), start.as_deref(), end.as_deref(), &out),
        Commands::Config => {
            print!("{}", InfluenceConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn load_config(
    path: Option<&Path>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<InfluenceConfig> {
    let mut config = match path {
        Some(p) => InfluenceConfig::from_file(p)?,
        None => InfluenceConfig::default(),
    };
    if let Some(s) = start {
        config.universe.start_date = parse_date(s)?;
    }
    if let Some(e) = end {
        config.universe.end_date = parse_date(e)?;
    }
    Ok(config)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn run_rank(
    config_path: Option<&Path>,
    prices: Option<&Path>,
    start: Option<&str>,
    end: Option<&str>,
    threshold: Option<f64>,
    output_dir: &Path,
    no_render: bool,
) -> Result<()> {
    let mut config = load_config(config_path, start, end)?;
    if let Some(t) = threshold {
        config.graph.threshold = t;
    }

    let provider: Box<dyn DataProvider> = match prices {
        Some(path) => Box::new(CsvPriceProvider::from_path(path)?),
        None => Box::new(YahooProvider::new()?),
    };
    let run = match prices {
        // Local file reads need no per-symbol chatter
        Some(_) => run_pipeline(&config, provider.as_ref(), &NoProgress)?,
        None => run_pipeline(&config, provider.as_ref(), &StdoutProgress)?,
    };

    println!();
    print_ranking_table(&run.report.ranking, config.presentation.top_n);
    println!();
    print!("{}", format_summary(&run.report));

    let svg = if no_render {
        None
    } else {
        let layout = {
            let _scope = profiling::ProfileScope::new("spring_layout");
            spring_layout(&run.graph, &config.layout)
        };
        Some(render_svg(
            &run.graph,
            &run.report.ranking,
            &layout,
            &config.presentation,
        ))
    };

    let run_dir = save_artifacts(&run.report, svg.as_deref(), output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn run_download(
    config_path: Option<&Path>,
    start: Option<&str>,
    end: Option<&str>,
    out: &Path,
) -> Result<()> {
    let config = load_config(config_path, start, end)?;
    config.validate()?;
    let universe = &config.universe;

    let provider = YahooProvider::new()?;
    let fetched = fetch_universe(
        &provider,
        &universe.symbols,
        universe.start_date,
        universe.end_date,
        &StdoutProgress,
    )?;
    for symbol in &fetched.unavailable {
        eprintln!("Error for {symbol}: no data returned");
    }

    let table = align_prices(&fetched.symbols, &fetched.bars, universe.price_field);
    let file = std::fs::File::create(out)
        .with_context(|| format!("failed to create {}", out.display()))?;
    write_price_csv(&table, file)?;

    println!(
        "Wrote {} symbols x {} days to {}",
        table.symbols().len(),
        table.row_count(),
        out.display()
    );
    Ok(())
}
