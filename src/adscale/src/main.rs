//! adscale evaluates ad strategies and individual ads from daily insights
//! and prints scaling recommendations, trend alerts, and scores as JSON.

mod input;

use std::path::PathBuf;

use adscale_core::EngineConfig;
use adscale_evaluator::Evaluator;
use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing::{info, warn};

use crate::input::{evaluate_all, LineItem, WindowOptions};

#[derive(Parser, Debug)]
#[command(name = "adscale")]
#[command(about = "Ad performance evaluation and budget scaling advisor")]
#[command(version)]
struct Cli {
    /// JSON file with an array of line items and their daily samples
    #[arg(short, long)]
    input: PathBuf,

    /// Engine configuration file (TOML or JSON)
    #[arg(short, long, env = "ADSCALE_CONFIG")]
    config: Option<PathBuf>,

    /// Day the rolling 7- and 3-day windows end on (default: latest sample)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// First day of the selected period (default: earliest sample)
    #[arg(long)]
    since: Option<NaiveDate>,

    /// Last day of the selected period (default: as-of day)
    #[arg(long)]
    until: Option<NaiveDate>,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adscale=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(Some(path.as_path()))
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::load(None).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config from environment, using defaults");
            EngineConfig::default()
        }),
    };

    let raw = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let items: Vec<LineItem> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing line items from {}", cli.input.display()))?;

    info!(
        items = items.len(),
        currency = %config.currency_symbol,
        "Evaluating line items"
    );

    let evaluator = Evaluator::new(config);
    let options = WindowOptions {
        as_of: cli.as_of,
        since: cli.since,
        until: cli.until,
    };

    let reports = evaluate_all(&items, &evaluator, &options);

    let output = if cli.pretty {
        serde_json::to_string_pretty(&reports)?
    } else {
        serde_json::to_string(&reports)?
    };
    println!("{output}");

    Ok(())
}
