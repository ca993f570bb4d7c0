//! Equity Scoring - command-line front end for the tiered scoring engine.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use equity_common::config::{expand_path, Config};
use equity_common::logging::init_logging;
use equity_scoring::summary::BatchSummary;
use equity_scoring::weights;
use equity_scoring::{ScoreInput, ScoreResult, ScoringEngine, Tier};

#[derive(Parser, Debug)]
#[command(name = "equity-scoring")]
#[command(version)]
#[command(about = "Tiered equity scoring: composite score, rating, and position size.", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.equity-scoring/config.json)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score every record in a JSON file of `{ticker: record}`
    Score {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Number of tickers listed in the summary ranking
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Show the tier profile for a market cap (billions)
    Tier {
        #[arg(allow_negative_numbers = true)]
        market_cap_billions: f64,
    },

    /// Compute a position size
    Position {
        /// Tier number
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        tier: u8,

        /// Composite score
        #[arg(long)]
        score: f64,

        /// Beta vs the market
        #[arg(long, default_value = "1.0", allow_negative_numbers = true)]
        beta: f64,
    },

    /// Validate the built-in weight tables
    Check,
}

#[derive(Serialize)]
struct ScoreReport {
    results: Vec<ScoreResult>,
    summary: BatchSummary,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Exit code for a failed run; errors outside the shared type exit with 1.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<equity_common::Error>()
        .and_then(|e| u8::try_from(e.exit_code()).ok())
        .unwrap_or(1)
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref().map(expand_path);
    let config = Config::load_and_validate(config_path.as_deref())?;

    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    let engine = ScoringEngine::with_config(&config.scoring);

    match cli.command {
        Commands::Score { input, top } => {
            let records = read_records(&input)?;
            let results = engine.score_batch(&records);
            let summary = BatchSummary::with_top_n(&results, top);

            print_json(&ScoreReport { results, summary })?;
        }
        Commands::Tier {
            market_cap_billions,
        } => {
            print_json(Tier::from_market_cap(market_cap_billions).profile())?;
        }
        Commands::Position { tier, score, beta } => {
            let tier = Tier::from_number(tier)
                .ok_or_else(|| equity_common::Error::InvalidInput(format!("unknown tier {tier}")))?;
            let size = engine.sizer().size(tier, score, beta);
            println!("{tier}: {size:.1}%");
        }
        Commands::Check => {
            weights::validate_all().context("Weight table validation failed")?;
            println!("{} weight tables OK", weights::all_tables().count());
        }
    }

    Ok(())
}

/// Read a `{ticker: record}` file; records come back in ticker order.
fn read_records(path: &Path) -> equity_common::Result<Vec<(String, ScoreInput)>> {
    // Named in full: anyhow::Context also provides `context`
    let content = equity_common::error::ResultExt::context(
        std::fs::read_to_string(path),
        format!("Failed to read input from {}", path.display()),
    )?;
    let records: BTreeMap<String, ScoreInput> = equity_common::error::ResultExt::context(
        serde_json::from_str(&content),
        format!("Failed to parse input from {}", path.display()),
    )?;

    Ok(records.into_iter().collect())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
