use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, info};

use homescore::scoring::{compute_score, ScoringContext};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    /// Breakdown report
    #[default]
    Table,
    /// Tab-separated key/value lines
    Tsv,
    /// Full result as JSON
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a listing snapshot (YAML, or JSON with a .json extension)
    Score {
        /// Path to the snapshot file
        snapshot: PathBuf,

        /// Score as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Year the asking price is dated at for property growth
        #[arg(long)]
        reference_year: Option<i32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Create a config file with your preferences interactively
    Init,
    /// Show the score bands
    Bands,
}

#[derive(Parser, Debug)]
#[command(name = "homescore")]
#[command(about = "Score a property listing against its market and your preferences", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/homescore/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = homescore::telemetry::init(cli.verbose) {
        eprintln!("Warning: {}", e);
    }

    let config_path = cli.config.map(PathBuf::from);

    match cli.command {
        Commands::Init => {
            if let Err(e) = homescore::config::init::run_init_wizard(config_path) {
                eprintln!("Init failed: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
        Commands::Bands => {
            let use_colors = homescore::output::should_use_colors();
            println!("{}", homescore::output::format_bands(use_colors));
        }
        Commands::Score {
            snapshot,
            today,
            reference_year,
            format,
        } => run_score(config_path, snapshot, today, reference_year, format),
    }

    std::process::exit(EXIT_SUCCESS);
}

fn run_score(
    config_path: Option<PathBuf>,
    snapshot_path: PathBuf,
    today: Option<NaiveDate>,
    reference_year: Option<i32>,
    format: OutputFormat,
) {
    let config = match homescore::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = homescore::scoring::validate_preferences(&config.preferences) {
        eprintln!("Preference config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let mut ctx = ScoringContext::new(today.unwrap_or_else(|| Local::now().date_naive()))
        .with_settings(&config.scoring_settings());
    if let Some(year) = reference_year {
        ctx.reference_year = year;
    }
    debug!(?ctx, "scoring context");

    let mut snapshot = match homescore::config::load_snapshot(&snapshot_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Snapshot error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };
    homescore::market_data::fill_from_evidence(&mut snapshot, ctx.reference_date);

    if let Err(errors) = homescore::scoring::validate_snapshot(&snapshot) {
        eprintln!("Snapshot errors in {}:", snapshot_path.display());
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_INPUT);
    }

    let result = compute_score(
        &snapshot.property,
        &snapshot.market,
        &config.preferences,
        &ctx,
    );
    info!(composite = ?result.composite, band = ?result.band, "scored {}", snapshot_path.display());

    match format {
        OutputFormat::Table => {
            let use_colors = homescore::output::should_use_colors();
            println!(
                "{}",
                homescore::output::format_report(
                    &snapshot.property,
                    &snapshot.market,
                    &result,
                    use_colors,
                )
            );
        }
        OutputFormat::Tsv => println!("{}", homescore::output::format_tsv(&result)),
        OutputFormat::Json => match homescore::output::format_json(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Output error: {:#}", e);
                std::process::exit(EXIT_INPUT);
            }
        },
    }
}
