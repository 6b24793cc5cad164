//! CLI entry point for the O-Line Rater tool.
//!
//! Provides subcommands for ranking offensive linemen by smoothed pass-block
//! success rate, inspecting the fitted prior, exporting scatter-plot data,
//! and listing the values each dashboard filter can take.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use oline_rater::analyzers::filter::{
    FilterField, RankingFilter, Selection, filter_options, scatter_points,
};
use oline_rater::analyzers::ranking::rank_files;
use oline_rater::analyzers::types::RankingTable;
use oline_rater::config::{MissingFlagPolicy, RankingConfig};
use oline_rater::output::{RankingReport, print_pretty, write_json, write_ranking_csv, write_to};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "oline_rater")]
#[command(about = "Rank offensive linemen by empirical-Bayes pass-block success", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Scouting CSV (plain or .gz)
    #[arg(short, long, default_value = "data/pffScoutingData.csv")]
    scouting: PathBuf,

    /// Player metadata CSV (plain or .gz)
    #[arg(short, long, default_value = "data/players.csv")]
    players: PathBuf,

    /// Optional JSON config file
    #[arg(long)]
    config: Option<String>,

    /// Minimum plays for a player to take part in the prior fit
    #[arg(long)]
    min_plays: Option<u32>,

    /// How to read an empty failure-flag cell
    #[arg(long, value_enum)]
    missing_flags: Option<MissingFlagPolicy>,
}

impl InputArgs {
    fn config(&self) -> Result<RankingConfig> {
        let mut config = match &self.config {
            Some(path) => RankingConfig::load(path)?,
            None => RankingConfig::default(),
        };
        if let Some(min_plays) = self.min_plays {
            config.min_plays = min_plays;
        }
        if let Some(policy) = self.missing_flags {
            config.missing_flags = policy;
        }
        Ok(config)
    }
}

#[derive(Args)]
struct FilterArgs {
    /// Keep only these positions (repeatable; "Select All" keeps every one)
    #[arg(long = "position")]
    positions: Vec<String>,

    /// Keep only these player names (repeatable)
    #[arg(long = "name")]
    names: Vec<String>,

    /// Keep only these colleges (repeatable)
    #[arg(long = "college")]
    colleges: Vec<String>,
}

impl FilterArgs {
    fn filter(&self) -> RankingFilter {
        RankingFilter {
            positions: Selection::from_values(self.positions.iter().cloned()),
            names: Selection::from_values(self.names.iter().cloned()),
            colleges: Selection::from_values(self.colleges.iter().cloned()),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the ranking table and write it out
    Rank {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// File to write the table to ("-" for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,

        #[arg(short, long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Gzip compress the output
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Fit the Beta prior and log its parameters
    Prior {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Write raw vs. smoothed rate points for the scatter plot as JSON
    Scatter {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// File to write the points to ("-" for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,

        /// Only plot players whose raw rate is above this
        #[arg(long)]
        min_raw_rate: Option<f64>,
    },
    /// List the values a dashboard filter can take, most common first
    Options {
        #[command(flatten)]
        input: InputArgs,

        #[arg(short, long, value_enum)]
        field: FilterField,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/oline_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("oline_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rank {
            input,
            filters,
            output,
            format,
            gzip,
        } => {
            let table = load_table(&input)?;
            print_pretty(&table);

            let rows = filters.filter().apply(&table.players);
            if rows.is_empty() {
                warn!("No players match the filters");
            }
            info!(rows = rows.len(), total = table.players.len(), "Writing ranking");

            match format {
                Format::Csv => write_to(&output, gzip, |w| write_ranking_csv(w, &rows))?,
                Format::Json => {
                    let report = RankingReport::new(&table, rows);
                    write_to(&output, gzip, |w| write_json(w, &report))?
                }
            }
        }
        Commands::Prior { input } => {
            let table = load_table(&input)?;
            info!(
                alpha0 = table.prior.alpha0,
                beta0 = table.prior.beta0,
                prior_mean = table.prior.mean(),
                qualifying = table.qualifying_players,
                min_plays = table.min_plays,
                "Beta prior"
            );
        }
        Commands::Scatter {
            input,
            filters,
            output,
            min_raw_rate,
        } => {
            let config = input.config()?;
            let table = rank(&input, &config)?;

            let threshold = min_raw_rate.unwrap_or(config.scatter_min_raw_rate);
            let points = scatter_points(filters.filter().apply(&table.players), threshold);
            info!(points = points.len(), threshold, "Writing scatter points");

            write_to(&output, false, |w| write_json(w, &points))?;
        }
        Commands::Options { input, field } => {
            let table = load_table(&input)?;
            let options = filter_options(&table.players, field);

            info!(field = ?field, choices = options.len(), "Filter choices");
            for (value, count) in &options {
                info!(value = %value, count, "Choice");
            }
        }
    }

    Ok(())
}

fn load_table(input: &InputArgs) -> Result<RankingTable> {
    let config = input.config()?;
    rank(input, &config)
}

#[tracing::instrument(skip_all, fields(scouting = %input.scouting.display(), players = %input.players.display()))]
fn rank(input: &InputArgs, config: &RankingConfig) -> Result<RankingTable> {
    rank_files(&input.scouting, &input.players, config).context("ranking pipeline failed")
}
