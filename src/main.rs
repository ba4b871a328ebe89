//! FitPeaks - cycling activity analytics for the terminal
//!
//! Main entry point for the command-line tool.

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fitpeaks::metrics::MetricsCalculator;
use fitpeaks::recording::{load_directory, load_file};
use fitpeaks::reports::{render_detail, render_fitness, render_peaks, render_week, Painter, PeakKind};
use fitpeaks::storage::config::{load_config, load_config_from};
use fitpeaks::storage::{AppConfig, AthleteProfile, Database, ProfileError};
use fitpeaks::sync::{sync_metadata, unknown_remote_ids, JsonExportProvider};

/// Days of history behind every fitness value.
const FITNESS_HISTORY_DAYS: i64 = 42;

#[derive(Debug, Parser)]
#[command(name = "fitpeaks", version, about = "Cycling peaks, training stress and fitness reports")]
struct Cli {
    /// Configuration file (defaults to the platform data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Activity database, overriding the configured one
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load new recordings from a directory
    Load {
        /// Defaults to the configured activity directory
        dir: Option<PathBuf>,
    },
    /// Load one recording with a known elevation gain
    Import {
        file: PathBuf,
        /// Elevation gain in meters
        elevation: f64,
    },
    /// Copy names and elevation from an exported remote activity list
    Sync {
        /// JSON export file
        export: PathBuf,
    },
    /// Peak power report
    Power,
    /// Peak heart-rate report
    Hr,
    /// Show one activity
    Detail { id: i64 },
    /// Current CTL / ATL / TSB
    Fitness,
    /// Activities of the last week (default)
    Week,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting FitPeaks v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("Failed to load configuration")?;

    let db_path = cli.database.clone().unwrap_or_else(|| config.database_path.clone());
    let db = Database::open(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let painter = Painter::new(config.reports.color);
    let today = Local::now().date_naive();

    let output = match cli.command.unwrap_or(Command::Week) {
        Command::Load { dir } => {
            let dir = dir.unwrap_or_else(|| config.activity_dir.clone());
            let summary = load_directory(&db, &dir)
                .with_context(|| format!("Failed to load activities from {}", dir.display()))?;
            format!(
                "Loaded {} new, skipped {}, failed {}\n",
                summary.loaded, summary.skipped, summary.failed
            )
        }
        Command::Import { file, elevation } => {
            let id = load_file(&db, &file, elevation)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            format!("Imported {} as activity #{}\n", file.display(), id)
        }
        Command::Sync { export } => {
            let provider = JsonExportProvider::load(&export)
                .with_context(|| format!("Failed to read export {}", export.display()))?;
            let unknown = unknown_remote_ids(&provider, &db.get_known_ids()?)?;
            let touched = sync_metadata(&provider, &db, &config.sync)?;
            format!(
                "Updated {} activities; {} remote activities not stored locally\n",
                touched,
                unknown.len()
            )
        }
        Command::Power => render_peaks(&db.load_all()?, PeakKind::Power, &painter),
        Command::Hr => render_peaks(&db.load_all()?, PeakKind::HeartRate, &painter),
        Command::Detail { id } => {
            let profile = load_profile(&config)?;
            let mut activity = db.load_by_id(id)?;
            if let Some(activity) = activity.as_mut() {
                activity.metrics = Some(MetricsCalculator::new(&profile).metrics_for(activity)?);
            }
            render_detail(id, activity.as_ref(), &painter)
        }
        Command::Fitness => {
            let profile = load_profile(&config)?;
            let mut history = db.load_since(history_start(today))?;
            let fitness = MetricsCalculator::new(&profile).process(&mut history)?;
            render_fitness(fitness, &painter)
        }
        Command::Week => {
            let profile = load_profile(&config)?;
            let week_start = today - Duration::days(i64::from(config.reports.week_days));
            let mut history = db.load_since(history_start(week_start))?;
            let fitness = MetricsCalculator::new(&profile).process(&mut history)?;
            render_week(&history, week_start, fitness, &painter)
        }
    };

    print!("{}", output);

    Ok(())
}

/// Earliest start time whose load still counts towards `date`'s fitness.
fn history_start(date: NaiveDate) -> chrono::NaiveDateTime {
    (date - Duration::days(FITNESS_HISTORY_DAYS)).and_time(chrono::NaiveTime::MIN)
}

/// Athlete profile, or an empty one when the file does not exist.
fn load_profile(config: &AppConfig) -> Result<AthleteProfile> {
    match AthleteProfile::load(&config.athlete_file) {
        Ok(profile) => Ok(profile),
        Err(ProfileError::NotFound(path)) => {
            tracing::warn!("No athlete profile at {}; FTP-based metrics will be 0", path);
            Ok(AthleteProfile::empty())
        }
        Err(e) => Err(e).context("Failed to load athlete profile"),
    }
}
