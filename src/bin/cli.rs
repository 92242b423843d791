//! pitchfx CLI
//!
//! Mirrors regular-season Gameday XML data into a local directory.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pitchfx::{
    error::Result,
    models::{Config, GameClassification},
    pipeline::{self, DateSpec},
    services::{DayCrawler, DayListing, GameClassifier},
    utils::http::HttpFetcher,
};

/// pitchfx - Gameday XML downloader
#[derive(Parser, Debug)]
#[command(name = "pitchfx", version, about = "Regular-season Gameday XML downloader")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download every regular-season game for a date range or list
    Download {
        /// Dates as YYYY-MM-DD: start [end], or any number with --list
        dates: Vec<String>,

        /// Treat dates as an explicit list instead of range endpoints
        #[arg(long)]
        list: bool,

        /// Destination directory
        #[arg(short, long, default_value = "data")]
        dest: PathBuf,

        /// Worker pool size for fetching a game's files
        #[arg(long)]
        max_workers: Option<usize>,

        /// Worker pool size for classifying a date's games
        #[arg(long)]
        classify_workers: Option<usize>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<f64>,

        /// Pause between games in seconds
        #[arg(long)]
        delay: Option<f64>,

        /// Retry dates that timed out, once
        #[arg(long)]
        retry: bool,

        /// Remove a game's directory when its download fails
        #[arg(long)]
        cleanup: bool,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List a date's games and their classification without downloading
    Games {
        /// Date as YYYY-MM-DD
        date: String,
    },

    /// Validate configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };
    init_logging(cli.verbose, &config.logging.level);

    match cli.command {
        Command::Download {
            dates,
            list,
            dest,
            max_workers,
            classify_workers,
            timeout,
            delay,
            retry,
            cleanup,
            report,
        } => {
            let download = &mut config.download;
            if let Some(n) = max_workers {
                download.max_workers = n;
            }
            if classify_workers.is_some() {
                download.classify_workers = classify_workers;
            }
            if let Some(secs) = timeout {
                download.timeout_secs = secs;
            }
            if let Some(secs) = delay {
                download.inter_game_delay_secs = secs;
            }
            download.retry_on_timeout |= retry;
            download.cleanup_failed_games |= cleanup;
            config.validate()?;

            log::info!("Downloading into {}", dest.display());
            let spec = DateSpec::new(dates, list);
            let summary = pipeline::run_download(&config, &spec, &dest).await?;

            if let Some(path) = report {
                std::fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
                log::info!("Report saved to {}", path.display());
            }

            let remaining = summary.remaining_problems();
            if remaining.is_empty() {
                log::info!("Done! {} games downloaded", summary.games_downloaded());
            } else {
                log::warn!(
                    "Finished with {} problem date(s): {}",
                    remaining.len(),
                    remaining
                        .iter()
                        .map(|d| d.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }

        Command::Games { date } => {
            config.validate()?;
            let date = pipeline::dates::parse_date(&date)?;
            let fetcher = Arc::new(HttpFetcher::from_config(&config.source)?);
            let timeout = config.download.timeout()?;

            let crawler = DayCrawler::new(fetcher.clone(), config.source.base_url.as_str(), timeout);
            let games = match crawler.list_games(date).await? {
                DayListing::NotFound => {
                    log::info!("No games listed for {}", date);
                    return Ok(());
                }
                DayListing::Games(games) => games,
            };

            let classifier =
                GameClassifier::new(fetcher, timeout, config.download.classify_workers());
            let classes = classifier
                .classify_all(&crawler.day_url(date), &games)
                .await?;

            let mut rows: Vec<_> = classes.into_iter().collect();
            rows.sort_by(|a, b| a.0.cmp(&b.0));
            for (game, class) in rows {
                let label = match class {
                    GameClassification::Eligible => "regular season".to_string(),
                    GameClassification::WrongCategory(kind) => format!("skipped (game_type {kind:?})"),
                    GameClassification::NotFound => "no data".to_string(),
                };
                println!("{:<40} {}", game, label);
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
