// src/pipeline/download.rs

//! Download orchestration.
//!
//! Dates are processed one after another. Each date goes through listing,
//! classification and download. A timeout anywhere abandons the date for the
//! current pass and queues it for the retry pass.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{
    Config, DateOutcome, DownloadConfig, DownloadReport, PassReport, ProblemStage, SourceConfig,
};
use crate::pipeline::dates::{Clock, DateSpec, SystemClock, expand_dates};
use crate::services::{DayCrawler, DayListing, GameClassifier, GameFetcher};
use crate::storage::LocalMirror;
use crate::utils::http::{Fetcher, HttpFetcher};

/// Passes run after the first one; retry passes never retry themselves.
pub const MAX_RETRY_PASSES: usize = 1;

/// Drives the whole pipeline for a destination directory.
pub struct Downloader {
    fetcher: Arc<dyn Fetcher>,
    base_url: String,
    mirror: LocalMirror,
    clock: Arc<dyn Clock>,
}

impl Downloader {
    pub fn new(fetcher: Arc<dyn Fetcher>, source: &SourceConfig, dest: impl AsRef<Path>) -> Self {
        Self {
            fetcher,
            base_url: source.base_url.clone(),
            mirror: LocalMirror::new(dest.as_ref()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used to resolve an open-ended range.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Download every regular-season game for the given dates.
    pub async fn download_data(
        &self,
        dates: &DateSpec,
        options: &DownloadConfig,
    ) -> Result<DownloadReport> {
        let mut pending = expand_dates(dates, self.clock.today())?;
        options.validate()?;

        let mut report = DownloadReport::default();
        let mut retries_left = if options.retry_on_timeout {
            MAX_RETRY_PASSES
        } else {
            0
        };

        loop {
            let pass = self.run_pass(&pending, options).await?;
            let problems = pass.problems();
            report.passes.push(pass);

            if problems.is_empty() {
                break;
            }
            log_problems(&problems);

            if retries_left == 0 {
                break;
            }
            retries_left -= 1;
            log::info!("Retrying dates with HTTP timeouts.");
            pending = problems;
        }

        log::info!(
            "Downloaded {} games over {} pass(es)",
            report.games_downloaded(),
            report.passes.len()
        );
        Ok(report)
    }

    /// Process each date once, in order.
    pub async fn run_pass(&self, dates: &[NaiveDate], options: &DownloadConfig) -> Result<PassReport> {
        let timeout = options.timeout()?;
        let crawler = DayCrawler::new(Arc::clone(&self.fetcher), self.base_url.as_str(), timeout);
        let classifier =
            GameClassifier::new(Arc::clone(&self.fetcher), timeout, options.classify_workers());
        let games = GameFetcher::new(
            Arc::clone(&self.fetcher),
            self.mirror.clone(),
            timeout,
            options.max_workers,
        )
        .cleanup_failed(options.cleanup_failed_games);

        let mut pass = PassReport::default();
        for &date in dates {
            let outcome = self
                .process_date(date, &crawler, &classifier, &games, options)
                .await?;
            pass.record(date, outcome);
        }
        Ok(pass)
    }

    async fn process_date(
        &self,
        date: NaiveDate,
        crawler: &DayCrawler,
        classifier: &GameClassifier,
        games: &GameFetcher,
        options: &DownloadConfig,
    ) -> Result<DateOutcome> {
        let day_dir = self.mirror.day_dir(date);
        self.mirror.ensure_dir(&day_dir).await?;
        let day_url = crawler.day_url(date);

        let candidates = match crawler.list_games(date).await {
            Ok(DayListing::Games(candidates)) => candidates,
            Ok(DayListing::NotFound) => return Ok(DateOutcome::Skipped),
            Err(e) if e.is_transient() => {
                log::warn!("HTTP timeout ({}s) listing {}: {}", options.timeout_secs, date, e);
                return Ok(DateOutcome::Problem {
                    stage: ProblemStage::Listing,
                    games: 0,
                });
            }
            Err(e) => return Err(e),
        };

        let eligible = match classifier.classify_all(&day_url, &candidates).await {
            Ok(classes) => GameClassifier::eligible(&classes),
            Err(e) if e.is_transient() => {
                log::warn!("HTTP timeout ({}s) classifying {}: {}", options.timeout_secs, date, e);
                return Ok(DateOutcome::Problem {
                    stage: ProblemStage::Classification,
                    games: 0,
                });
            }
            Err(e) => return Err(e),
        };

        log::info!(
            "{}: {} of {} games are regular season",
            date,
            eligible.len(),
            candidates.len()
        );

        let delay = options.inter_game_delay()?;
        let total = eligible.len();
        let mut done = 0;
        for (i, game) in eligible.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match games.download(&day_url, &day_dir, game, i + 1, total).await {
                Ok(_) => done += 1,
                Err(e) if e.is_transient() => {
                    log::warn!("HTTP timeout ({}s) downloading {}: {}", options.timeout_secs, date, e);
                    return Ok(DateOutcome::Problem {
                        stage: ProblemStage::Download,
                        games: done,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(DateOutcome::Done {
            candidates: candidates.len(),
            games: done,
        })
    }
}

fn log_problems(problems: &[NaiveDate]) {
    let list = problems
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",\n    ");
    log::warn!("Dates with HTTP timeouts:\n[\n    {}\n]", list);
}

/// Run the downloader against the live source described by `config`.
pub async fn run_download(
    config: &Config,
    dates: &DateSpec,
    dest: impl AsRef<Path>,
) -> Result<DownloadReport> {
    let fetcher = Arc::new(HttpFetcher::from_config(&config.source)?);
    Downloader::new(fetcher, &config.source, dest)
        .download_data(dates, &config.download)
        .await
}
