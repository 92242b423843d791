// src/services/games.rs

//! Game downloader.
//!
//! Downloads one eligible game in two phases. Discovery lists the batter and
//! pitcher files and builds a fixed [`GamePlan`]. Execution fetches every task
//! of the plan. Files are written only once all fetches have succeeded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::error::{AppError, FetchError, Result};
use crate::models::{GameId, GamePlan, ParticipantKind};
use crate::storage::LocalMirror;
use crate::utils::http::Fetcher;
use crate::utils::{PARTICIPANT_LINK, extract_links, join_url};

/// Service for mirroring a single game.
pub struct GameFetcher {
    fetcher: Arc<dyn Fetcher>,
    mirror: LocalMirror,
    timeout: Duration,
    workers: usize,
    cleanup_failed: bool,
}

impl GameFetcher {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        mirror: LocalMirror,
        timeout: Duration,
        workers: usize,
    ) -> Self {
        Self {
            fetcher,
            mirror,
            timeout,
            workers: workers.max(1),
            cleanup_failed: false,
        }
    }

    /// Remove a game's directory when its download aborts.
    pub fn cleanup_failed(mut self, enabled: bool) -> Self {
        self.cleanup_failed = enabled;
        self
    }

    /// Download one game, reporting progress as `index/total`.
    ///
    /// Returns the number of files written.
    pub async fn download(
        &self,
        day_url: &str,
        day_dir: &Path,
        game: &GameId,
        index: usize,
        total: usize,
    ) -> Result<usize> {
        let started = Instant::now();
        log::info!("Downloading: {:<30} {:>2}/{:<2}", game.as_str(), index, total);

        match self.download_inner(day_url, day_dir, game).await {
            Ok(written) => {
                log::info!(
                    "{} ==> Done ({:5.2} sec, {} files)",
                    game,
                    started.elapsed().as_secs_f64(),
                    written
                );
                Ok(written)
            }
            Err(e) => {
                match &e {
                    AppError::GameNotFound { .. } => {
                        log::error!("Data cannot be found for game: {}", game)
                    }
                    e if e.is_transient() => log::warn!("{} aborted: {}", game, e),
                    e => log::error!("{} failed: {}", game, e),
                }
                if self.cleanup_failed {
                    let dir = self.mirror.game_dir(day_dir, game);
                    if let Err(cleanup) = self.mirror.remove_dir(&dir).await {
                        log::warn!("Could not remove {}: {}", dir.display(), cleanup);
                    }
                }
                Err(e)
            }
        }
    }

    async fn download_inner(&self, day_url: &str, day_dir: &Path, game: &GameId) -> Result<usize> {
        let plan = self.plan(day_url, day_dir, game).await?;
        let bodies = self.fetch_plan(&plan).await?;

        for (dest, body) in &bodies {
            self.mirror.write_bytes(dest, body).await?;
        }
        Ok(bodies.len())
    }

    /// Discovery phase: create the game directories and build the task set.
    pub async fn plan(&self, day_url: &str, day_dir: &Path, game: &GameId) -> Result<GamePlan> {
        let game_url = join_url(day_url, game.as_str());
        let root = self.mirror.game_dir(day_dir, game);

        self.mirror.ensure_dir(&root).await?;
        for kind in ParticipantKind::ALL {
            self.mirror
                .ensure_dir(&LocalMirror::participant_dir(&root, kind))
                .await?;
        }

        let (batters, pitchers) = futures::try_join!(
            self.list_participants(game, &game_url, ParticipantKind::Batters),
            self.list_participants(game, &game_url, ParticipantKind::Pitchers),
        )?;

        let plan = GamePlan::build(game.clone(), &game_url, &root, &batters, &pitchers);
        log::debug!(
            "{}: {} batters, {} pitchers, {} files",
            game,
            plan.batters,
            plan.pitchers,
            plan.tasks.len()
        );
        Ok(plan)
    }

    /// Execution phase: fetch every task, keyed by destination path.
    pub async fn fetch_plan(&self, plan: &GamePlan) -> Result<HashMap<PathBuf, Vec<u8>>> {
        stream::iter(&plan.tasks)
            .map(|task| async move {
                let body = self.fetch(&plan.game, &task.url).await?;
                Ok::<_, AppError>((task.dest.clone(), body))
            })
            .buffer_unordered(self.workers)
            .try_collect()
            .await
    }

    async fn list_participants(
        &self,
        game: &GameId,
        game_url: &str,
        kind: ParticipantKind,
    ) -> Result<Vec<String>> {
        let body = self.fetch(game, &join_url(game_url, kind.dir_name())).await?;
        Ok(extract_links(&String::from_utf8_lossy(&body), &PARTICIPANT_LINK))
    }

    async fn fetch(&self, game: &GameId, url: &str) -> Result<Vec<u8>> {
        self.fetcher
            .fetch(url, self.timeout)
            .await
            .map_err(|e| match e {
                FetchError::NotFound { url } => AppError::GameNotFound {
                    game: game.to_string(),
                    url,
                },
                other => AppError::Fetch(other),
            })
    }
}
