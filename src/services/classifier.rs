// src/services/classifier.rs

//! Regular-season game classifier.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::error::{AppError, FetchError, Result};
use crate::models::{GameClassification, GameId};
use crate::utils::http::Fetcher;
use crate::utils::{join_url, root_element};

/// Marker that a game directory holds real data.
const BOXSCORE_MARKER: &str = "boxscore.xml";

/// Service deciding which candidate games are downloadable.
pub struct GameClassifier {
    fetcher: Arc<dyn Fetcher>,
    timeout: Duration,
    workers: usize,
}

impl GameClassifier {
    pub fn new(fetcher: Arc<dyn Fetcher>, timeout: Duration, workers: usize) -> Self {
        Self {
            fetcher,
            timeout,
            workers: workers.max(1),
        }
    }

    /// Classify every candidate concurrently.
    ///
    /// The first timeout fails the whole call; outstanding requests are dropped.
    pub async fn classify_all(
        &self,
        day_url: &str,
        games: &[GameId],
    ) -> Result<HashMap<GameId, GameClassification>> {
        stream::iter(games)
            .map(|game| async move {
                let class = self.classify(day_url, game).await?;
                Ok::<_, AppError>((game.clone(), class))
            })
            .buffer_unordered(self.workers)
            .try_collect()
            .await
    }

    /// Classify a single game.
    pub async fn classify(&self, day_url: &str, game: &GameId) -> Result<GameClassification> {
        let game_url = join_url(day_url, game.as_str());

        let Some(listing) = self.fetch_optional(&game_url).await? else {
            log::info!("{}: game does not exist", game);
            return Ok(GameClassification::NotFound);
        };
        if !String::from_utf8_lossy(&listing).contains(BOXSCORE_MARKER) {
            log::info!("{}: no boxscore, skipping", game);
            return Ok(GameClassification::NotFound);
        }

        let linescore_url = join_url(&game_url, "linescore.xml");
        let Some(linescore) = self.fetch_optional(&linescore_url).await? else {
            log::info!("{}: no linescore, skipping", game);
            return Ok(GameClassification::NotFound);
        };

        let text = String::from_utf8_lossy(&linescore);
        let root = root_element(&text)
            .ok_or_else(|| AppError::classification(game.as_str(), "linescore has no root element"))?;
        let class = GameClassification::from_game_type(root.attribute("game_type").as_deref());

        if let GameClassification::WrongCategory(kind) = &class {
            log::debug!("{}: game_type '{}' is not regular season", game, kind);
        }
        Ok(class)
    }

    /// Eligible ids in a stable order.
    pub fn eligible(classes: &HashMap<GameId, GameClassification>) -> Vec<GameId> {
        let mut games: Vec<GameId> = classes
            .iter()
            .filter(|(_, class)| class.is_eligible())
            .map(|(game, _)| game.clone())
            .collect();
        games.sort();
        games
    }

    async fn fetch_optional(&self, url: &str) -> Result<Option<Vec<u8>>> {
        match self.fetcher.fetch(url, self.timeout).await {
            Ok(body) => Ok(Some(body)),
            Err(FetchError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
