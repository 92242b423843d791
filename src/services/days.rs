// src/services/days.rs

//! Date index crawler.
//!
//! Lists candidate game directories for one calendar date.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};

use crate::error::{FetchError, Result};
use crate::models::GameId;
use crate::utils::http::Fetcher;
use crate::utils::{GAME_LINK, extract_links};

/// Result of reading a date index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayListing {
    /// No index exists for the date (off-season, not yet published).
    NotFound,
    Games(Vec<GameId>),
}

/// Service for discovering the games of a date.
pub struct DayCrawler {
    fetcher: Arc<dyn Fetcher>,
    base_url: String,
    timeout: Duration,
}

impl DayCrawler {
    pub fn new(fetcher: Arc<dyn Fetcher>, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// `{base}/year_YYYY/month_MM/day_DD`
    pub fn day_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/year_{}/month_{:02}/day_{:02}",
            self.base_url,
            date.year(),
            date.month(),
            date.day()
        )
    }

    /// Fetch the date index and extract candidate game ids.
    pub async fn list_games(&self, date: NaiveDate) -> Result<DayListing> {
        let url = self.day_url(date);
        let body = match self.fetcher.fetch(&url, self.timeout).await {
            Ok(body) => body,
            Err(e @ FetchError::NotFound { .. }) => {
                log::debug!("No index for {} at {}", date, e.url());
                return Ok(DayListing::NotFound);
            }
            Err(e) => return Err(e.into()),
        };

        let games: Vec<GameId> = extract_links(&String::from_utf8_lossy(&body), &GAME_LINK)
            .into_iter()
            .map(GameId::new)
            .collect();

        log::debug!("{}: {} candidate games", date, games.len());
        Ok(DayListing::Games(games))
    }
}
