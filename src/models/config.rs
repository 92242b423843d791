//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote data source settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Concurrency, timeout and retry behavior
    #[serde(default)]
    pub download: DownloadConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        url::Url::parse(&self.source.base_url)
            .map_err(|e| AppError::validation(format!("source.base_url is invalid: {e}")))?;
        self.download.validate()
    }
}

/// Where the Gameday tree lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Root of the remote tree, without a trailing slash
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Concurrency, timeout and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Worker pool size for fetching a single game's resources
    #[serde(default = "defaults::max_workers")]
    pub max_workers: usize,

    /// Worker pool size for classifying a date's games (falls back to `max_workers`)
    #[serde(default)]
    pub classify_workers: Option<usize>,

    /// Timeout applied to each individual request, in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: f64,

    /// Pause between sequential game downloads, in seconds
    #[serde(default = "defaults::inter_game_delay")]
    pub inter_game_delay_secs: f64,

    /// Run one extra pass over dates that hit a timeout
    #[serde(default)]
    pub retry_on_timeout: bool,

    /// Remove a game's directory when its download aborts
    #[serde(default)]
    pub cleanup_failed_games: bool,
}

impl DownloadConfig {
    pub fn timeout(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.timeout_secs)
            .map_err(|e| AppError::validation(format!("download.timeout_secs: {e}")))
    }

    pub fn inter_game_delay(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.inter_game_delay_secs)
            .map_err(|e| AppError::validation(format!("download.inter_game_delay_secs: {e}")))
    }

    pub fn classify_workers(&self) -> usize {
        self.classify_workers.unwrap_or(self.max_workers).max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.timeout_secs.is_finite() && self.timeout_secs > 0.0) {
            return Err(AppError::validation("download.timeout_secs must be > 0"));
        }
        if !(self.inter_game_delay_secs.is_finite() && self.inter_game_delay_secs >= 0.0) {
            return Err(AppError::validation(
                "download.inter_game_delay_secs must be >= 0",
            ));
        }
        if self.max_workers == 0 {
            return Err(AppError::validation("download.max_workers must be > 0"));
        }
        if self.classify_workers == Some(0) {
            return Err(AppError::validation(
                "download.classify_workers must be > 0",
            ));
        }
        self.timeout()?;
        self.inter_game_delay()?;
        Ok(())
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_workers: defaults::max_workers(),
            classify_workers: None,
            timeout_secs: defaults::timeout(),
            inter_game_delay_secs: defaults::inter_game_delay(),
            retry_on_timeout: false,
            cleanup_failed_games: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "http://gd2.mlb.com/components/game/mlb".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; pitchfx/0.1)".into()
    }
    pub fn max_workers() -> usize {
        30
    }
    pub fn timeout() -> f64 {
        10.0
    }
    pub fn inter_game_delay() -> f64 {
        1.0
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
