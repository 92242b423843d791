// src/error.rs

//! Unified error handling for the downloader.

use std::fmt;

use thiserror::Error;

/// Result type alias for downloader operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Outcome of a single failed remote fetch.
///
/// The three variants are handled with different policies: absence is
/// resolved locally, timeouts are retried at date granularity, and
/// everything else terminates the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The remote resource does not exist (HTTP 404).
    #[error("not found: {url}")]
    NotFound { url: String },

    /// The request did not complete within the configured timeout.
    #[error("timed out: {url}")]
    Timeout { url: String },

    /// Any other transport or status failure.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            Self::NotFound { url } | Self::Timeout { url } | Self::Transport { url, .. } => url,
        }
    }
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client construction failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A remote fetch failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Caller supplied an unusable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A date string did not match `YYYY-MM-DD`
    #[error("Invalid date '{input}': {source}")]
    DateParse {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A classification document could not be interpreted
    #[error("Unexpected classification document for {game}: {message}")]
    Classification { game: String, message: String },

    /// A required resource of an eligible game is missing
    #[error("Data cannot be found for game {game}: {url}")]
    GameNotFound { game: String, url: String },

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a classification error with context.
    pub fn classification(game: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Classification {
            game: game.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error is a timeout that should queue its date for retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch(FetchError::Timeout { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_timeouts_are_transient() {
        let timeout: AppError = FetchError::Timeout { url: "u".into() }.into();
        let missing: AppError = FetchError::NotFound { url: "u".into() }.into();
        assert!(timeout.is_transient());
        assert!(!missing.is_transient());
        assert!(!AppError::invalid_argument("x").is_transient());
    }

    #[test]
    fn test_fetch_error_url() {
        let err = FetchError::Transport {
            url: "http://x/y".into(),
            message: "boom".into(),
        };
        assert_eq!(err.url(), "http://x/y");
    }
}
