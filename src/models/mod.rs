// src/models/mod.rs

//! Domain models for the downloader.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod game;
mod report;

// Re-export all public types
pub use config::{Config, DownloadConfig, LoggingConfig, SourceConfig};
pub use game::{
    FIXED_RESOURCES, GameClassification, GameId, GamePlan, ParticipantKind, REGULAR_SEASON,
    ResourceTask,
};
pub use report::{DateOutcome, DownloadReport, PassReport, ProblemStage};
