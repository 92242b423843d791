//! Service layer for the downloader.
//!
//! This module contains the business logic for:
//! - Date index crawling (`DayCrawler`)
//! - Regular-season classification (`GameClassifier`)
//! - Per-game resource downloading (`GameFetcher`)

mod classifier;
mod days;
mod games;

pub use classifier::GameClassifier;
pub use days::{DayCrawler, DayListing};
pub use games::GameFetcher;
