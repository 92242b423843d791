//! Pipeline entry points.
//!
//! - `expand_dates`: Turn a date range or list into calendar dates
//! - `Downloader`: Mirror every regular-season game for those dates

pub mod dates;
pub mod download;

pub use dates::{Clock, DateSpec, FixedClock, SystemClock, expand_dates};
pub use download::{Downloader, MAX_RETRY_PASSES, run_download};
