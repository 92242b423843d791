// src/pipeline/dates.rs

//! Date specification and expansion.

use chrono::{Days, Local, NaiveDate};

use crate::error::{AppError, Result};

/// Accepted input format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of "today", injectable for tests.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// How the caller's date strings are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSpec {
    /// `[start]` or `[start, end]`, inclusive. A lone start runs through yesterday.
    Range(Vec<String>),
    /// Explicit dates, processed in the given order.
    List(Vec<String>),
}

impl DateSpec {
    pub fn new(dates: Vec<String>, date_list: bool) -> Self {
        if date_list {
            Self::List(dates)
        } else {
            Self::Range(dates)
        }
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|source| AppError::DateParse {
        input: input.to_string(),
        source,
    })
}

/// Every day from `start` through `end`; empty if `start > end`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Expand a date specification into calendar dates.
pub fn expand_dates(spec: &DateSpec, today: NaiveDate) -> Result<Vec<NaiveDate>> {
    match spec {
        DateSpec::List(dates) => dates.iter().map(|d| parse_date(d)).collect(),
        DateSpec::Range(dates) => match dates.as_slice() {
            [] => Err(AppError::invalid_argument("requires at least one date")),
            [start] => {
                let start = parse_date(start)?;
                let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
                Ok(date_range(start, yesterday))
            }
            [start, end] => Ok(date_range(parse_date(start)?, parse_date(end)?)),
            _ => Err(AppError::invalid_argument("too many dates; use list mode")),
        },
    }
}
