// src/models/report.rs

//! Per-date outcomes and run summaries.

use chrono::NaiveDate;
use serde::Serialize;

/// Stage at which a date hit a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemStage {
    Listing,
    Classification,
    Download,
}

/// Terminal state of one date within a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DateOutcome {
    /// The date index does not exist.
    Skipped,
    /// Every eligible game was downloaded.
    Done { candidates: usize, games: usize },
    /// Abandoned on a timeout; `games` were written before that point.
    Problem { stage: ProblemStage, games: usize },
}

impl DateOutcome {
    pub fn is_problem(&self) -> bool {
        matches!(self, Self::Problem { .. })
    }

    pub fn games(&self) -> usize {
        match self {
            Self::Skipped => 0,
            Self::Done { games, .. } | Self::Problem { games, .. } => *games,
        }
    }
}

/// Summary of a single pass over a list of dates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassReport {
    pub dates: Vec<(NaiveDate, DateOutcome)>,
}

impl PassReport {
    pub fn record(&mut self, date: NaiveDate, outcome: DateOutcome) {
        self.dates.push((date, outcome));
    }

    /// Dates abandoned because of a timeout, in processing order.
    pub fn problems(&self) -> Vec<NaiveDate> {
        self.dates
            .iter()
            .filter(|(_, outcome)| outcome.is_problem())
            .map(|(date, _)| *date)
            .collect()
    }

    pub fn games_downloaded(&self) -> usize {
        self.dates.iter().map(|(_, outcome)| outcome.games()).sum()
    }
}

/// Summary of a full run: the first pass plus at most one retry pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DownloadReport {
    pub passes: Vec<PassReport>,
}

impl DownloadReport {
    /// Problem dates left after the last pass.
    pub fn remaining_problems(&self) -> Vec<NaiveDate> {
        self.passes.last().map(PassReport::problems).unwrap_or_default()
    }

    pub fn games_downloaded(&self) -> usize {
        self.passes.iter().map(PassReport::games_downloaded).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2012, 9, d).unwrap()
    }

    #[test]
    fn test_problems_keep_order() {
        let mut pass = PassReport::default();
        pass.record(day(18), DateOutcome::Skipped);
        pass.record(
            day(19),
            DateOutcome::Problem {
                stage: ProblemStage::Download,
                games: 2,
            },
        );
        pass.record(day(20), DateOutcome::Done { candidates: 5, games: 3 });
        pass.record(
            day(21),
            DateOutcome::Problem {
                stage: ProblemStage::Listing,
                games: 0,
            },
        );

        assert_eq!(pass.problems(), vec![day(19), day(21)]);
        assert_eq!(pass.games_downloaded(), 5);
    }

    #[test]
    fn test_report_serializes_outcome_tags() {
        let mut pass = PassReport::default();
        pass.record(day(18), DateOutcome::Skipped);
        let json = serde_json::to_string(&DownloadReport { passes: vec![pass] }).unwrap();
        assert!(json.contains("\"2012-09-18\""));
        assert!(json.contains("\"state\":\"skipped\""));
    }
}
