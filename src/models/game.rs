// src/models/game.rs

//! Game-level data structures.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Opaque identifier of a remote game record, e.g. `gid_2012_06_10_nynmlb_nyamlb_1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value of `game_type` marking a regular-season game.
pub const REGULAR_SEASON: &str = "R";

/// Eligibility of a candidate game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameClassification {
    /// No boxscore exists for the game.
    NotFound,
    /// The game exists but belongs to another category (postseason, all-star, ...).
    WrongCategory(String),
    /// The game exists and is a regular-season game.
    Eligible,
}

impl GameClassification {
    /// Classify a `game_type` attribute value (`None` if the attribute is absent).
    pub fn from_game_type(game_type: Option<&str>) -> Self {
        match game_type {
            Some(REGULAR_SEASON) => Self::Eligible,
            Some(other) => Self::WrongCategory(other.to_string()),
            None => Self::WrongCategory(String::new()),
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

/// One side of a game's participant listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticipantKind {
    Batters,
    Pitchers,
}

impl ParticipantKind {
    pub const ALL: [ParticipantKind; 2] = [ParticipantKind::Batters, ParticipantKind::Pitchers];

    /// Directory name, both remotely and locally.
    pub fn dir_name(self) -> &'static str {
        match self {
            ParticipantKind::Batters => "batters",
            ParticipantKind::Pitchers => "pitchers",
        }
    }
}

/// One file to fetch and materialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTask {
    pub url: String,
    pub dest: PathBuf,
}

/// Fixed per-game resources as (remote path, local file name).
pub const FIXED_RESOURCES: [(&str, &str); 4] = [
    ("boxscore.xml", "boxscore.xml"),
    ("game.xml", "game.xml"),
    ("players.xml", "players.xml"),
    ("inning/inning_all.xml", "inning_all.xml"),
];

/// The complete, discovered resource set for one game.
#[derive(Debug, Clone)]
pub struct GamePlan {
    pub game: GameId,
    pub tasks: Vec<ResourceTask>,
    pub batters: usize,
    pub pitchers: usize,
}

impl GamePlan {
    /// Build the task set from discovered participant file names.
    ///
    /// Repeated names within one listing yield a single task.
    pub fn build(
        game: GameId,
        game_url: &str,
        root: &Path,
        batters: &[String],
        pitchers: &[String],
    ) -> Self {
        let mut tasks: Vec<ResourceTask> = FIXED_RESOURCES
            .iter()
            .map(|(remote, local)| ResourceTask {
                url: format!("{game_url}/{remote}"),
                dest: root.join(local),
            })
            .collect();

        let mut counts = [0; 2];
        for (count, (kind, files)) in counts.iter_mut().zip([
            (ParticipantKind::Batters, batters),
            (ParticipantKind::Pitchers, pitchers),
        ]) {
            let dir = kind.dir_name();
            let mut seen = HashSet::new();
            for file in files.iter().filter(|f| seen.insert(f.as_str())) {
                tasks.push(ResourceTask {
                    url: format!("{game_url}/{dir}/{file}"),
                    dest: root.join(dir).join(file),
                });
                *count += 1;
            }
        }

        Self {
            game,
            tasks,
            batters: counts[0],
            pitchers: counts[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_game_type() {
        assert_eq!(
            GameClassification::from_game_type(Some("R")),
            GameClassification::Eligible
        );
        assert_eq!(
            GameClassification::from_game_type(Some("D")),
            GameClassification::WrongCategory("D".into())
        );
        assert!(!GameClassification::from_game_type(None).is_eligible());
    }

    #[test]
    fn test_plan_has_n_plus_m_plus_four_tasks() {
        let batters: Vec<String> = vec!["121250.xml".into(), "579799.xml".into(), "1.xml".into()];
        let pitchers: Vec<String> = vec!["110683.xml".into()];
        let plan = GamePlan::build(
            GameId::new("gid_x"),
            "http://host/day_10/gid_x",
            Path::new("/out/gid_x"),
            &batters,
            &pitchers,
        );

        assert_eq!(plan.tasks.len(), 3 + 1 + 4);
        assert!(plan.tasks.contains(&ResourceTask {
            url: "http://host/day_10/gid_x/inning/inning_all.xml".into(),
            dest: PathBuf::from("/out/gid_x/inning_all.xml"),
        }));
        assert!(plan.tasks.contains(&ResourceTask {
            url: "http://host/day_10/gid_x/pitchers/110683.xml".into(),
            dest: PathBuf::from("/out/gid_x/pitchers/110683.xml"),
        }));
    }

    #[test]
    fn test_plan_skips_repeated_listing_entries() {
        let batters: Vec<String> = vec!["1.xml".into(), "2.xml".into(), "1.xml".into()];
        let pitchers: Vec<String> = vec!["2.xml".into(), "2.xml".into()];
        let plan = GamePlan::build(
            GameId::new("gid_x"),
            "http://host/gid_x",
            Path::new("/out/gid_x"),
            &batters,
            &pitchers,
        );

        assert_eq!((plan.batters, plan.pitchers), (2, 1));
        assert_eq!(plan.tasks.len(), 2 + 1 + 4);
        let dests: HashSet<&PathBuf> = plan.tasks.iter().map(|t| &t.dest).collect();
        assert_eq!(dests.len(), plan.tasks.len());
    }
}
