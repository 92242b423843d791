//! Local filesystem mirror.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! └── YYYY/
//!     └── MM/
//!         └── DD/
//!             └── gid_.../
//!                 ├── boxscore.xml
//!                 ├── game.xml
//!                 ├── players.xml
//!                 ├── inning_all.xml
//!                 ├── batters/{id}.xml
//!                 └── pitchers/{id}.xml
//! ```

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{GameId, ParticipantKind};

/// Filesystem materializer rooted at the destination directory.
#[derive(Debug, Clone)]
pub struct LocalMirror {
    root_dir: PathBuf,
}

impl LocalMirror {
    /// Create a new LocalMirror rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// `{root}/YYYY/MM/DD`
    pub fn day_dir(&self, date: NaiveDate) -> PathBuf {
        self.root_dir
            .join(date.year().to_string())
            .join(format!("{:02}", date.month()))
            .join(format!("{:02}", date.day()))
    }

    pub fn game_dir(&self, day_dir: &Path, game: &GameId) -> PathBuf {
        day_dir.join(game.as_str())
    }

    pub fn participant_dir(game_dir: &Path, kind: ParticipantKind) -> PathBuf {
        game_dir.join(kind.dir_name())
    }

    /// Ensure a directory exists. Pre-existing directories are success.
    pub async fn ensure_dir(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path).await?;
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    ///
    /// The parent directory must already exist.
    pub async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        match path.parent() {
            Some(parent) if tokio::fs::try_exists(parent).await? => {}
            _ => {
                return Err(AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("parent directory of {} does not exist", path.display()),
                )));
            }
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Remove a directory tree, ignoring a missing directory.
    pub async fn remove_dir(&self, path: &Path) -> Result<()> {
        match tokio::fs::remove_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
