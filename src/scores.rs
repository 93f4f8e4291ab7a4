//! Scoreboard persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::ScoreError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

/// Somewhere scores can be read from and written to.
pub trait ScoreStore {
    /// All entries, best first.
    fn load_scores(&self) -> Result<Vec<ScoreEntry>, ScoreError>;

    /// Records `score` for `name`, replacing any previous entry with that
    /// name. Zero scores are not recorded.
    fn save_score(&mut self, name: &str, score: u32) -> Result<(), ScoreError>;
}

/// Scores kept as a JSON array in a single file.
#[derive(Clone, Debug)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.space_insiders_scores.json`, or the working directory when
    /// `HOME` is unset.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".space_insiders_scores.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonScoreStore {
    fn load_scores(&self) -> Result<Vec<ScoreEntry>, ScoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut entries: Vec<ScoreEntry> = serde_json::from_str(&text)?;
        sort_entries(&mut entries);
        Ok(entries)
    }

    fn save_score(&mut self, name: &str, score: u32) -> Result<(), ScoreError> {
        if score == 0 {
            debug!(name, "zero score not recorded");
            return Ok(());
        }

        let mut entries = self.load_scores()?;
        match entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.score = score,
            None => entries.push(ScoreEntry {
                name: name.to_string(),
                score,
            }),
        }
        sort_entries(&mut entries);

        // Written beside the target and renamed over it, so a crash leaves
        // either the old board or the new one.
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &entries)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!(name, score, path = %self.path.display(), "score saved");
        Ok(())
    }
}

/// Best first; equal scores keep their relative order.
fn sort_entries(entries: &mut [ScoreEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Loads the scoreboard for display, treating a broken file as empty.
pub fn load_or_empty(store: &impl ScoreStore) -> Vec<ScoreEntry> {
    store.load_scores().unwrap_or_else(|e| {
        warn!(error = %e, "could not read scores");
        Vec::new()
    })
}
