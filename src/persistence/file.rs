//! JSON file high score store
//!
//! The score is wrapped in a small versioned envelope. Writes go to a
//! temporary file first and are renamed over the save, so a crash mid-write
//! leaves the previous score intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::HighScoreStore;
use crate::error::SimError;

/// Current envelope version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    high_score: u64,
}

/// High score persisted as JSON on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored score; a missing file is not an error
    pub fn read(&self) -> Result<Option<u64>, SimError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let envelope: Envelope = serde_json::from_str(&json)?;
        if envelope.version != SAVE_VERSION {
            return Err(SimError::UnsupportedSaveVersion(envelope.version));
        }
        Ok(Some(envelope.high_score))
    }

    /// Write the score through a temporary file
    pub fn write(&self, high_score: u64) -> Result<(), SimError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let envelope = Envelope {
            version: SAVE_VERSION,
            high_score,
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl HighScoreStore for JsonFileStore {
    fn load_high_score(&mut self) -> u64 {
        match self.read() {
            Ok(Some(score)) => {
                log::info!("Loaded high score {score} from {}", self.path.display());
                score
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(err) => {
                log::warn!("Ignoring high score file {}: {err}", self.path.display());
                0
            }
        }
    }

    fn save_high_score(&mut self, score: u64) {
        match self.write(score) {
            Ok(()) => log::info!("High score {score} saved"),
            Err(err) => log::warn!("Failed to save high score to {}: {err}", self.path.display()),
        }
    }
}
