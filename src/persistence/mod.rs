//! Unlock progress persistence
//!
//! Features:
//! - `ProgressStore` trait so the session never touches storage directly
//! - In-memory store for tests and ephemeral hosts
//! - JSON file store (a plain array of level ids, like the browser save)
//! - Missing or corrupt saves fall back to the default unlock set

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ProgressError;
use crate::progress::UnlockedLevels;

/// Where unlocked levels are read at startup and written after a win
pub trait ProgressStore {
    fn load(&self) -> Result<UnlockedLevels, ProgressError>;
    fn save(&mut self, levels: &UnlockedLevels) -> Result<(), ProgressError>;
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    levels: Option<UnlockedLevels>,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_levels(levels: UnlockedLevels) -> Self {
        Self {
            levels: Some(levels),
            saves: 0,
        }
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<UnlockedLevels, ProgressError> {
        Ok(self.levels.clone().unwrap_or_default())
    }

    fn save(&mut self, levels: &UnlockedLevels) -> Result<(), ProgressError> {
        self.levels = Some(levels.clone());
        self.saves += 1;
        Ok(())
    }
}

/// JSON file holding the unlocked level ids
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
}

impl ProgressStore for JsonFileStore {
    fn load(&self) -> Result<UnlockedLevels, ProgressError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No progress at {}, starting fresh", self.path.display());
                return Ok(UnlockedLevels::default());
            }
            Err(err) => return Err(err.into()),
        };
        let ids: Vec<u32> = serde_json::from_str(&data)?;
        let levels = UnlockedLevels::from_ids(ids);
        log::info!("Loaded {} unlocked levels", levels.len());
        Ok(levels)
    }

    fn save(&mut self, levels: &UnlockedLevels) -> Result<(), ProgressError> {
        let json = serde_json::to_string(levels)?;
        // Write to a sibling file first so a crash never leaves a torn save
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("Progress saved ({} levels)", levels.len());
        Ok(())
    }
}

/// Load progress, logging and defaulting on any error
pub fn load_or_default(store: &dyn ProgressStore) -> UnlockedLevels {
    match store.load() {
        Ok(levels) => levels,
        Err(err) => {
            log::warn!("Failed to load progress, using defaults: {}", err);
            UnlockedLevels::default()
        }
    }
}
