//! Level unlock progress
//!
//! Persisted through a [`crate::persistence::ProgressStore`]; the reported
//! score is the number of levels ever unlocked, not raw points.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::consts::LEVEL_COUNT;

/// Set of unlocked level ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnlockedLevels {
    levels: BTreeSet<u32>,
}

impl Default for UnlockedLevels {
    /// Level 0 is always playable
    fn default() -> Self {
        Self {
            levels: BTreeSet::from([0]),
        }
    }
}

impl UnlockedLevels {
    /// Storage key, kept from the browser game so saves carry over
    pub const STORAGE_KEY: &'static str = "brickbreaker_unlocked_maps";

    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored ids, dropping unknown levels and re-adding level 0
    pub fn from_ids(ids: impl IntoIterator<Item = u32>) -> Self {
        let mut levels: BTreeSet<u32> = ids.into_iter().filter(|&id| id < LEVEL_COUNT).collect();
        levels.insert(0);
        Self { levels }
    }

    /// Unlock a level. Returns false when it was already unlocked or unknown.
    pub fn unlock(&mut self, level: u32) -> bool {
        if level >= LEVEL_COUNT {
            return false;
        }
        self.levels.insert(level)
    }

    pub fn contains(&self, level: u32) -> bool {
        self.levels.contains(&level)
    }

    /// Score submitted on every terminal transition
    pub fn score(&self) -> usize {
        self.levels.len()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Never true: level 0 is always present
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.iter().copied()
    }
}
