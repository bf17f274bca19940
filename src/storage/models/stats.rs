use serde::{Deserialize, Serialize};

use crate::storage::store::{Collection, DataStore, StoreError};

/// Counters shown by `/stats` and used for XP and the leaderboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub snoozed: u64,
    #[serde(default)]
    pub xp: u64,
}

impl UserStats {
    pub fn get(store: &DataStore, chat_id: i64) -> Self {
        store.read(|c| c.stats.get(&chat_id).copied().unwrap_or_default())
    }

    /// Completed over created, in percent.
    pub fn completion_rate(&self) -> f64 {
        if self.created == 0 {
            0.0
        } else {
            self.completed as f64 / self.created as f64 * 100.0
        }
    }

    pub fn record_snooze(store: &DataStore, chat_id: i64) -> Result<Self, StoreError> {
        store.update(&[Collection::Stats], |c| {
            let stats = c.stats.entry(chat_id).or_default();
            stats.snoozed += 1;
            Ok(*stats)
        })
    }
}
