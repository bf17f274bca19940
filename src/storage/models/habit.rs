use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::store::{Collection, DataStore, StoreError};

/// Samples kept per chat; older ones are dropped.
pub const MAX_HABIT_SAMPLES: usize = 50;

/// One reminder creation, remembered for habit detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitSample {
    /// Lowercased reminder message.
    pub message: String,
    /// Local hour the reminder was due at.
    pub hour: u32,
    pub recorded_at: DateTime<Utc>,
}

impl HabitSample {
    pub fn record(
        store: &DataStore,
        chat_id: i64,
        message: &str,
        hour: u32,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        store.update(&[Collection::Habits], |c| {
            let samples = c.habits.entry(chat_id).or_default();
            samples.push(HabitSample {
                message: message.to_lowercase(),
                hour,
                recorded_at: now,
            });
            if samples.len() > MAX_HABIT_SAMPLES {
                let excess = samples.len() - MAX_HABIT_SAMPLES;
                samples.drain(..excess);
            }
            Ok(())
        })
    }

    pub fn for_chat(store: &DataStore, chat_id: i64) -> Vec<Self> {
        store.read(|c| c.habits.get(&chat_id).cloned().unwrap_or_default())
    }
}
