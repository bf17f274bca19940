use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::storage::store::{Collection, DataStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Happy, Mood::Neutral, Mood::Sad];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::Sad => "sad",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Neutral => "😐",
            Mood::Sad => "😞",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "neutral" | "ok" | "meh" => Ok(Mood::Neutral),
            "sad" => Ok(Mood::Sad),
            other => Err(format!("Unknown mood '{}'. Use happy, neutral or sad", other)),
        }
    }
}

/// A day's mood, keyed by local date in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood: Mood,
    #[serde(default)]
    pub note: String,
    pub recorded_at: DateTime<Utc>,
}

impl MoodEntry {
    /// Records the mood for `date`, replacing an earlier entry that day.
    pub fn record(
        store: &DataStore,
        chat_id: i64,
        date: NaiveDate,
        mood: Mood,
        note: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        let entry = MoodEntry {
            mood,
            note: note.trim().to_string(),
            recorded_at: now,
        };
        store.update(&[Collection::Moods], |c| {
            c.moods
                .entry(chat_id)
                .or_default()
                .insert(date.format("%Y-%m-%d").to_string(), entry.clone());
            Ok(())
        })?;
        Ok(entry)
    }

    /// Entries from the `days` days ending at `today`, newest first.
    pub fn recent(store: &DataStore, chat_id: i64, today: NaiveDate, days: u64) -> Vec<(NaiveDate, Self)> {
        store.read(|c| {
            let Some(moods) = c.moods.get(&chat_id) else {
                return Vec::new();
            };
            (0..days)
                .filter_map(|back| today.checked_sub_days(Days::new(back)))
                .filter_map(|date| {
                    moods
                        .get(&date.format("%Y-%m-%d").to_string())
                        .map(|entry| (date, entry.clone()))
                })
                .collect()
        })
    }
}
