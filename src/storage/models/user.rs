use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::services::personality::Personality;
use crate::storage::store::{Collection, DataStore, StoreError};

/// Per-chat preferences and progress that are not counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub personality: Personality,
    /// IANA name; `None` means the configured default.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub last_completion: Option<NaiveDate>,
}

impl UserProfile {
    pub fn get(store: &DataStore, chat_id: i64) -> Self {
        store.read(|c| c.users.get(&chat_id).cloned().unwrap_or_default())
    }

    /// The user's timezone, or `default` when unset or no longer valid.
    pub fn tz(&self, default: Tz) -> Tz {
        self.timezone
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
            .unwrap_or(default)
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a == id)
    }

    pub fn set_personality(
        store: &DataStore,
        chat_id: i64,
        personality: Personality,
    ) -> Result<(), StoreError> {
        store.update(&[Collection::Users], |c| {
            c.users.entry(chat_id).or_default().personality = personality;
            Ok(())
        })
    }

    pub fn set_timezone(store: &DataStore, chat_id: i64, tz: Tz) -> Result<(), StoreError> {
        store.update(&[Collection::Users], |c| {
            c.users.entry(chat_id).or_default().timezone = Some(tz.name().to_string());
            Ok(())
        })
    }

    /// Stores the chat's username so reminders shared with `@name` can reach
    /// it. Writes only when the name changed.
    pub fn remember_username(
        store: &DataStore,
        chat_id: i64,
        username: Option<&str>,
    ) -> Result<(), StoreError> {
        let Some(username) = username else {
            return Ok(());
        };
        let known = store.read(|c| {
            c.users
                .get(&chat_id)
                .and_then(|u| u.username.as_deref())
                .is_some_and(|u| u == username)
        });
        if known {
            return Ok(());
        }
        store.update(&[Collection::Users], |c| {
            c.users.entry(chat_id).or_default().username = Some(username.to_string());
            Ok(())
        })
    }

    pub fn chat_for_username(store: &DataStore, username: &str) -> Option<i64> {
        store.read(|c| {
            c.users.iter().find_map(|(chat_id, profile)| {
                profile
                    .username
                    .as_deref()
                    .filter(|name| name.eq_ignore_ascii_case(username))
                    .map(|_| *chat_id)
            })
        })
    }
}
