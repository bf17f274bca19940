use anyhow::{anyhow, Result};
use std::str::FromStr;

use crate::services::personality::Personality;
use crate::storage::models::Mood;
use crate::utils::validation::{validate_mood, validate_reminder_id, validate_snooze_minutes};

/// Payload of an inline button, encoded as `:`-separated fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Complete(String),
    Delete(String),
    Dismiss(String),
    Snooze { id: String, minutes: u32 },
    Personality(Personality),
    Quick(String),
    Template { key: String, minutes: u32 },
    Mood(Mood),
}

impl CallbackAction {
    pub fn to_data(&self) -> String {
        match self {
            CallbackAction::Complete(id) => format!("complete:{id}"),
            CallbackAction::Delete(id) => format!("delete:{id}"),
            CallbackAction::Dismiss(id) => format!("dismiss:{id}"),
            CallbackAction::Snooze { id, minutes } => format!("snooze:{id}:{minutes}"),
            CallbackAction::Personality(p) => format!("personality:{}", p.key()),
            CallbackAction::Quick(key) => format!("quick:{key}"),
            CallbackAction::Template { key, minutes } => format!("template:{key}:{minutes}"),
            CallbackAction::Mood(mood) => format!("mood:{mood}"),
        }
    }
}

fn reminder_id(raw: &str) -> Result<String> {
    validate_reminder_id(raw)?;
    Ok(raw.to_string())
}

impl FromStr for CallbackAction {
    type Err = anyhow::Error;

    fn from_str(data: &str) -> Result<Self> {
        let parts: Vec<&str> = data.split(':').collect();
        match parts.as_slice() {
            ["complete", id] => Ok(CallbackAction::Complete(reminder_id(id)?)),
            ["delete", id] => Ok(CallbackAction::Delete(reminder_id(id)?)),
            ["dismiss", id] => Ok(CallbackAction::Dismiss(reminder_id(id)?)),
            ["snooze", id, minutes] => Ok(CallbackAction::Snooze {
                id: reminder_id(id)?,
                minutes: validate_snooze_minutes(minutes)?,
            }),
            ["personality", key] => Ok(CallbackAction::Personality(
                key.parse().map_err(|e: String| anyhow!(e))?,
            )),
            ["quick", key] if !key.is_empty() => Ok(CallbackAction::Quick(key.to_string())),
            ["template", key, minutes] if !key.is_empty() => Ok(CallbackAction::Template {
                key: key.to_string(),
                minutes: validate_snooze_minutes(minutes)?,
            }),
            ["mood", mood] => Ok(CallbackAction::Mood(validate_mood(mood)?)),
            _ => Err(anyhow!("Invalid callback data '{}'", data)),
        }
    }
}
