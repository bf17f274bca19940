use anyhow::{anyhow, Result};
use chrono_tz::Tz;

use crate::storage::models::Mood;

pub const MAX_REMINDER_LENGTH: usize = 1000;
pub const MAX_SNOOZE_MINUTES: u32 = 24 * 60;

pub fn validate_reminder_text(text: &str) -> Result<()> {
    let text = text.trim();

    if text.is_empty() {
        return Err(anyhow!("Reminder text cannot be empty"));
    }

    if text.chars().count() > MAX_REMINDER_LENGTH {
        return Err(anyhow!(
            "Reminder text cannot be longer than {} characters",
            MAX_REMINDER_LENGTH
        ));
    }

    Ok(())
}

pub fn validate_timezone(name: &str) -> Result<Tz> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("Timezone cannot be empty"));
    }

    name.parse::<Tz>()
        .map_err(|_| anyhow!("Unknown timezone '{}'", name))
}

pub fn validate_mood(mood: &str) -> Result<Mood> {
    mood.parse::<Mood>().map_err(|e| anyhow!(e))
}

pub fn validate_snooze_minutes(raw: &str) -> Result<u32> {
    let minutes: u32 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow!("Snooze duration '{}' is not a number", raw))?;

    if minutes == 0 || minutes > MAX_SNOOZE_MINUTES {
        return Err(anyhow!(
            "Snooze duration must be between 1 and {} minutes",
            MAX_SNOOZE_MINUTES
        ));
    }

    Ok(minutes)
}

pub fn validate_reminder_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(anyhow!("Reminder ID cannot be empty"));
    }

    if id.len() > 64 {
        return Err(anyhow!("Reminder ID cannot be longer than 64 characters"));
    }

    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(anyhow!("Reminder ID can only contain letters, numbers, and hyphens"));
    }

    Ok(())
}
