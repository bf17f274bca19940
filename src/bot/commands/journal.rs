use chrono::{NaiveDate, Utc};
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::handlers::BotState;
use crate::bot::keyboards::mood_picker;
use crate::bot::HandlerResult;
use crate::storage::models::{Mood, MoodEntry};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_store_error, log_validation_error};
use crate::utils::markdown::{bold, escape_markdown, italic};
use crate::utils::validation::validate_mood;

/// Days covered by `/reflect`.
pub const REFLECT_DAYS: u64 = 7;

pub fn render_reflection(entries: &[(NaiveDate, MoodEntry)]) -> String {
    let mut text = format!("🪞 {}\n\n", bold("Your week"));
    if entries.is_empty() {
        text.push_str("No moods logged yet\\. Try /mood to check in\\!");
        return text;
    }

    for (date, entry) in entries {
        text.push_str(&format!(
            "{} {} \\- {}",
            entry.mood.emoji(),
            escape_markdown(&date.format("%a %b %d").to_string()),
            entry.mood
        ));
        if !entry.note.is_empty() {
            text.push_str(&format!(": {}", italic(&entry.note)));
        }
        text.push('\n');
    }

    let happy = entries.iter().filter(|(_, e)| e.mood == Mood::Happy).count();
    text.push_str(&format!("\n😊 Happy days: {}/{}", happy, entries.len()));
    text
}

/// Reply after a mood is saved.
pub fn mood_saved_text(mood: Mood) -> String {
    format!("{} Mood logged: {}\\. Thanks for checking in\\!", mood.emoji(), bold(mood.as_str()))
}

pub async fn handle_reflect(bot: &Bot, msg: &Message, state: &BotState) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let today = state.now_for(chat_id).date_naive();
    let entries = MoodEntry::recent(&state.store, chat_id, today, REFLECT_DAYS);

    bot.send_message(msg.chat.id, render_reflection(&entries))
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    Ok(())
}

/// `/mood` alone offers buttons; `/mood <mood> [note]` records directly.
pub async fn handle_mood(bot: &Bot, msg: &Message, args: &str, state: &BotState) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let args = args.trim();

    if args.is_empty() {
        bot.send_message(msg.chat.id, "How are you feeling today?")
            .reply_markup(mood_picker())
            .await?;
        return Ok(());
    }

    let (raw_mood, note) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let mood = match validate_mood(raw_mood) {
        Ok(mood) => mood,
        Err(e) => {
            log_validation_error("mood", "mood", raw_mood, &e.to_string(), chat_id);
            feedback
                .validation_error(&e.to_string(), "Try /mood happy, /mood neutral or /mood sad")
                .await?;
            return Ok(());
        }
    };

    let today = state.now_for(chat_id).date_naive();
    match MoodEntry::record(&state.store, chat_id, today, mood, note, Utc::now()) {
        Ok(_) => {
            bot.send_message(msg.chat.id, mood_saved_text(mood))
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
        }
        Err(e) => {
            log_store_error("record_mood", "moods", &e.to_string());
            feedback.error("Couldn't save your mood. Please try again.").await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(mood: Mood, note: &str) -> MoodEntry {
        MoodEntry {
            mood,
            note: note.to_string(),
            recorded_at: Utc.with_ymd_and_hms(2024, 3, 6, 20, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_reflection_empty() {
        assert!(render_reflection(&[]).contains("No moods logged yet"));
    }

    #[test]
    fn test_reflection_lists_days_and_notes() {
        let entries = vec![
            (NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(), entry(Mood::Happy, "shipped it!")),
            (NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), entry(Mood::Sad, "")),
        ];
        let text = render_reflection(&entries);
        assert!(text.contains("😊 Wed Mar 06 \\- happy: _shipped it\\!_"));
        assert!(text.contains("Tue Mar 05 \\- sad\n"));
        assert!(text.ends_with("Happy days: 1/2"));
    }
}
