use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::commands::{extras, reminders, settings, stats};
use crate::bot::handlers::message::send_help;
use crate::bot::handlers::BotState;
use crate::bot::keyboards::MenuButton;
use crate::bot::HandlerResult;
use crate::parser::{resolve, RuleId, FALLBACK_OFFSET_HOURS};
use crate::services::gamification::{record_creation, Achievement};
use crate::services::habits::{analyze, HabitSuggestion};
use crate::services::personality::{Personality, Tone};
use crate::storage::models::{HabitSample, NewReminder, Reminder};
use crate::storage::StoreError;
use crate::utils::datetime::{format_datetime, format_duration};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_store_error, log_store_operation, log_validation_error};
use crate::utils::markdown::{bold, escape_markdown, italic};
use crate::utils::validation::validate_reminder_text;

/// Body used when nothing is left after the time phrase is removed.
pub const DEFAULT_MESSAGE: &str = "Reminder";

/// A freshly stored reminder and what storing it unlocked.
#[derive(Debug, Clone)]
pub struct StoredReminder {
    pub reminder: Reminder,
    pub unlocked: Vec<&'static Achievement>,
    pub suggestion: Option<HabitSuggestion>,
}

/// Stores the reminder, then records the habit sample and creation stats.
///
/// Only a failure to store the reminder itself is returned; bookkeeping
/// failures are logged.
pub(crate) fn store_reminder(
    state: &BotState,
    new: NewReminder,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Result<StoredReminder, StoreError> {
    let chat_id = new.chat_id;
    let reminder = Reminder::create(&state.store, new, now)?;
    log_store_operation("create", "reminders", Some(&reminder.id));

    let local_hour = reminder.due_at.with_timezone(tz).hour();
    if let Err(e) = HabitSample::record(&state.store, chat_id, &reminder.message, local_hour, now) {
        log_store_error("record_habit", "habits", &e.to_string());
    }

    let unlocked = match record_creation(&state.store, chat_id, local_hour) {
        Ok(outcome) => outcome.unlocked,
        Err(e) => {
            log_store_error("record_creation", "stats", &e.to_string());
            Vec::new()
        }
    };

    let suggestion = if reminder.recurrence.is_recurring() {
        None
    } else {
        analyze(&HabitSample::for_chat(&state.store, chat_id)).into_iter().next()
    };

    Ok(StoredReminder {
        reminder,
        unlocked,
        suggestion,
    })
}

/// MarkdownV2 reply confirming a new reminder.
pub fn render_confirmation(
    stored: &StoredReminder,
    personality: Personality,
    tz: &Tz,
    now: DateTime<Utc>,
) -> String {
    let reminder = &stored.reminder;
    let mut text = format!(
        "✅ {}\n\n{} {}\n{} {}\n⏰ {}\n⏳ In {}",
        bold(personality.line(Tone::Confirmation)),
        reminder.priority.emoji(),
        escape_markdown(&reminder.message),
        reminder.category.emoji(),
        escape_markdown(reminder.category.as_str()),
        escape_markdown(&format_datetime(&reminder.due_at, tz)),
        escape_markdown(&format_duration(reminder.due_at - now))
    );

    if reminder.recurrence.is_recurring() {
        text.push_str(&format!("\n🔄 {}", escape_markdown(reminder.recurrence.label())));
    }
    if !reminder.notes.is_empty() {
        text.push_str(&format!("\n📝 {}", italic(&reminder.notes)));
    }
    if !reminder.shared_with.is_empty() {
        let names: Vec<String> = reminder.shared_with.iter().map(|u| format!("@{u}")).collect();
        text.push_str(&format!("\n👥 Shared with {}", escape_markdown(&names.join(", "))));
    }
    if reminder.matched_rule == RuleId::Unresolved {
        text.push_str(&format!(
            "\n\n🤔 {}",
            escape_markdown(&format!(
                "I couldn't spot a time, so I'll remind you in {}h",
                FALLBACK_OFFSET_HOURS
            ))
        ));
    }
    for achievement in &stored.unlocked {
        text.push_str(&format!(
            "\n\n🏆 {} {} \\(\\+{} XP\\)",
            bold("Achievement unlocked:"),
            escape_markdown(achievement.name),
            achievement.xp
        ));
    }
    if let Some(suggestion) = &stored.suggestion {
        text.push_str(&format!(
            "\n\n💡 {}",
            escape_markdown(&format!(
                "You set \"{}\" a lot, usually around {}:00. Try \"every day at {}:00 {}\"",
                suggestion.task, suggestion.hour, suggestion.hour, suggestion.task
            ))
        ));
    }
    text
}

async fn handle_menu_button(bot: &Bot, msg: &Message, button: MenuButton, state: &BotState) -> HandlerResult {
    match button {
        MenuButton::Quick => extras::handle_quick(bot, msg).await,
        MenuButton::List => reminders::handle_list(bot, msg, state).await,
        MenuButton::Today => reminders::handle_today(bot, msg, state).await,
        MenuButton::Stats => stats::handle_stats(bot, msg, state).await,
        MenuButton::Vibe => settings::handle_personality(bot, msg, state).await,
        MenuButton::Badges => stats::handle_achievements(bot, msg, state).await,
        MenuButton::Help => send_help(bot, msg).await,
    }
}

async fn create_reminder(bot: &Bot, msg: &Message, text: &str, state: &BotState) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    if let Err(e) = validate_reminder_text(text) {
        log_validation_error("reminder", "text", text, &e.to_string(), chat_id);
        feedback
            .validation_error(&e.to_string(), "Try something like \"call mom at 7pm\"")
            .await?;
        return Ok(());
    }

    let profile = state.profile(chat_id);
    let tz = profile.tz(state.default_tz);
    let now = Utc::now();
    let resolution = resolve(text, now.with_timezone(&tz));
    tracing::debug!(
        "Resolved reminder for chat {} with rule {}",
        chat_id,
        resolution.schedule.matched_rule
    );

    let message = if resolution.message.is_empty() {
        DEFAULT_MESSAGE.to_string()
    } else {
        resolution.message
    };
    let new = NewReminder {
        chat_id,
        message,
        schedule: resolution.schedule,
        tags: resolution.tags,
    };

    match store_reminder(state, new, &tz, now) {
        Ok(stored) => {
            let reply = format!(
                "{}{}",
                render_confirmation(&stored, profile.personality, &tz, now),
                state.footer()
            );
            bot.send_message(msg.chat.id, reply)
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
        }
        Err(e) => {
            log_store_error("create", "reminders", &e.to_string());
            feedback.error("Couldn't save your reminder. Please try again.").await?;
        }
    }
    Ok(())
}

/// Everything that is not a known command: menu buttons, small talk and
/// reminder requests.
pub async fn handle_general_message(bot: Bot, msg: Message, state: BotState) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = msg.chat.id.0;
    state.remember_sender(chat_id, msg.from());

    if let Some(button) = MenuButton::from_label(text) {
        return handle_menu_button(&bot, &msg, button, &state).await;
    }

    if text.starts_with('/') {
        let command = text.split_whitespace().next().unwrap_or(text);
        log_validation_error("unknown", "command", command, "unknown command", chat_id);
        CommandFeedback::new(bot.clone(), msg.chat.id)
            .validation_error(
                &format!("Unknown command {command}"),
                "Send /help to see everything I can do",
            )
            .await?;
        return Ok(());
    }

    let lowered = text.to_lowercase();
    if lowered.contains("thank") {
        bot.send_message(msg.chat.id, "💖 You're welcome! Happy to help!").await?;
        return Ok(());
    }
    if lowered.contains("lazy") {
        let personality = state.profile(chat_id).personality;
        bot.send_message(msg.chat.id, personality.lazy_reply()).await?;
        return Ok(());
    }

    create_reminder(&bot, &msg, text, &state).await
}
