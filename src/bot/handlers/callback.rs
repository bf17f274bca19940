use chrono::{DateTime, TimeDelta, Utc};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, ParseMode};

use crate::bot::callback_data::CallbackAction;
use crate::bot::commands::journal::mood_saved_text;
use crate::bot::handlers::general_message::{render_confirmation, store_reminder};
use crate::bot::handlers::BotState;
use crate::bot::keyboards::template_delays;
use crate::bot::HandlerResult;
use crate::parser::{ParsedSchedule, Recurrence, ReminderTags, RuleId};
use crate::services::content::template;
use crate::services::gamification::{record_completion, CompletionOutcome};
use crate::services::personality::Tone;
use crate::storage::models::{Completion, MoodEntry, NewReminder, Reminder, UserProfile, UserStats};
use crate::storage::StoreError;
use crate::utils::datetime::format_datetime;
use crate::utils::feedback::{CommandFeedback, FeedbackType};
use crate::utils::logging::{log_store_error, log_validation_error};
use crate::utils::markdown::{bold, escape_markdown};

/// What to show after a button press.
#[derive(Debug, Clone)]
pub struct CallbackReply {
    /// Short toast shown by the Telegram client.
    pub toast: &'static str,
    /// MarkdownV2 replacement for the message text.
    pub text: String,
    pub markup: Option<InlineKeyboardMarkup>,
}

impl CallbackReply {
    fn text(toast: &'static str, text: String) -> Self {
        Self {
            toast,
            text,
            markup: None,
        }
    }
}

fn render_completion(reminder: &Reminder, outcome: &CompletionOutcome, line: &str, tz: &chrono_tz::Tz) -> String {
    let mut text = format!(
        "🎉 {}\n\n✅ {}\n💎 \\+{} XP \\| 🔥 Streak: {}",
        bold(line),
        escape_markdown(&reminder.message),
        outcome.xp_gained,
        outcome.streak
    );
    if outcome.leveled_up {
        text.push_str(&format!("\n\n⭐ {}", bold(&format!("Level up! You're now level {}", outcome.level))));
    }
    for achievement in &outcome.unlocked {
        text.push_str(&format!(
            "\n🏆 {} \\(\\+{} XP\\)",
            escape_markdown(achievement.name),
            achievement.xp
        ));
    }
    if reminder.recurrence.is_recurring() {
        text.push_str(&format!(
            "\n\n🔄 Next: {}",
            escape_markdown(&format_datetime(&reminder.due_at, tz))
        ));
    }
    text
}

/// Applies a button press for `chat_id` and renders the result.
pub fn apply_action(
    state: &BotState,
    chat_id: i64,
    action: CallbackAction,
    now: DateTime<Utc>,
) -> Result<CallbackReply, StoreError> {
    let profile = state.profile(chat_id);
    let tz = profile.tz(state.default_tz);

    let reply = match action {
        CallbackAction::Complete(id) => match Reminder::complete(&state.store, &id)? {
            Completion::Done(reminder) => {
                let today = now.with_timezone(&tz).date_naive();
                let outcome = record_completion(&state.store, chat_id, today)?;
                let line = profile.personality.line(Tone::Completion);
                CallbackReply::text("Done! 🎉", render_completion(&reminder, &outcome, line, &tz))
            }
            Completion::AlreadyDone(reminder) => CallbackReply::text(
                "Already done ✅",
                format!("✅ Already done: {}", escape_markdown(&reminder.message)),
            ),
        },
        CallbackAction::Delete(id) => {
            let reminder = Reminder::delete(&state.store, &id)?;
            CallbackReply::text(
                "Deleted",
                format!("🗑️ Deleted: {}", escape_markdown(&reminder.message)),
            )
        }
        CallbackAction::Dismiss(id) => {
            let reminder = Reminder::delete(&state.store, &id)?;
            CallbackReply::text(
                "Dismissed",
                format!("👋 Dismissed: {}", escape_markdown(&reminder.message)),
            )
        }
        CallbackAction::Snooze { id, minutes } => {
            let reminder = Reminder::snooze(&state.store, &id, minutes, now)?;
            UserStats::record_snooze(&state.store, chat_id)?;
            CallbackReply::text(
                "Snoozed 😴",
                format!(
                    "😴 Snoozed for {} min\n\n{}\n⏰ {}",
                    minutes,
                    escape_markdown(&reminder.message),
                    escape_markdown(&format_datetime(&reminder.due_at, &tz))
                ),
            )
        }
        CallbackAction::Personality(personality) => {
            UserProfile::set_personality(&state.store, chat_id, personality)?;
            CallbackReply::text(
                "Vibe updated",
                format!(
                    "🎭 Vibe set to {}\n\n{}",
                    bold(personality.name()),
                    escape_markdown(personality.line(Tone::Confirmation))
                ),
            )
        }
        CallbackAction::Quick(key) => {
            let template = template(&key).ok_or(StoreError::NotFound(key))?;
            CallbackReply {
                toast: template.button,
                text: format!("{}\n\nWhen should I remind you?", bold(template.text)),
                markup: Some(template_delays(template)),
            }
        }
        CallbackAction::Template { key, minutes } => {
            let template = template(&key).ok_or(StoreError::NotFound(key))?;
            let due_at = now + TimeDelta::minutes(i64::from(minutes));
            let new = NewReminder {
                chat_id,
                message: template.text.to_string(),
                schedule: ParsedSchedule {
                    due_at,
                    recurrence: Recurrence::None,
                    matched_rule: RuleId::RelativeDuration,
                },
                tags: ReminderTags {
                    category: template.category,
                    ..ReminderTags::default()
                },
            };
            let stored = store_reminder(state, new, &tz, now)?;
            CallbackReply::text(
                "Reminder set ✅",
                render_confirmation(&stored, profile.personality, &tz, now),
            )
        }
        CallbackAction::Mood(mood) => {
            let today = now.with_timezone(&tz).date_naive();
            MoodEntry::record(&state.store, chat_id, today, mood, "", now)?;
            CallbackReply::text("Mood logged", mood_saved_text(mood))
        }
    };
    Ok(reply)
}

pub async fn callback_handler(bot: Bot, q: CallbackQuery, state: BotState) -> HandlerResult {
    let Some(data) = q.data.clone() else {
        return Ok(());
    };
    let chat_id = q
        .message
        .as_ref()
        .map(|m| m.chat.id)
        .unwrap_or(ChatId(q.from.id.0 as i64));
    let username = q.from.username.as_deref().unwrap_or("unknown");
    tracing::info!(
        "Callback received: '{}' from user {} ({}) in chat {}",
        data,
        username,
        q.from.id.0,
        chat_id.0
    );
    state.remember_sender(chat_id.0, Some(&q.from));

    let feedback = CommandFeedback::new(bot.clone(), chat_id);
    let action = match data.parse::<CallbackAction>() {
        Ok(action) => action,
        Err(e) => {
            log_validation_error("callback", "data", &data, &e.to_string(), chat_id.0);
            bot.answer_callback_query(q.id).text("❌ Invalid action").await?;
            return Ok(());
        }
    };

    let reply = match apply_action(&state, chat_id.0, action, Utc::now()) {
        Ok(reply) => reply,
        Err(StoreError::NotFound(what)) => {
            tracing::warn!("Callback target {} not found", what);
            bot.answer_callback_query(q.id).text("❌ Not found").await?;
            match &q.message {
                Some(message) => {
                    feedback
                        .update_message(message.id, FeedbackType::Error, "Not found. It may have been deleted already.")
                        .await?;
                }
                None => {
                    feedback.error("Not found. It may have been deleted already.").await?;
                }
            }
            return Ok(());
        }
        Err(e) => {
            log_store_error("callback", "store", &e.to_string());
            bot.answer_callback_query(q.id).text("❌ Something went wrong").await?;
            feedback.error("Something went wrong saving that. Please try again.").await?;
            return Ok(());
        }
    };

    bot.answer_callback_query(q.id).text(reply.toast).await?;
    match &q.message {
        Some(message) => {
            let mut request = bot
                .edit_message_text(chat_id, message.id, reply.text)
                .parse_mode(ParseMode::MarkdownV2);
            if let Some(markup) = reply.markup {
                request = request.reply_markup(markup);
            }
            request.await?;
        }
        None => {
            let mut request = bot
                .send_message(chat_id, reply.text)
                .parse_mode(ParseMode::MarkdownV2);
            if let Some(markup) = reply.markup {
                request = request.reply_markup(markup);
            }
            request.await?;
        }
    }
    Ok(())
}
