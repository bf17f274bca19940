use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use teloxide::prelude::*;

use crate::bot::commands::send_long;
use crate::bot::handlers::BotState;
use crate::bot::keyboards::list_actions;
use crate::bot::HandlerResult;
use crate::services::gamification::{level_for, memory_score};
use crate::storage::models::{Reminder, UserStats};
use crate::utils::datetime::{format_clock, format_datetime, format_day};
use crate::utils::markdown::{bold, escape_markdown};

/// Upcoming reminders shown in the digest.
const DIGEST_PREVIEW: usize = 5;
const RULE: &str = "\\=\\=\\=\\=\\=\\=\\=\\=\\=\\=\\=\\=\\=\\=\\=\\=\\=\\=\\=\\=";

fn sender_username(msg: &Message) -> Option<String> {
    msg.from().and_then(|u| u.username.clone())
}

fn active_reminders(msg: &Message, state: &BotState) -> Vec<Reminder> {
    Reminder::active_for_chat(&state.store, msg.chat.id.0, sender_username(msg).as_deref())
}

/// Orders reminders the way `/list` numbers them: by category name, then
/// due time.
pub fn order_for_list(mut reminders: Vec<Reminder>) -> Vec<Reminder> {
    reminders.sort_by(|a, b| {
        a.category
            .as_str()
            .cmp(b.category.as_str())
            .then(a.due_at.cmp(&b.due_at))
    });
    reminders
}

/// Expects reminders in [`order_for_list`] order.
pub fn render_list(reminders: &[Reminder], tz: &Tz) -> String {
    if reminders.is_empty() {
        return "📭 No active reminders\\!".to_string();
    }

    let mut text = format!("📋 {}\n{}\n\n", bold("Your Reminders"), RULE);
    let mut current_category = None;
    for (i, reminder) in reminders.iter().enumerate() {
        if current_category != Some(reminder.category) {
            current_category = Some(reminder.category);
            text.push_str(&format!(
                "{} {}\n",
                reminder.category.emoji(),
                bold(&reminder.category.as_str().to_uppercase())
            ));
        }
        let recurring = if reminder.recurrence.is_recurring() { " 🔄" } else { "" };
        text.push_str(&format!(
            "{}\\. {} {}{}\n   ⏰ {}\n\n",
            i + 1,
            reminder.priority.emoji(),
            escape_markdown(&reminder.message),
            recurring,
            escape_markdown(&format_datetime(&reminder.due_at, tz))
        ));
    }
    text
}

pub fn render_today(reminders: &[Reminder], now: &DateTime<Tz>) -> String {
    let tz = now.timezone();
    let today = now.date_naive();
    let todays: Vec<&Reminder> = reminders
        .iter()
        .filter(|r| r.due_at.with_timezone(&tz).date_naive() == today)
        .collect();

    if todays.is_empty() {
        return format!(
            "📅 {}\n\nNo reminders\\! Enjoy your free time\\! 🎉",
            bold("Today's Schedule")
        );
    }

    let now_utc = now.with_timezone(&Utc);
    let mut text = format!(
        "📅 {} \\- {}\n{}\n\n",
        bold("Today"),
        escape_markdown(&format_day(&now_utc, &tz)),
        RULE
    );
    for (i, reminder) in todays.iter().enumerate() {
        text.push_str(&format!(
            "{}\\. {} {} {}\n   ⏰ {}\n\n",
            i + 1,
            reminder.category.emoji(),
            reminder.priority.emoji(),
            escape_markdown(&reminder.message),
            escape_markdown(&format_clock(&reminder.due_at, &tz))
        ));
    }
    text
}

pub fn render_missed(reminders: &[Reminder], now: DateTime<Utc>) -> String {
    let missed: Vec<&Reminder> = reminders.iter().filter(|r| r.is_missed(now)).collect();
    if missed.is_empty() {
        return "✅ No missed reminders\\! You're all caught up\\!".to_string();
    }

    let mut text = format!("⚠️ {}\n{}\n\n", bold("Overdue Reminders"), RULE);
    for (i, reminder) in missed.iter().enumerate() {
        let hours_ago = (now - reminder.due_at).num_hours();
        text.push_str(&format!(
            "{}\\. {}\n   ⏰ {}h ago\n\n",
            i + 1,
            escape_markdown(&reminder.message),
            hours_ago
        ));
    }
    text
}

pub fn render_digest(reminders: &[Reminder], stats: &UserStats, streak: u32, now: &DateTime<Tz>) -> String {
    let tz = now.timezone();
    let now_utc = now.with_timezone(&Utc);
    let horizon = now_utc + TimeDelta::hours(24);
    let upcoming: Vec<&Reminder> = reminders
        .iter()
        .filter(|r| r.due_at >= now_utc && r.due_at <= horizon)
        .collect();

    let mut text = format!(
        "📊 {} \\- {}\n{}\n\n⭐ Level {} \\| 💎 {} XP \\| 🧠 Score: {}\n\n📝 Active: {} \\| ✅ Completed: {}\n\n{} {} reminders\n\n",
        bold("Daily Digest"),
        escape_markdown(&format_day(&now_utc, &tz)),
        RULE,
        level_for(stats.xp),
        stats.xp,
        memory_score(stats, streak),
        reminders.len(),
        stats.completed,
        bold("📅 Next 24h:"),
        upcoming.len()
    );

    for (i, reminder) in upcoming.iter().take(DIGEST_PREVIEW).enumerate() {
        text.push_str(&format!(
            "{}\\. {} {}\n   ⏰ {}\n",
            i + 1,
            reminder.category.emoji(),
            escape_markdown(&reminder.message),
            escape_markdown(&format_clock(&reminder.due_at, &tz))
        ));
    }
    if upcoming.len() > DIGEST_PREVIEW {
        text.push_str(&format!("\n\\.\\.\\.and {} more\n", upcoming.len() - DIGEST_PREVIEW));
    }
    text
}

pub async fn handle_list(bot: &Bot, msg: &Message, state: &BotState) -> HandlerResult {
    let tz = state.tz_for(msg.chat.id.0);
    let ordered = order_for_list(active_reminders(msg, state));
    let text = format!("{}{}", render_list(&ordered, &tz), state.footer());
    let markup = (!ordered.is_empty()).then(|| list_actions(&ordered));
    send_long(bot, msg.chat.id, &text, markup).await
}

pub async fn handle_today(bot: &Bot, msg: &Message, state: &BotState) -> HandlerResult {
    let now = state.now_for(msg.chat.id.0);
    let text = format!("{}{}", render_today(&active_reminders(msg, state), &now), state.footer());
    send_long(bot, msg.chat.id, &text, None).await
}

pub async fn handle_missed(bot: &Bot, msg: &Message, state: &BotState) -> HandlerResult {
    let text = format!(
        "{}{}",
        render_missed(&active_reminders(msg, state), Utc::now()),
        state.footer()
    );
    send_long(bot, msg.chat.id, &text, None).await
}

pub async fn handle_digest(bot: &Bot, msg: &Message, state: &BotState) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let stats = UserStats::get(&state.store, chat_id);
    let streak = state.profile(chat_id).streak;
    let text = format!(
        "{}{}",
        render_digest(&active_reminders(msg, state), &stats, streak, &state.now_for(chat_id)),
        state.footer()
    );
    send_long(bot, msg.chat.id, &text, None).await
}
