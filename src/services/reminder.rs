use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::{ApiError, RequestError};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::bot::keyboards::reminder_actions;
use crate::services::personality::{Personality, Tone};
use crate::storage::models::{Reminder, UserProfile};
use crate::storage::DataStore;
use crate::utils::logging::{log_delivery, log_store_error};
use crate::utils::markdown::{bold, escape_markdown, italic};

type ServiceResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Periodically delivers due reminders.
pub struct ReminderService {
    bot: Bot,
    store: DataStore,
    default_tz: Tz,
    interval: Duration,
    scheduler: JobScheduler,
}

impl ReminderService {
    pub async fn new(bot: Bot, store: DataStore, default_tz: Tz, interval: Duration) -> ServiceResult<Self> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            bot,
            store,
            default_tz,
            interval,
            scheduler,
        })
    }

    pub async fn start(&mut self) -> ServiceResult<()> {
        let bot = self.bot.clone();
        let store = self.store.clone();
        let default_tz = self.default_tz;

        let scan_job = Job::new_repeated_async(self.interval, move |_uuid, _l| {
            let bot = bot.clone();
            let store = store.clone();
            Box::pin(async move {
                let sent = deliver_due_reminders(&bot, &store, default_tz, Utc::now()).await;
                if sent > 0 {
                    tracing::debug!("Delivered {} due reminders", sent);
                }
            })
        })?;

        self.scheduler.add(scan_job).await?;
        self.scheduler.start().await?;

        tracing::info!(
            "Reminder service started - scanning every {}s",
            self.interval.as_secs()
        );
        Ok(())
    }

    pub async fn stop(&mut self) -> ServiceResult<()> {
        self.scheduler.shutdown().await?;
        Ok(())
    }

    /// Runs one scan immediately.
    pub async fn check_reminders_now(&self) -> usize {
        deliver_due_reminders(&self.bot, &self.store, self.default_tz, Utc::now()).await
    }
}

/// Outcome of sending one ping to one chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    /// Transient failure; worth another try on the next scan.
    Retry,
    /// The chat blocked the bot or no longer exists.
    Unreachable,
}

impl SendOutcome {
    pub fn from_error(error: &RequestError) -> Self {
        match error {
            RequestError::Api(
                ApiError::BotBlocked
                | ApiError::BotKicked
                | ApiError::ChatNotFound
                | ApiError::UserDeactivated,
            ) => SendOutcome::Unreachable,
            _ => SendOutcome::Retry,
        }
    }
}

/// A reminder counts as delivered once any recipient got it, or when no
/// recipient can ever get it. Otherwise it stays due so nobody is pinged
/// twice for one occurrence.
pub fn delivery_settled(outcomes: &[SendOutcome]) -> bool {
    outcomes.contains(&SendOutcome::Sent) || !outcomes.contains(&SendOutcome::Retry)
}

/// Sends every due reminder and records the delivery. Returns how many
/// reminders were settled.
pub async fn deliver_due_reminders(bot: &Bot, store: &DataStore, default_tz: Tz, now: DateTime<Utc>) -> usize {
    let mut delivered = 0;

    for reminder in Reminder::due(store, now) {
        let mut outcomes = Vec::new();
        for chat_id in recipients(store, &reminder) {
            let personality = UserProfile::get(store, chat_id).personality;
            let result = bot
                .send_message(ChatId(chat_id), ping_text(&reminder, personality))
                .parse_mode(ParseMode::MarkdownV2)
                .reply_markup(reminder_actions(&reminder.id))
                .await;

            match result {
                Ok(_) => {
                    log_delivery(&reminder.id, chat_id, Ok(()));
                    outcomes.push(SendOutcome::Sent);
                }
                Err(e) => {
                    log_delivery(&reminder.id, chat_id, Err(&e.to_string()));
                    outcomes.push(SendOutcome::from_error(&e));
                }
            }
        }

        if !delivery_settled(&outcomes) {
            continue;
        }
        let tz = UserProfile::get(store, reminder.chat_id).tz(default_tz);
        match Reminder::mark_delivered(store, &reminder.id, now, &tz) {
            Ok(_) => delivered += 1,
            Err(e) => log_store_error("mark_delivered", "reminders", &e.to_string()),
        }
    }

    delivered
}

/// The owner first, then every known chat the reminder is shared with.
pub fn recipients(store: &DataStore, reminder: &Reminder) -> Vec<i64> {
    let mut chats = vec![reminder.chat_id];
    for username in &reminder.shared_with {
        if let Some(chat_id) = UserProfile::chat_for_username(store, username) {
            if !chats.contains(&chat_id) {
                chats.push(chat_id);
            }
        }
    }
    chats
}

/// MarkdownV2 body of a reminder notification.
pub fn ping_text(reminder: &Reminder, personality: Personality) -> String {
    let mut text = format!(
        "🔔 {} {}\n\n{}",
        bold(personality.line(Tone::Ping)),
        reminder.priority.emoji(),
        escape_markdown(&reminder.message)
    );
    if !reminder.notes.is_empty() {
        text.push_str(&format!("\n📝 {}", italic(&reminder.notes)));
    }
    if reminder.recurrence.is_recurring() {
        text.push_str(&format!("\n🔄 {}", escape_markdown(reminder.recurrence.label())));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParsedSchedule, Recurrence, ReminderTags, RuleId};
    use crate::storage::models::NewReminder;
    use tempfile::TempDir;

    fn store_with_users() -> (DataStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        UserProfile::remember_username(&store, 1, Some("owner")).unwrap();
        UserProfile::remember_username(&store, 2, Some("alice")).unwrap();
        (store, dir)
    }

    fn reminder(store: &DataStore, shared_with: Vec<&str>, recurrence: Recurrence) -> Reminder {
        let tags = ReminderTags {
            notes: "bring slides".to_string(),
            shared_with: shared_with.into_iter().map(String::from).collect(),
            ..ReminderTags::default()
        };
        Reminder::create(
            store,
            NewReminder {
                chat_id: 1,
                message: "Standup (daily)".to_string(),
                schedule: ParsedSchedule {
                    due_at: Utc::now(),
                    recurrence,
                    matched_rule: RuleId::AbsoluteClock,
                },
                tags,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_recipients_resolve_known_usernames() {
        let (store, _dir) = store_with_users();
        let r = reminder(&store, vec!["Alice", "ghost", "owner"], Recurrence::None);
        assert_eq!(recipients(&store, &r), vec![1, 2]);
    }

    #[test]
    fn test_one_reached_recipient_settles_delivery() {
        use SendOutcome::*;
        // owner blocked the bot but a shared chat got the ping
        assert!(delivery_settled(&[Unreachable, Sent]));
        // owner hit a network error but a shared chat got the ping
        assert!(delivery_settled(&[Retry, Sent]));
        assert!(delivery_settled(&[Unreachable]));
        assert!(!delivery_settled(&[Retry]));
        assert!(!delivery_settled(&[Retry, Unreachable]));
    }

    #[test]
    fn test_blocked_chats_are_unreachable() {
        let blocked = RequestError::Api(ApiError::BotBlocked);
        assert_eq!(SendOutcome::from_error(&blocked), SendOutcome::Unreachable);

        let other = RequestError::Api(ApiError::MessageNotModified);
        assert_eq!(SendOutcome::from_error(&other), SendOutcome::Retry);
    }

    #[test]
    fn test_ping_text_escapes_and_labels() {
        let (store, _dir) = store_with_users();
        let r = reminder(&store, vec![], Recurrence::Daily);
        let text = ping_text(&r, Personality::Techbro);
        assert!(text.starts_with("🔔 *"));
        assert!(text.contains("Standup \\(daily\\)"));
        assert!(text.contains("📝 _bring slides_"));
        assert!(text.ends_with("🔄 Daily"));
    }
}
