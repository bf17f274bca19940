use chrono::{DateTime, Datelike, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::parser::{Category, ParsedSchedule, Priority, Recurrence, ReminderTags, RuleId};
use crate::storage::store::{Collection, Collections, DataStore, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub chat_id: i64,
    pub message: String,
    pub due_at: DateTime<Utc>,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub matched_rule: RuleId,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub shared_with: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    /// Set once the current occurrence has been delivered.
    #[serde(default)]
    pub notified_at: Option<DateTime<Utc>>,
    /// Day a monthly reminder returns to, fixed at its first delivery.
    #[serde(default)]
    pub day_of_month: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// Result of [`Reminder::complete`].
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Done(Reminder),
    /// A one-off reminder that was already completed.
    AlreadyDone(Reminder),
}

/// Input for [`Reminder::create`].
#[derive(Debug, Clone)]
pub struct NewReminder {
    pub chat_id: i64,
    pub message: String,
    pub schedule: ParsedSchedule,
    pub tags: ReminderTags,
}

impl Reminder {
    /// True when the reminder went off and nobody acted on it yet.
    pub fn is_missed(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_at <= now
    }

    pub fn is_visible_to(&self, chat_id: i64, username: Option<&str>) -> bool {
        self.chat_id == chat_id
            || username.is_some_and(|name| {
                self.shared_with
                    .iter()
                    .any(|shared| shared.eq_ignore_ascii_case(name))
            })
    }

    pub fn create(store: &DataStore, new: NewReminder, now: DateTime<Utc>) -> Result<Self, StoreError> {
        let reminder = Reminder {
            id: Uuid::new_v4().to_string(),
            chat_id: new.chat_id,
            message: new.message,
            due_at: new.schedule.due_at,
            recurrence: new.schedule.recurrence,
            matched_rule: new.schedule.matched_rule,
            category: new.tags.category,
            priority: new.tags.priority,
            notes: new.tags.notes,
            shared_with: new.tags.shared_with,
            completed: false,
            notified_at: None,
            day_of_month: None,
            created_at: now,
        };

        store.update(&[Collection::Reminders], |c| {
            c.reminders.insert(reminder.id.clone(), reminder.clone());
            Ok(())
        })?;
        Ok(reminder)
    }

    pub fn find(store: &DataStore, id: &str) -> Option<Self> {
        store.read(|c| c.reminders.get(id).cloned())
    }

    /// Open reminders owned by or shared with the chat, soonest first.
    pub fn active_for_chat(store: &DataStore, chat_id: i64, username: Option<&str>) -> Vec<Self> {
        let mut reminders: Vec<Self> = store.read(|c| {
            c.reminders
                .values()
                .filter(|r| !r.completed && r.is_visible_to(chat_id, username))
                .cloned()
                .collect()
        });
        reminders.sort_by_key(|r| r.due_at);
        reminders
    }

    /// Active reminders owned by the chat, used for category bookkeeping.
    pub fn owned_active(collections: &Collections, chat_id: i64) -> impl Iterator<Item = &Reminder> {
        collections
            .reminders
            .values()
            .filter(move |r| r.chat_id == chat_id && !r.completed)
    }

    pub fn count_active(store: &DataStore) -> usize {
        store.read(|c| c.reminders.values().filter(|r| !r.completed).count())
    }

    /// Marks a reminder done. Recurring reminders stay scheduled for their
    /// next occurrence.
    pub fn complete(store: &DataStore, id: &str) -> Result<Completion, StoreError> {
        store.update(&[Collection::Reminders], |c| {
            let reminder = c
                .reminders
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            if reminder.completed {
                return Ok(Completion::AlreadyDone(reminder.clone()));
            }
            if !reminder.recurrence.is_recurring() {
                reminder.completed = true;
            }
            Ok(Completion::Done(reminder.clone()))
        })
    }

    pub fn delete(store: &DataStore, id: &str) -> Result<Self, StoreError> {
        store.update(&[Collection::Reminders], |c| {
            c.reminders
                .remove(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))
        })
    }

    /// Pushes the reminder to `max(now, due_at) + minutes` and re-arms
    /// delivery.
    pub fn snooze(
        store: &DataStore,
        id: &str,
        minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        store.update(&[Collection::Reminders], |c| {
            let reminder = c
                .reminders
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            let base = reminder.due_at.max(now);
            reminder.due_at = TimeDelta::try_minutes(i64::from(minutes))
                .and_then(|delta| base.checked_add_signed(delta))
                .unwrap_or(base);
            reminder.notified_at = None;
            Ok(reminder.clone())
        })
    }

    /// Reminders whose current occurrence is due and not yet delivered.
    pub fn due(store: &DataStore, now: DateTime<Utc>) -> Vec<Self> {
        let mut due: Vec<Self> = store.read(|c| {
            c.reminders
                .values()
                .filter(|r| !r.completed && r.notified_at.is_none() && r.due_at <= now)
                .cloned()
                .collect()
        });
        due.sort_by_key(|r| r.due_at);
        due
    }

    /// Records a delivery. One-off reminders keep their due time and show
    /// up as missed until acted on; recurring ones move to the next
    /// occurrence after `now`.
    pub fn mark_delivered(
        store: &DataStore,
        id: &str,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Result<Self, StoreError> {
        store.update(&[Collection::Reminders], |c| {
            let reminder = c
                .reminders
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            if reminder.recurrence == Recurrence::Monthly && reminder.day_of_month.is_none() {
                reminder.day_of_month = Some(reminder.due_at.with_timezone(tz).day());
            }
            match reminder
                .recurrence
                .next_occurrence(reminder.due_at, now, tz, reminder.day_of_month)
            {
                Some(next) => {
                    reminder.due_at = next;
                    reminder.notified_at = None;
                }
                None => reminder.notified_at = Some(now),
            }
            Ok(reminder.clone())
        })
    }
}
