use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::LazyLock;

use super::clock::{at_time, weekday_from_name};

/// How a reminder repeats after it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Weekday,
    Monthly,
}

/// Upper bound on steps taken while catching a schedule up to "now".
const MAX_CATCH_UP_STEPS: usize = 10_000;

impl Recurrence {
    pub fn is_recurring(&self) -> bool {
        !matches!(self, Recurrence::None)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recurrence::None => "Once",
            Recurrence::Daily => "Daily",
            Recurrence::Weekly => "Weekly",
            Recurrence::Weekday => "Weekdays",
            Recurrence::Monthly => "Monthly",
        }
    }

    /// `day_of_month` pins monthly steps; shorter months clamp to their
    /// last day without moving the pin.
    fn step(&self, date: NaiveDate, day_of_month: u32) -> Option<NaiveDate> {
        match self {
            Recurrence::None => None,
            Recurrence::Daily => date.checked_add_days(Days::new(1)),
            Recurrence::Weekly => date.checked_add_days(Days::new(7)),
            Recurrence::Monthly => {
                let first = date.with_day(1)?.checked_add_months(Months::new(1))?;
                let last = first.checked_add_months(Months::new(1))?.pred_opt()?.day();
                first.with_day(day_of_month.min(last))
            }
            Recurrence::Weekday => {
                let mut next = date.checked_add_days(Days::new(1))?;
                while is_weekend(next.weekday()) {
                    next = next.checked_add_days(Days::new(1))?;
                }
                Some(next)
            }
        }
    }

    /// The first occurrence strictly after `after`, stepping from `due` on
    /// the wall clock of `tz`. Monthly steps land on `day_of_month`, or on
    /// the day of `due` when unset.
    ///
    /// Returns `None` for one-off reminders.
    pub fn next_occurrence(
        &self,
        due: DateTime<Utc>,
        after: DateTime<Utc>,
        tz: &Tz,
        day_of_month: Option<u32>,
    ) -> Option<DateTime<Utc>> {
        let local = due.with_timezone(tz);
        let time = local.time();
        let mut date = local.date_naive();
        let day_of_month = day_of_month.unwrap_or(date.day());

        for _ in 0..MAX_CATCH_UP_STEPS {
            date = self.step(date, day_of_month)?;
            let candidate = at_time(tz, date, time).with_timezone(&Utc);
            if candidate > after {
                return Some(candidate);
            }
        }
        None
    }
}

fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// A recurrence phrase found in reminder text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceHint {
    pub recurrence: Recurrence,
    /// Set for `every <weekday>`.
    pub weekday: Option<Weekday>,
}

impl RecurrenceHint {
    fn allows(&self, day: Weekday) -> bool {
        match (self.recurrence, self.weekday) {
            (_, Some(wanted)) => day == wanted,
            (Recurrence::Weekday, None) => !is_weekend(day),
            _ => true,
        }
    }

    /// Moves `due` forward, keeping its wall-clock time, to the first day the
    /// recurrence fires on.
    pub fn align(&self, due: DateTime<Tz>) -> DateTime<Tz> {
        let tz = due.timezone();
        let time = due.time();
        let mut date = due.date_naive();
        for _ in 0..7 {
            if self.allows(date.weekday()) {
                return at_time(&tz, date, time);
            }
            match date.checked_add_days(Days::new(1)) {
                Some(next) => date = next,
                None => break,
            }
        }
        due
    }
}

#[allow(clippy::expect_used)]
static RECURRENCE_PATTERNS: LazyLock<Vec<(Recurrence, Regex)>> = LazyLock::new(|| {
    vec![
        (
            Recurrence::Daily,
            Regex::new(r"(?i)\b(?:every\s*day|daily)\b").expect("daily pattern is a valid literal"),
        ),
        (
            Recurrence::Weekday,
            Regex::new(r"(?i)\b(?:every\s+weekday|on\s+weekdays|weekdays)\b")
                .expect("weekday pattern is a valid literal"),
        ),
        (
            Recurrence::Weekly,
            Regex::new(r"(?i)\bevery\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
                .expect("named weekday pattern is a valid literal"),
        ),
        (
            Recurrence::Weekly,
            Regex::new(r"(?i)\b(?:every\s+week|weekly)\b").expect("weekly pattern is a valid literal"),
        ),
        (
            Recurrence::Monthly,
            Regex::new(r"(?i)\b(?:every\s+month|monthly)\b")
                .expect("monthly pattern is a valid literal"),
        ),
    ]
});

/// Finds the first recurrence phrase, in pattern order.
pub fn detect_recurrence(text: &str) -> Option<(RecurrenceHint, Range<usize>)> {
    RECURRENCE_PATTERNS.iter().find_map(|(recurrence, pattern)| {
        let caps = pattern.captures(text)?;
        let weekday = caps.get(1).and_then(|m| weekday_from_name(m.as_str()));
        Some((
            RecurrenceHint {
                recurrence: *recurrence,
                weekday,
            },
            caps.get(0)?.range(),
        ))
    })
}
