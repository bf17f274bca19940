//! Natural-language reminder parsing.
//!
//! [`resolve`] turns free text such as "remind me after lunch" or
//! "standup every weekday at 9am #work" into a schedule, the leftover
//! message body and any metadata markers. It never fails: text without a
//! recognizable time falls back to [`FALLBACK_OFFSET_HOURS`] from now.

pub mod clock;
pub mod recurrence;
pub mod rules;
pub mod tags;

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

pub use recurrence::Recurrence;
pub use tags::{Category, Priority, ReminderTags};

use recurrence::detect_recurrence;
use rules::{Extraction, RuleInput, RULES};
use tags::strip_tags;

/// Delay applied when no time phrase is recognized.
pub const FALLBACK_OFFSET_HOURS: i64 = 3;

/// Which rule produced a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    AbsoluteClock,
    RelativeDuration,
    DayPartAnchor,
    Recurrence,
    #[default]
    Unresolved,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::AbsoluteClock => "absolute_clock",
            RuleId::RelativeDuration => "relative_duration",
            RuleId::DayPartAnchor => "day_part_anchor",
            RuleId::Recurrence => "recurrence",
            RuleId::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The normalized schedule of one reminder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSchedule {
    pub due_at: DateTime<Utc>,
    pub recurrence: Recurrence,
    pub matched_rule: RuleId,
}

/// Full result of resolving a reminder phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub schedule: ParsedSchedule,
    /// Text left once markers, trigger words and time phrases are removed.
    /// May be empty.
    pub message: String,
    pub tags: ReminderTags,
}

#[allow(clippy::expect_used)]
static TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:please\s+)?(?:remind\s+me\s+(?:to\s+|about\s+|that\s+)?|ping\s+me\s+(?:to\s+|about\s+)?|tell\s+me\s+(?:to\s+)?|alert\s+me\s+(?:to\s+|about\s+)?|notify\s+me\s+(?:to\s+|about\s+)?|send\s+me\s+(?:a\s+)?|remember\s+(?:to\s+)?|don'?t\s+forget\s+(?:to\s+)?)",
    )
    .expect("trigger pattern is a valid literal")
});

const TRAILING_CONNECTORS: [&str; 6] = ["at", "on", "by", "and", "from", "for"];

fn strip_trigger(text: &str) -> &str {
    match TRIGGER.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// Removes `spans` from `text`, then collapses whitespace and drops
/// dangling punctuation and connector words.
fn tidy_body(text: &str, mut spans: Vec<Range<usize>>) -> String {
    spans.sort_by_key(|r| r.start);
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }

    let mut body = text.to_string();
    for span in merged.iter().rev() {
        if span.end <= body.len() && body.is_char_boundary(span.start) && body.is_char_boundary(span.end) {
            body.replace_range(span.clone(), " ");
        }
    }

    let mut words: Vec<&str> = body.split_whitespace().collect();
    while let Some(&last) = words.last() {
        let trimmed = last.trim_end_matches([',', ';', ':', '-', '.']);
        words.pop();
        if trimmed.is_empty() || TRAILING_CONNECTORS.contains(&trimmed.to_lowercase().as_str()) {
            continue;
        }
        words.push(trimmed);
        break;
    }
    while words
        .first()
        .is_some_and(|w| TRAILING_CONNECTORS.contains(&w.to_lowercase().as_str()))
    {
        words.remove(0);
    }
    words.join(" ")
}

/// Resolves reminder text against the ordered rule table.
///
/// `now` carries the user's timezone; all clock and anchor times are read
/// on that wall clock.
pub fn resolve(text: &str, now: DateTime<Tz>) -> Resolution {
    let (tagless, tags) = strip_tags(text);
    let stripped = strip_trigger(&tagless);

    let (recurrence_hint, rule_text) = match detect_recurrence(stripped) {
        Some((hint, range)) => {
            let mut remaining = stripped.to_string();
            remaining.replace_range(range, " ");
            (Some(hint), remaining)
        }
        None => (None, stripped.to_string()),
    };

    let input = RuleInput {
        text: &rule_text,
        now,
        recurrence: recurrence_hint,
    };
    let hits: Vec<(RuleId, Extraction)> = RULES
        .iter()
        .filter_map(|rule| rule.apply(&input).map(|hit| (rule.id, hit)))
        .collect();

    // the first hit decides the time; every recognized phrase leaves the body
    let spans: Vec<Range<usize>> = hits.iter().flat_map(|(_, hit)| hit.spans.iter().cloned()).collect();
    let (matched_rule, due) = match hits.first() {
        Some((id, hit)) => (*id, hit.due),
        None => {
            let due = TimeDelta::try_hours(FALLBACK_OFFSET_HOURS)
                .and_then(|offset| now.checked_add_signed(offset))
                .unwrap_or(now);
            (RuleId::Unresolved, due)
        }
    };

    let due = match (&recurrence_hint, matched_rule) {
        (Some(hint), rule) if rule != RuleId::Unresolved => hint.align(due),
        _ => due,
    };

    Resolution {
        schedule: ParsedSchedule {
            due_at: due.with_timezone(&Utc),
            recurrence: recurrence_hint.map(|h| h.recurrence).unwrap_or_default(),
            matched_rule,
        },
        message: tidy_body(&rule_text, spans),
        tags,
    }
}
