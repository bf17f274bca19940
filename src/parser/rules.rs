//! Ordered phrase rules. The first rule whose predicate holds and whose
//! extractor succeeds decides the schedule.

use chrono::{DateTime, NaiveTime, TimeDelta};
use chrono_tz::Tz;
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

use super::clock::{find_day_qualifier, place_on_day, to_24h, DayQualifier};
use super::recurrence::RecurrenceHint;
use super::RuleId;

/// Minutes added for "after X" and removed for "before X".
pub const ANCHOR_OFFSET_MINUTES: i64 = 30;

/// Clock time used when only a recurrence phrase is given.
pub const DEFAULT_RECURRENCE_HOUR: u32 = 9;

/// What a rule sees: tag-free text with the recurrence phrase removed.
#[derive(Debug, Clone)]
pub struct RuleInput<'a> {
    pub text: &'a str,
    pub now: DateTime<Tz>,
    pub recurrence: Option<RecurrenceHint>,
}

/// A successful rule match.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub due: DateTime<Tz>,
    /// Byte ranges of `RuleInput::text` that belong to the time phrase.
    pub spans: Vec<Range<usize>>,
}

pub struct PhraseRule {
    pub id: RuleId,
    pub predicate: fn(&RuleInput<'_>) -> bool,
    pub extract: fn(&RuleInput<'_>) -> Option<Extraction>,
}

impl PhraseRule {
    pub fn apply(&self, input: &RuleInput<'_>) -> Option<Extraction> {
        if (self.predicate)(input) {
            (self.extract)(input)
        } else {
            None
        }
    }
}

/// The rule table, in priority order.
pub static RULES: [PhraseRule; 4] = [
    PhraseRule {
        id: RuleId::AbsoluteClock,
        predicate: mentions_clock,
        extract: extract_absolute,
    },
    PhraseRule {
        id: RuleId::RelativeDuration,
        predicate: mentions_duration,
        extract: extract_relative,
    },
    PhraseRule {
        id: RuleId::DayPartAnchor,
        predicate: mentions_anchor,
        extract: extract_anchor,
    },
    PhraseRule {
        id: RuleId::Recurrence,
        predicate: has_recurrence,
        extract: extract_recurrence_default,
    },
];

#[allow(clippy::expect_used)]
static CLOCK_12H: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\bat\s+)?\b(\d{1,2})(?::([0-5]\d))?\s*(am|pm)\b")
        .expect("12h clock pattern is a valid literal")
});

#[allow(clippy::expect_used)]
static CLOCK_24H: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\bat\s+)?\b([01]?\d|2[0-3]):([0-5]\d)\b")
        .expect("24h clock pattern is a valid literal")
});

#[allow(clippy::expect_used)]
static CLOCK_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\bat\s+)?\b(noon|midnight)\b").expect("clock word pattern is a valid literal")
});

#[allow(clippy::expect_used)]
static DURATION_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:in|after)\s+\d").expect("duration hint pattern is a valid literal")
});

#[allow(clippy::expect_used)]
static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:in|after)\s+(?:(\d+)\s*(?:days?|d)\s*)?(?:(\d+)\s*(?:hours?|hrs?|hr|h)\s*)?(?:(?:and\s+)?(\d+)\s*(?:minutes?|mins?|min|m))?",
    )
    .expect("duration pattern is a valid literal")
});

#[allow(clippy::expect_used)]
static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(after|before)|at|by|around|during|in\s+the|this|today|tomorrow)\s+(morning|lunch(?:time)?|afternoon|evening|dinner(?:time)?|bed(?:time)?)\b|\b(tonight)\b",
    )
    .expect("anchor pattern is a valid literal")
});

fn mentions_clock(input: &RuleInput<'_>) -> bool {
    CLOCK_12H.is_match(input.text) || CLOCK_24H.is_match(input.text) || CLOCK_WORD.is_match(input.text)
}

fn clock_from_12h(caps: &Captures<'_>) -> Option<NaiveTime> {
    let hour = caps.get(1)?.as_str().parse().ok()?;
    let minute = caps.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
    to_24h(hour, minute, caps.get(3)?.as_str())
}

fn clock_from_24h(caps: &Captures<'_>) -> Option<NaiveTime> {
    let hour = caps.get(1)?.as_str().parse().ok()?;
    let minute = caps.get(2)?.as_str().parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn clock_from_word(caps: &Captures<'_>) -> Option<NaiveTime> {
    match caps.get(1)?.as_str().to_lowercase().as_str() {
        "noon" => NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => NaiveTime::from_hms_opt(0, 0, 0),
        _ => None,
    }
}

fn first_clock(text: &str) -> Option<(NaiveTime, Range<usize>)> {
    let readers: [(&Regex, fn(&Captures<'_>) -> Option<NaiveTime>); 3] = [
        (&*CLOCK_12H, clock_from_12h),
        (&*CLOCK_24H, clock_from_24h),
        (&*CLOCK_WORD, clock_from_word),
    ];
    readers.iter().find_map(|(pattern, read)| {
        pattern
            .captures_iter(text)
            .find_map(|caps| Some((read(&caps)?, caps.get(0)?.range())))
    })
}

fn extract_absolute(input: &RuleInput<'_>) -> Option<Extraction> {
    let (time, clock_span) = first_clock(input.text)?;
    let qualifier = find_day_qualifier(input.text);
    let due = place_on_day(&input.now, qualifier.as_ref().map(|q| q.0), time)?;

    let mut spans = vec![clock_span];
    spans.extend(qualifier.map(|q| q.1));
    Some(Extraction { due, spans })
}

fn mentions_duration(input: &RuleInput<'_>) -> bool {
    DURATION_HINT.is_match(input.text)
}

fn parse_amount(caps: &Captures<'_>, group: usize) -> Option<Option<i64>> {
    match caps.get(group) {
        Some(m) => m.as_str().parse::<u32>().ok().map(|n| Some(i64::from(n))),
        None => Some(None),
    }
}

fn extract_relative(input: &RuleInput<'_>) -> Option<Extraction> {
    DURATION.captures_iter(input.text).find_map(|caps| {
        let whole = caps.get(0)?;
        let days = parse_amount(&caps, 1)?;
        let hours = parse_amount(&caps, 2)?;
        let minutes = parse_amount(&caps, 3)?;
        if days.is_none() && hours.is_none() && minutes.is_none() {
            return None;
        }

        // the unit must end the word: "in 2 hamsters" is not a duration
        let matched = whole.as_str().trim_end();
        let end = whole.start() + matched.len();
        if input.text[end..].chars().next().is_some_and(char::is_alphanumeric) {
            return None;
        }

        let total = days.unwrap_or(0) * 24 * 60 + hours.unwrap_or(0) * 60 + minutes.unwrap_or(0);
        let due = input.now.checked_add_signed(TimeDelta::try_minutes(total)?)?;
        Some(Extraction {
            due,
            spans: vec![whole.start()..end],
        })
    })
}

/// Default clock time of a day-part keyword.
pub fn anchor_time(keyword: &str) -> Option<NaiveTime> {
    let lowered = keyword.to_lowercase();
    let (hour, minute) = match lowered.as_str() {
        "morning" => (8, 0),
        "lunch" | "lunchtime" => (12, 30),
        "afternoon" => (14, 0),
        "evening" | "tonight" => (18, 0),
        "dinner" | "dinnertime" => (19, 30),
        "bed" | "bedtime" => (22, 30),
        _ => return None,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn mentions_anchor(input: &RuleInput<'_>) -> bool {
    ANCHOR.is_match(input.text)
}

fn extract_anchor(input: &RuleInput<'_>) -> Option<Extraction> {
    let caps = ANCHOR.captures(input.text)?;
    let anchor_span = caps.get(0)?.range();
    let keyword = caps.get(2).or_else(|| caps.get(3))?.as_str();
    let base = anchor_time(keyword)?;

    let offset = match caps.get(1).map(|m| m.as_str().to_lowercase()) {
        Some(ref word) if word == "after" => ANCHOR_OFFSET_MINUTES,
        Some(ref word) if word == "before" => -ANCHOR_OFFSET_MINUTES,
        _ => 0,
    };
    let (time, _) = base.overflowing_add_signed(TimeDelta::try_minutes(offset)?);

    let qualifier = find_day_qualifier(input.text);
    let day = match qualifier {
        Some((day, _)) => Some(day),
        None if keyword.eq_ignore_ascii_case("tonight") => Some(DayQualifier::Tonight),
        None => None,
    };
    let due = place_on_day(&input.now, day, time)?;

    let mut spans = vec![anchor_span];
    spans.extend(qualifier.map(|q| q.1));
    Some(Extraction { due, spans })
}

fn has_recurrence(input: &RuleInput<'_>) -> bool {
    input.recurrence.is_some()
}

fn extract_recurrence_default(input: &RuleInput<'_>) -> Option<Extraction> {
    let time = NaiveTime::from_hms_opt(DEFAULT_RECURRENCE_HOUR, 0, 0)?;
    let due = place_on_day(&input.now, None, time)?;
    Some(Extraction { due, spans: Vec::new() })
}
