use chrono::{
    DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Weekday,
};
use chrono_tz::Tz;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Day named alongside a clock time or anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayQualifier {
    Today,
    Tonight,
    Tomorrow,
    /// `on friday` / `this friday`: the nearest such day, today included.
    On(Weekday),
    /// `next friday`: strictly after today.
    Next(Weekday),
}

#[allow(clippy::expect_used)]
static DAY_QUALIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(today)|(tonight)|(tomorrow|tmrw)|(on|this|next)\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday))\b",
    )
    .expect("day qualifier pattern is a valid literal")
});

pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Finds the first day qualifier in `text`.
pub fn find_day_qualifier(text: &str) -> Option<(DayQualifier, Range<usize>)> {
    let caps = DAY_QUALIFIER.captures(text)?;
    let range = caps.get(0)?.range();
    let qualifier = if caps.get(1).is_some() {
        DayQualifier::Today
    } else if caps.get(2).is_some() {
        DayQualifier::Tonight
    } else if caps.get(3).is_some() {
        DayQualifier::Tomorrow
    } else {
        let weekday = weekday_from_name(caps.get(5)?.as_str())?;
        match caps.get(4)?.as_str().to_lowercase().as_str() {
            "next" => DayQualifier::Next(weekday),
            _ => DayQualifier::On(weekday),
        }
    };
    Some((qualifier, range))
}

/// Number of days from `from` forward to the next `to` (0 when equal).
pub fn days_until(from: Weekday, to: Weekday) -> u64 {
    let from = from.num_days_from_monday() as i64;
    let to = to.num_days_from_monday() as i64;
    (to - from).rem_euclid(7) as u64
}

/// Maps a wall-clock time in `tz` to an instant.
///
/// Ambiguous times pick the earlier instant. Times skipped by a DST jump
/// move forward by whole hours until the wall clock exists, so 02:30 on a
/// spring-forward night becomes 03:30.
pub fn localize(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    tz.from_local_datetime(&naive).earliest().unwrap_or_else(|| {
        (1..=3)
            .filter_map(|hours| naive.checked_add_signed(TimeDelta::hours(hours)))
            .find_map(|shifted| tz.from_local_datetime(&shifted).earliest())
            .unwrap_or_else(|| tz.from_utc_datetime(&naive))
    })
}

pub fn at_time(tz: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
    localize(tz, date.and_time(time))
}

/// Places `time` on the day the qualifier names, relative to `now`.
///
/// Without an explicit later day, a time already passed moves to the next
/// valid day.
pub fn place_on_day(
    now: &DateTime<Tz>,
    qualifier: Option<DayQualifier>,
    time: NaiveTime,
) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let today = now.date_naive();

    match qualifier {
        None | Some(DayQualifier::Today) | Some(DayQualifier::Tonight) => {
            let candidate = at_time(&tz, today, time);
            if candidate > *now {
                Some(candidate)
            } else {
                Some(at_time(&tz, today.checked_add_days(Days::new(1))?, time))
            }
        }
        Some(DayQualifier::Tomorrow) => {
            Some(at_time(&tz, today.checked_add_days(Days::new(1))?, time))
        }
        Some(DayQualifier::On(weekday)) => {
            let date = today.checked_add_days(Days::new(days_until(today.weekday(), weekday)))?;
            let candidate = at_time(&tz, date, time);
            if candidate > *now {
                Some(candidate)
            } else {
                Some(at_time(&tz, date.checked_add_days(Days::new(7))?, time))
            }
        }
        Some(DayQualifier::Next(weekday)) => {
            let offset = match days_until(today.weekday(), weekday) {
                0 => 7,
                n => n,
            };
            Some(at_time(&tz, today.checked_add_days(Days::new(offset))?, time))
        }
    }
}

/// Converts a 12-hour clock reading to 24-hour form.
pub fn to_24h(hour: u32, minute: u32, meridiem: &str) -> Option<NaiveTime> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    let hour = match (meridiem.to_lowercase().as_str(), hour) {
        ("am", 12) => 0,
        ("am", h) => h,
        ("pm", 12) => 12,
        ("pm", h) => h + 12,
        _ => return None,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}
