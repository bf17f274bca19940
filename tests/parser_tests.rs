use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use memoryping_bot::parser::clock::at_time;
use memoryping_bot::parser::{resolve, Category, Priority, Recurrence, RuleId, FALLBACK_OFFSET_HOURS};

const TZ: Tz = chrono_tz::Asia::Kolkata;

// Wednesday 2024-03-06 10:00 local
fn now() -> DateTime<Tz> {
    at_time(
        &TZ,
        NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
    )
}

fn local(due: DateTime<Utc>) -> DateTime<Tz> {
    due.with_timezone(&TZ)
}

#[test]
fn test_explicit_12h_clock_is_honoured() {
    for hour in 1..=12u32 {
        for minute in [0u32, 15, 45] {
            for (meridiem, offset) in [("am", 0u32), ("pm", 12)] {
                let text = format!("call mom at {}:{:02} {}", hour, minute, meridiem);
                let resolution = resolve(&text, now());
                assert_eq!(resolution.schedule.matched_rule, RuleId::AbsoluteClock, "{text}");

                let expected_hour = hour % 12 + offset;
                let due = local(resolution.schedule.due_at);
                assert_eq!((due.hour(), due.minute()), (expected_hour, minute), "{text}");
                assert!(due > now(), "{text}");
            }
        }
    }
}

#[test]
fn test_explicit_24h_clock_is_honoured() {
    for hour in 0..24u32 {
        let text = format!("sync at {:02}:30", hour);
        let resolution = resolve(&text, now());
        assert_eq!(resolution.schedule.matched_rule, RuleId::AbsoluteClock, "{text}");
        let due = local(resolution.schedule.due_at);
        assert_eq!((due.hour(), due.minute()), (hour, 30), "{text}");
    }
}

#[test]
fn test_past_time_today_rolls_to_tomorrow() {
    let resolution = resolve("water plants at 8am", now());
    let due = local(resolution.schedule.due_at);
    assert_eq!(due.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
    assert_eq!(due.hour(), 8);
}

#[test]
fn test_relative_durations() {
    for hours in [1i64, 2, 5, 12] {
        let text = format!("stretch in {} hours", hours);
        let resolution = resolve(&text, now());
        assert_eq!(resolution.schedule.matched_rule, RuleId::RelativeDuration);
        assert_eq!(
            resolution.schedule.due_at,
            (now() + TimeDelta::hours(hours)).with_timezone(&Utc)
        );
        assert_eq!(resolution.message, "stretch");
    }

    for minutes in [1i64, 10, 45, 90] {
        let text = format!("check the oven in {}m", minutes);
        let resolution = resolve(&text, now());
        assert_eq!(
            resolution.schedule.due_at,
            (now() + TimeDelta::minutes(minutes)).with_timezone(&Utc)
        );
    }
}

#[test]
fn test_after_lunch_anchor() {
    let resolution = resolve("remind me after lunch", now());
    assert_eq!(resolution.schedule.matched_rule, RuleId::DayPartAnchor);
    let due = local(resolution.schedule.due_at);
    assert_eq!((due.hour(), due.minute()), (13, 0));
    assert_eq!(due.date_naive(), now().date_naive());

    let late = at_time(
        &TZ,
        NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
        NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
    );
    let resolution = resolve("remind me after lunch", late);
    let due = local(resolution.schedule.due_at);
    assert_eq!(due.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
}

#[test]
fn test_every_weekday_at_nine() {
    let resolution = resolve("every weekday at 9am", now());
    assert_eq!(resolution.schedule.recurrence, Recurrence::Weekday);
    let due = local(resolution.schedule.due_at);
    assert_eq!((due.hour(), due.minute()), (9, 0));
    assert!(!matches!(due.weekday(), Weekday::Sat | Weekday::Sun));
}

#[test]
fn test_every_named_day_aligns_to_that_day() {
    let resolution = resolve("gym every friday at 6pm", now());
    assert_eq!(resolution.schedule.recurrence, Recurrence::Weekly);
    let due = local(resolution.schedule.due_at);
    assert_eq!(due.weekday(), Weekday::Fri);
    assert_eq!(due.hour(), 18);
    assert_eq!(resolution.message, "gym");
}

#[test]
fn test_recurrence_without_time_uses_default_hour() {
    let resolution = resolve("vitamins daily", now());
    assert_eq!(resolution.schedule.recurrence, Recurrence::Daily);
    assert_eq!(resolution.schedule.matched_rule, RuleId::Recurrence);
    assert_eq!(local(resolution.schedule.due_at).hour(), 9);
}

#[test]
fn test_no_time_phrase_falls_back() {
    for text in ["buy milk", "renew passport", "", "   ", "😀 party"] {
        let resolution = resolve(text, now());
        assert_eq!(resolution.schedule.matched_rule, RuleId::Unresolved, "{text:?}");
        assert_eq!(
            resolution.schedule.due_at,
            (now() + TimeDelta::hours(FALLBACK_OFFSET_HOURS)).with_timezone(&Utc)
        );
        assert!(resolution.schedule.due_at > now().with_timezone(&Utc));
    }
}

#[test]
fn test_resolving_the_body_again_is_unresolved() {
    for text in [
        "call mom at 5pm",
        "stretch in 2 hours",
        "pills before bed",
        "standup every weekday at 9am",
        "pay rent tomorrow at 10:30",
        "remind me to email Sam on friday at 3pm #work",
        "call mom this evening at 7pm",
        "meeting at 5pm in 2 days",
        "call at 5pm after lunch",
    ] {
        let first = resolve(text, now());
        let second = resolve(&first.message, now());
        assert_eq!(second.schedule.matched_rule, RuleId::Unresolved, "{text} -> {}", first.message);
        assert_eq!(second.schedule.recurrence, Recurrence::None);
    }
}

#[test]
fn test_tags_are_extracted_before_parsing() {
    let resolution = resolve("submit report at 4pm #work !high @alice -- use the new template", now());
    assert_eq!(resolution.message, "submit report");
    assert_eq!(resolution.tags.category, Category::Work);
    assert_eq!(resolution.tags.priority, Priority::High);
    assert_eq!(resolution.tags.shared_with, vec!["alice".to_string()]);
    assert_eq!(resolution.tags.notes, "use the new template");
    assert_eq!(local(resolution.schedule.due_at).hour(), 16);
}

#[test]
fn test_next_weekday_skips_today() {
    let resolution = resolve("team lunch next wednesday at 1pm", now());
    let due = local(resolution.schedule.due_at);
    assert_eq!(due.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 13).unwrap());
}
