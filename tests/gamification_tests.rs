use chrono::{NaiveDate, TimeDelta, Utc};
use memoryping_bot::parser::{Category, ParsedSchedule, Recurrence, ReminderTags, RuleId};
use memoryping_bot::services::gamification::{
    leaderboard, level_for, record_completion, record_creation, LEADERBOARD_SIZE,
};
use memoryping_bot::storage::models::{NewReminder, Reminder, UserProfile, UserStats};
use memoryping_bot::storage::DataStore;
use tempfile::TempDir;

fn open() -> (DataStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let store = DataStore::open(dir.path()).expect("Failed to open store");
    (store, dir)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn ids(unlocked: &[&memoryping_bot::services::gamification::Achievement]) -> Vec<&'static str> {
    unlocked.iter().map(|a| a.id).collect()
}

fn add_reminder(store: &DataStore, chat_id: i64, category: Category) {
    let new = NewReminder {
        chat_id,
        message: format!("{} task", category.as_str()),
        schedule: ParsedSchedule {
            due_at: Utc::now() + TimeDelta::hours(1),
            recurrence: Recurrence::None,
            matched_rule: RuleId::RelativeDuration,
        },
        tags: ReminderTags {
            category,
            ..ReminderTags::default()
        },
    };
    Reminder::create(store, new, Utc::now()).unwrap();
}

#[test]
fn test_first_reminder_unlocks_once() {
    let (store, _dir) = open();
    add_reminder(&store, 1, Category::Work);

    let first = record_creation(&store, 1, 12).unwrap();
    assert_eq!(ids(&first.unlocked), vec!["first_reminder"]);

    let second = record_creation(&store, 1, 12).unwrap();
    assert!(second.unlocked.is_empty());

    let stats = UserStats::get(&store, 1);
    assert_eq!(stats.created, 2);
    assert_eq!(stats.xp, 50);
}

#[test]
fn test_time_of_day_badges() {
    let (store, _dir) = open();
    let early = record_creation(&store, 1, 6).unwrap();
    assert!(ids(&early.unlocked).contains(&"early_bird"));

    let late = record_creation(&store, 1, 22).unwrap();
    assert_eq!(ids(&late.unlocked), vec!["night_owl"]);

    let seven = record_creation(&store, 2, 7).unwrap();
    assert_eq!(ids(&seven.unlocked), vec!["first_reminder"]);
}

#[test]
fn test_using_every_category_unlocks_organized() {
    let (store, _dir) = open();
    for category in Category::ALL {
        add_reminder(&store, 1, category);
    }
    let outcome = record_creation(&store, 1, 12).unwrap();
    assert!(ids(&outcome.unlocked).contains(&"organized"));
}

#[test]
fn test_streak_builds_xp_and_badges() {
    let (store, _dir) = open();

    let xp: Vec<u64> = (1..=3)
        .map(|d| record_completion(&store, 1, day(d)).unwrap().xp_gained)
        .collect();
    // streak bonus starts on the second day
    assert_eq!(xp, vec![10, 12, 14]);

    let profile = UserProfile::get(&store, 1);
    assert_eq!(profile.streak, 3);
    assert!(profile.has_achievement("streak_3"));

    // same day keeps the streak, a gap resets it
    assert_eq!(record_completion(&store, 1, day(3)).unwrap().streak, 3);
    assert_eq!(record_completion(&store, 1, day(10)).unwrap().streak, 1);
}

#[test]
fn test_level_up_is_reported() {
    let (store, _dir) = open();
    let mut leveled = false;
    for _ in 0..10 {
        let outcome = record_completion(&store, 1, day(1)).unwrap();
        leveled |= outcome.leveled_up;
    }
    let stats = UserStats::get(&store, 1);
    // ten completions plus the complete_10 badge
    assert_eq!(stats.xp, 100 + 100);
    assert_eq!(level_for(stats.xp), 3);
    assert!(leveled);
}

#[test]
fn test_leaderboard_orders_and_finds_caller() {
    let (store, _dir) = open();
    for chat_id in 1..=12i64 {
        for _ in 0..chat_id {
            record_completion(&store, chat_id, day(1)).unwrap();
        }
    }
    UserProfile::remember_username(&store, 12, Some("champ")).unwrap();

    let board = leaderboard(&store, 1);
    assert_eq!(board.top.len(), LEADERBOARD_SIZE);
    assert_eq!(board.top[0].name, "champ");
    assert_eq!(board.top[0].medal(), "🥇");
    assert!(board.top.windows(2).all(|w| w[0].xp >= w[1].xp));

    let caller = board.caller.expect("caller is outside the top list");
    assert_eq!(caller.chat_id, 1);
    assert_eq!(caller.rank, 12);

    assert!(leaderboard(&store, 12).caller.is_none());
}
