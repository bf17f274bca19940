//! XP, levels, streaks and achievements.
//!
//! Creation and completion bookkeeping each run in one store update so the
//! stats and profile files never disagree.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::parser::Category;
use crate::storage::models::{Reminder, UserProfile, UserStats};
use crate::storage::{Collection, DataStore, StoreError};

pub const XP_PER_COMPLETION: u64 = 10;
pub const XP_PER_LEVEL: u64 = 100;
pub const XP_PER_STREAK_DAY: u64 = 2;
pub const MAX_MEMORY_SCORE: u64 = 1000;
pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub xp: u64,
}

pub const ACHIEVEMENTS: [Achievement; 13] = [
    Achievement { id: "first_reminder", name: "🎬 First Step", description: "Created first reminder", xp: 50 },
    Achievement { id: "streak_3", name: "🔥 On Fire", description: "3-day streak", xp: 30 },
    Achievement { id: "streak_7", name: "⚡ Unstoppable", description: "7-day streak", xp: 75 },
    Achievement { id: "streak_30", name: "🏆 Legend", description: "30-day streak", xp: 300 },
    Achievement { id: "complete_10", name: "✨ Achiever", description: "Completed 10 reminders", xp: 100 },
    Achievement { id: "complete_50", name: "💎 Diamond", description: "Completed 50 reminders", xp: 500 },
    Achievement { id: "complete_100", name: "👑 Master", description: "Completed 100 reminders", xp: 1000 },
    Achievement { id: "early_bird", name: "🌅 Early Bird", description: "Set reminder before 7am", xp: 25 },
    Achievement { id: "night_owl", name: "🦉 Night Owl", description: "Set reminder after 10pm", xp: 25 },
    Achievement { id: "organized", name: "🗂️ Organizer", description: "Used all categories", xp: 150 },
    Achievement { id: "level_5", name: "⭐ Rising Star", description: "Reached Level 5", xp: 0 },
    Achievement { id: "level_10", name: "🌟 Superstar", description: "Reached Level 10", xp: 0 },
    Achievement { id: "perfect_week", name: "📅 Perfect Week", description: "7 days 100% completion", xp: 200 },
];

const STREAK_MILESTONES: [(u32, &str); 3] = [(3, "streak_3"), (7, "streak_7"), (30, "streak_30")];
const COMPLETION_MILESTONES: [(u64, &str); 3] =
    [(10, "complete_10"), (50, "complete_50"), (100, "complete_100")];
const LEVEL_MILESTONES: [(u64, &str); 2] = [(5, "level_5"), (10, "level_10")];

pub fn achievement(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

pub fn level_for(xp: u64) -> u64 {
    (xp / XP_PER_LEVEL + 1).max(1)
}

/// Streak after a completion on `today`.
pub fn next_streak(streak: u32, last: Option<NaiveDate>, today: NaiveDate) -> u32 {
    match last {
        Some(last) if last == today => streak.max(1),
        Some(last) if last.succ_opt() == Some(today) => streak.saturating_add(1),
        _ => 1,
    }
}

pub fn memory_score(stats: &UserStats, streak: u32) -> u64 {
    let score = stats.xp as f64 / 10.0 + stats.completion_rate() * 2.0 + f64::from(streak) * 5.0;
    (score as u64).min(MAX_MEMORY_SCORE)
}

/// Adds `id` to the profile and its XP to the stats, once.
fn award(profile: &mut UserProfile, stats: &mut UserStats, id: &str) -> Option<&'static Achievement> {
    if profile.has_achievement(id) {
        return None;
    }
    let achievement = achievement(id)?;
    profile.achievements.push(achievement.id.to_string());
    stats.xp += achievement.xp;
    Some(achievement)
}

fn award_levels(profile: &mut UserProfile, stats: &mut UserStats, unlocked: &mut Vec<&'static Achievement>) {
    for (level, id) in LEVEL_MILESTONES {
        if level_for(stats.xp) >= level {
            unlocked.extend(award(profile, stats, id));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationOutcome {
    pub unlocked: Vec<&'static Achievement>,
    pub level: u64,
}

/// Counts a new reminder and unlocks creation-time achievements.
///
/// `local_hour` is the due hour on the user's clock. The reminder must
/// already be in the store.
pub fn record_creation(
    store: &DataStore,
    chat_id: i64,
    local_hour: u32,
) -> Result<CreationOutcome, StoreError> {
    store.update(&[Collection::Stats, Collection::Users], |c| {
        let used: HashSet<Category> = Reminder::owned_active(c, chat_id).map(|r| r.category).collect();
        let profile = c.users.entry(chat_id).or_default();
        let stats = c.stats.entry(chat_id).or_default();
        stats.created += 1;

        let mut unlocked = Vec::new();
        unlocked.extend(award(profile, stats, "first_reminder"));
        if local_hour < 7 {
            unlocked.extend(award(profile, stats, "early_bird"));
        } else if local_hour >= 22 {
            unlocked.extend(award(profile, stats, "night_owl"));
        }
        if Category::ALL.iter().all(|category| used.contains(category)) {
            unlocked.extend(award(profile, stats, "organized"));
        }
        award_levels(profile, stats, &mut unlocked);

        Ok(CreationOutcome {
            unlocked,
            level: level_for(stats.xp),
        })
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub xp_gained: u64,
    pub streak: u32,
    pub level: u64,
    pub leveled_up: bool,
    pub unlocked: Vec<&'static Achievement>,
}

/// Counts a completion on the user's local `today`: XP, streak and
/// milestone achievements.
pub fn record_completion(
    store: &DataStore,
    chat_id: i64,
    today: NaiveDate,
) -> Result<CompletionOutcome, StoreError> {
    store.update(&[Collection::Stats, Collection::Users], |c| {
        let profile = c.users.entry(chat_id).or_default();
        let stats = c.stats.entry(chat_id).or_default();
        let old_level = level_for(stats.xp);

        let streak = next_streak(profile.streak, profile.last_completion, today);
        profile.streak = streak;
        profile.last_completion = Some(today);

        // the first day of a streak earns no bonus
        let xp_gained = XP_PER_COMPLETION + XP_PER_STREAK_DAY * u64::from(streak.saturating_sub(1));
        stats.completed += 1;
        stats.xp += xp_gained;

        let mut unlocked = Vec::new();
        for (days, id) in STREAK_MILESTONES {
            if streak >= days {
                unlocked.extend(award(profile, stats, id));
            }
        }
        for (count, id) in COMPLETION_MILESTONES {
            if stats.completed >= count {
                unlocked.extend(award(profile, stats, id));
            }
        }
        if streak >= 7 && stats.completed >= stats.created {
            unlocked.extend(award(profile, stats, "perfect_week"));
        }
        award_levels(profile, stats, &mut unlocked);

        let level = level_for(stats.xp);
        Ok(CompletionOutcome {
            xp_gained,
            streak,
            level,
            leveled_up: level > old_level,
            unlocked,
        })
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub chat_id: i64,
    pub name: String,
    pub xp: u64,
    pub level: u64,
}

impl LeaderboardEntry {
    pub fn medal(&self) -> String {
        match self.rank {
            1 => "🥇".to_string(),
            2 => "🥈".to_string(),
            3 => "🥉".to_string(),
            n => format!("{}.", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    pub top: Vec<LeaderboardEntry>,
    /// The caller's own row when they are outside the top list.
    pub caller: Option<LeaderboardEntry>,
}

/// Users by XP, highest first; ties go to the lower chat id.
pub fn leaderboard(store: &DataStore, caller: i64) -> Leaderboard {
    let mut ranked: Vec<LeaderboardEntry> = store.read(|c| {
        c.stats
            .iter()
            .map(|(chat_id, stats)| LeaderboardEntry {
                rank: 0,
                chat_id: *chat_id,
                name: c
                    .users
                    .get(chat_id)
                    .and_then(|u| u.username.clone())
                    .unwrap_or_else(|| anonymous_name(*chat_id)),
                xp: stats.xp,
                level: level_for(stats.xp),
            })
            .collect()
    });
    ranked.sort_by(|a, b| b.xp.cmp(&a.xp).then(a.chat_id.cmp(&b.chat_id)));
    for (i, entry) in ranked.iter_mut().enumerate() {
        entry.rank = i + 1;
    }

    let caller = ranked
        .iter()
        .skip(LEADERBOARD_SIZE)
        .find(|e| e.chat_id == caller)
        .cloned();
    ranked.truncate(LEADERBOARD_SIZE);
    Leaderboard { top: ranked, caller }
}

fn anonymous_name(chat_id: i64) -> String {
    format!("User {}", chat_id.unsigned_abs() % 10_000)
}
