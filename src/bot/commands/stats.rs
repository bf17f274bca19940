use teloxide::prelude::*;

use crate::bot::commands::send_long;
use crate::bot::handlers::BotState;
use crate::bot::HandlerResult;
use crate::services::gamification::{
    leaderboard, level_for, memory_score, Achievement, Leaderboard, LeaderboardEntry, ACHIEVEMENTS,
    XP_PER_LEVEL,
};
use crate::storage::models::{UserProfile, UserStats};
use crate::utils::markdown::{bold, escape_markdown};
use crate::utils::text::progress_bar;

const BAR_LENGTH: usize = 10;

pub fn render_stats(stats: &UserStats, profile: &UserProfile) -> String {
    let level = level_for(stats.xp);
    let into_level = stats.xp % XP_PER_LEVEL;
    let rate = stats.completion_rate();

    format!(
        "📊 {}\n\n\
        ⭐ Level {} \\| 💎 {} XP\n\
        {} {}/{}\n\n\
        🧠 Memory Score: {}\n\
        🔥 Streak: {} days\n\n\
        📝 Created: {}\n\
        ✅ Completed: {}\n\
        😴 Snoozed: {}\n\n\
        🎯 Completion: {} {}%\n\
        🏆 Badges: {}/{}",
        bold("Your Stats"),
        level,
        stats.xp,
        progress_bar(into_level as f64 / XP_PER_LEVEL as f64 * 100.0, BAR_LENGTH),
        into_level,
        XP_PER_LEVEL,
        memory_score(stats, profile.streak),
        profile.streak,
        stats.created,
        stats.completed,
        stats.snoozed,
        progress_bar(rate, BAR_LENGTH),
        escape_markdown(&format!("{:.0}", rate)),
        profile.achievements.len(),
        ACHIEVEMENTS.len()
    )
}

pub fn render_achievements(profile: &UserProfile) -> String {
    let mut text = format!("🏆 {}\n\n", bold("Achievements"));

    let (unlocked, locked): (Vec<&Achievement>, Vec<&Achievement>) = ACHIEVEMENTS
        .iter()
        .partition(|a| profile.has_achievement(a.id));

    text.push_str(&format!("{}\n", bold(&format!("Unlocked ({})", unlocked.len()))));
    if unlocked.is_empty() {
        text.push_str("None yet \\- set your first reminder\\!\n");
    }
    for a in &unlocked {
        text.push_str(&format!(
            "{} \\- {}\n",
            bold(a.name),
            escape_markdown(a.description)
        ));
    }

    text.push_str(&format!("\n{}\n", bold(&format!("Locked ({})", locked.len()))));
    for a in &locked {
        text.push_str(&format!(
            "🔒 {} \\- {} \\(\\+{} XP\\)\n",
            escape_markdown(a.name),
            escape_markdown(a.description),
            a.xp
        ));
    }
    text
}

fn leaderboard_row(entry: &LeaderboardEntry, caller: i64) -> String {
    let you = if entry.chat_id == caller { " 👈 you" } else { "" };
    format!(
        "{} {} \\- Lvl {} \\({} XP\\){}\n",
        escape_markdown(&entry.medal()),
        escape_markdown(&entry.name),
        entry.level,
        entry.xp,
        you
    )
}

pub fn render_leaderboard(board: &Leaderboard, caller: i64) -> String {
    if board.top.is_empty() {
        return "🏅 No one on the board yet\\. Complete a reminder to get started\\!".to_string();
    }

    let mut text = format!("🏅 {}\n\n", bold("Leaderboard"));
    for entry in &board.top {
        text.push_str(&leaderboard_row(entry, caller));
    }
    if let Some(entry) = &board.caller {
        text.push_str("\\.\\.\\.\n");
        text.push_str(&leaderboard_row(entry, caller));
    }
    text
}

pub async fn handle_stats(bot: &Bot, msg: &Message, state: &BotState) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let text = format!(
        "{}{}",
        render_stats(&UserStats::get(&state.store, chat_id), &state.profile(chat_id)),
        state.footer()
    );
    send_long(bot, msg.chat.id, &text, None).await
}

pub async fn handle_achievements(bot: &Bot, msg: &Message, state: &BotState) -> HandlerResult {
    let text = render_achievements(&state.profile(msg.chat.id.0));
    send_long(bot, msg.chat.id, &text, None).await
}

pub async fn handle_leaderboard(bot: &Bot, msg: &Message, state: &BotState) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let text = render_leaderboard(&leaderboard(&state.store, chat_id), chat_id);
    send_long(bot, msg.chat.id, &text, None).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_shows_level_progress() {
        let stats = UserStats { created: 4, completed: 2, snoozed: 1, xp: 130 };
        let profile = UserProfile { streak: 3, ..UserProfile::default() };
        let text = render_stats(&stats, &profile);
        assert!(text.contains("⭐ Level 2"));
        assert!(text.contains("███░░░░░░░ 30/100"));
        assert!(text.contains("🎯 Completion: █████░░░░░ 50%"));
        assert!(text.contains("🔥 Streak: 3 days"));
    }

    #[test]
    fn test_achievements_split_locked_and_unlocked() {
        let profile = UserProfile {
            achievements: vec!["first_reminder".to_string()],
            ..UserProfile::default()
        };
        let text = render_achievements(&profile);
        assert!(text.contains("*Unlocked \\(1\\)*"));
        assert!(text.contains("*Locked \\(12\\)*"));
        assert!(text.contains("🔒 🌅 Early Bird"));
    }

    #[test]
    fn test_leaderboard_marks_caller_outside_top() {
        let entry = |rank: usize, chat_id: i64| LeaderboardEntry {
            rank,
            chat_id,
            name: format!("user{chat_id}"),
            xp: 1000 - rank as u64,
            level: 10,
        };
        let board = Leaderboard {
            top: vec![entry(1, 10), entry(2, 20)],
            caller: Some(entry(12, 99)),
        };
        let text = render_leaderboard(&board, 99);
        assert!(text.starts_with("🏅 *Leaderboard*"));
        assert!(text.contains("🥇 user10"));
        assert!(text.contains("12\\. user99 \\- Lvl 10 \\(988 XP\\) 👈 you"));
    }
}
