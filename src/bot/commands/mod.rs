pub mod extras;
pub mod journal;
pub mod reminders;
pub mod settings;
pub mod stats;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, ParseMode};
use teloxide::utils::command::BotCommands;

use crate::bot::HandlerResult;
use crate::utils::text::{split_long_message, MAX_MESSAGE_LENGTH};

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "MemoryPing commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "List active reminders")]
    List,
    #[command(description = "Show today's reminders")]
    Today,
    #[command(description = "Show overdue reminders")]
    Missed,
    #[command(description = "Daily digest")]
    Digest,
    #[command(description = "Show your stats")]
    Stats,
    #[command(description = "Show your badges")]
    Achievements,
    #[command(description = "Top users by XP")]
    Leaderboard,
    #[command(description = "Pick a reply vibe")]
    Personality,
    #[command(description = "Set your timezone, e.g. /timezone Europe/Berlin")]
    Timezone(String),
    #[command(description = "Mood journal for the last week")]
    Reflect,
    #[command(description = "Log today's mood: /mood happy|neutral|sad [note]")]
    Mood(String),
    #[command(description = "Start a 25 minute focus session")]
    Focus,
    #[command(description = "Random motivational quote")]
    Quote,
    #[command(description = "One-tap reminder templates")]
    Quick,
}

/// Sends MarkdownV2 text, split at line boundaries when too long. The
/// keyboard goes on the last part.
pub(crate) async fn send_long(
    bot: &Bot,
    chat_id: ChatId,
    text: &str,
    markup: Option<InlineKeyboardMarkup>,
) -> HandlerResult {
    let parts = split_long_message(text, MAX_MESSAGE_LENGTH);
    let last = parts.len().saturating_sub(1);
    for (i, part) in parts.into_iter().enumerate() {
        let mut request = bot.send_message(chat_id, part).parse_mode(ParseMode::MarkdownV2);
        if i == last {
            if let Some(markup) = markup.clone() {
                request = request.reply_markup(markup);
            }
        }
        request.await?;
    }
    Ok(())
}
