use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::keyboards::quick_templates;
use crate::bot::HandlerResult;
use crate::services::content::{random_quote, random_tip};
use crate::utils::markdown::{bold, escape_markdown, italic};

pub const FOCUS_MINUTES: u64 = 25;

/// Starts a pomodoro; the completion message arrives from a detached task.
pub async fn handle_focus(bot: &Bot, msg: &Message) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        format!(
            "🎯 {}\n\n{} minutes of deep work starts now\\. I'll ping you when it's over\\!",
            bold("Focus mode on"),
            FOCUS_MINUTES
        ),
    )
    .parse_mode(ParseMode::MarkdownV2)
    .await?;

    let bot = bot.clone();
    let chat_id = msg.chat.id;
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(FOCUS_MINUTES * 60)).await;
        let text = format!(
            "🎉 {}\n\nTake a 5 minute break\\. {}",
            bold("Focus session complete!"),
            italic(random_tip())
        );
        if let Err(e) = bot
            .send_message(chat_id, text)
            .parse_mode(ParseMode::MarkdownV2)
            .await
        {
            tracing::warn!("Failed to send focus completion to chat {}: {}", chat_id, e);
        }
    });
    Ok(())
}

pub async fn handle_quote(bot: &Bot, msg: &Message) -> HandlerResult {
    bot.send_message(msg.chat.id, format!("💭 {}", escape_markdown(random_quote())))
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    Ok(())
}

pub async fn handle_quick(bot: &Bot, msg: &Message) -> HandlerResult {
    bot.send_message(msg.chat.id, "⚡ Pick a quick reminder:")
        .reply_markup(quick_templates())
        .await?;
    Ok(())
}
