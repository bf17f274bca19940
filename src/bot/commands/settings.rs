use chrono::Utc;
use chrono_tz::Tz;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::handlers::BotState;
use crate::bot::keyboards::personality_picker;
use crate::bot::HandlerResult;
use crate::services::personality::Personality;
use crate::storage::models::UserProfile;
use crate::utils::datetime::format_clock;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_store_error, log_validation_error};
use crate::utils::markdown::{bold, escape_markdown};
use crate::utils::validation::validate_timezone;

pub fn render_personality_menu(current: Personality) -> String {
    format!(
        "🎭 {}\n\nCurrent vibe: {}\n\nPick how I should talk to you:",
        bold("Choose your vibe"),
        escape_markdown(current.name())
    )
}

pub fn render_timezone(tz: &Tz) -> String {
    format!(
        "🌍 Timezone: {}\n🕐 Local time: {}\n\nChange it with /timezone Europe/London",
        bold(tz.name()),
        escape_markdown(&format_clock(&Utc::now(), tz))
    )
}

pub async fn handle_personality(bot: &Bot, msg: &Message, state: &BotState) -> HandlerResult {
    let current = state.profile(msg.chat.id.0).personality;
    bot.send_message(msg.chat.id, render_personality_menu(current))
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(personality_picker())
        .await?;
    Ok(())
}

/// `/timezone` alone shows the current zone; `/timezone <IANA name>` sets it.
pub async fn handle_timezone(bot: &Bot, msg: &Message, args: &str, state: &BotState) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    if args.trim().is_empty() {
        bot.send_message(msg.chat.id, render_timezone(&state.tz_for(chat_id)))
            .parse_mode(ParseMode::MarkdownV2)
            .await?;
        return Ok(());
    }

    let tz = match validate_timezone(args) {
        Ok(tz) => tz,
        Err(e) => {
            log_validation_error("timezone", "timezone", args, &e.to_string(), chat_id);
            feedback
                .validation_error(
                    &e.to_string(),
                    "Use an IANA name like Asia/Kolkata, America/New_York or Europe/London",
                )
                .await?;
            return Ok(());
        }
    };

    if let Err(e) = UserProfile::set_timezone(&state.store, chat_id, tz) {
        log_store_error("set_timezone", "user_data", &e.to_string());
        feedback.error("Couldn't save your timezone. Please try again.").await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, format!("✅ Timezone updated\\!\n\n{}", render_timezone(&tz)))
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personality_menu_names_current_vibe() {
        let text = render_personality_menu(Personality::Zen);
        assert!(text.contains("Current vibe: Zen Monk 🧘"));
    }

    #[test]
    fn test_timezone_text_escapes_name() {
        let text = render_timezone(&chrono_tz::America::PortauPrince);
        assert!(text.contains("*America/Port\\-au\\-Prince*"));
    }
}
