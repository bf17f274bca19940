use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::{extras, journal, reminders, settings, stats, Command};
use crate::bot::handlers::BotState;
use crate::bot::keyboards::main_menu;
use crate::bot::HandlerResult;
use crate::utils::logging::{log_command_error, log_command_start, log_command_success};
use crate::utils::markdown::{bold, escape_markdown};

pub fn welcome_text(first_name: &str) -> String {
    format!(
        "👋 Hey {}\\! I'm {} 🧠✨\n\n\
        Just tell me what to remember, like:\n\
        • {}\n\
        • {}\n\
        • {}\n\n\
        Earn XP for every reminder you complete, keep your streak alive and \
        unlock badges along the way\\. Tap a button below or send /help\\.",
        escape_markdown(first_name),
        bold("MemoryPing"),
        escape_markdown("call mom at 7pm"),
        escape_markdown("drink water in 30 minutes"),
        escape_markdown("every weekday at 9am standup #work")
    )
}

pub async fn send_welcome(bot: &Bot, msg: &Message) -> HandlerResult {
    let first_name = msg.from().map(|u| u.first_name.as_str()).unwrap_or("there");
    bot.send_message(msg.chat.id, welcome_text(first_name))
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(main_menu())
        .await?;
    Ok(())
}

pub async fn send_help(bot: &Bot, msg: &Message) -> HandlerResult {
    let text = format!(
        "{}\n\nAnything else you send becomes a reminder. Add #tags for a category, \
        !high or !low for priority, @username to share and -- for notes.",
        Command::descriptions()
    );
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

fn command_name(cmd: &Command) -> &'static str {
    match cmd {
        Command::Start => "start",
        Command::Help => "help",
        Command::List => "list",
        Command::Today => "today",
        Command::Missed => "missed",
        Command::Digest => "digest",
        Command::Stats => "stats",
        Command::Achievements => "achievements",
        Command::Leaderboard => "leaderboard",
        Command::Personality => "personality",
        Command::Timezone(_) => "timezone",
        Command::Reflect => "reflect",
        Command::Mood(_) => "mood",
        Command::Focus => "focus",
        Command::Quote => "quote",
        Command::Quick => "quick",
    }
}

pub async fn command_handler(bot: Bot, msg: Message, cmd: Command, state: BotState) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let user = msg.from();
    let username = user.and_then(|u| u.username.clone()).unwrap_or_default();
    let user_id = user.map(|u| u.id.0 as i64).unwrap_or(0);
    let name = command_name(&cmd);

    state.remember_sender(chat_id, user);
    log_command_start(name, &username, user_id, chat_id, None);

    let result = match cmd {
        Command::Start => send_welcome(&bot, &msg).await,
        Command::Help => send_help(&bot, &msg).await,
        Command::List => reminders::handle_list(&bot, &msg, &state).await,
        Command::Today => reminders::handle_today(&bot, &msg, &state).await,
        Command::Missed => reminders::handle_missed(&bot, &msg, &state).await,
        Command::Digest => reminders::handle_digest(&bot, &msg, &state).await,
        Command::Stats => stats::handle_stats(&bot, &msg, &state).await,
        Command::Achievements => stats::handle_achievements(&bot, &msg, &state).await,
        Command::Leaderboard => stats::handle_leaderboard(&bot, &msg, &state).await,
        Command::Personality => settings::handle_personality(&bot, &msg, &state).await,
        Command::Timezone(args) => settings::handle_timezone(&bot, &msg, &args, &state).await,
        Command::Reflect => journal::handle_reflect(&bot, &msg, &state).await,
        Command::Mood(args) => journal::handle_mood(&bot, &msg, &args, &state).await,
        Command::Focus => extras::handle_focus(&bot, &msg).await,
        Command::Quote => extras::handle_quote(&bot, &msg).await,
        Command::Quick => extras::handle_quick(&bot, &msg).await,
    };

    match &result {
        Ok(()) => log_command_success(name, &username, user_id, chat_id, None),
        Err(e) => log_command_error(name, &username, user_id, chat_id, &e.to_string()),
    }
    result
}
