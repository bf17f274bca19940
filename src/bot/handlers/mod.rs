pub mod callback;
pub mod general_message;
pub mod message;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use teloxide::{dispatching::UpdateHandler, prelude::*, types::User};

use crate::services::content::Footer;
use crate::storage::models::UserProfile;
use crate::storage::DataStore;
use crate::utils::logging::log_store_error;
use crate::utils::markdown::italic;

/// Everything a handler needs besides the bot and the update.
#[derive(Clone)]
pub struct BotState {
    pub store: DataStore,
    pub default_tz: Tz,
    pub footer: Arc<Footer>,
}

impl BotState {
    pub fn new(store: DataStore, default_tz: Tz) -> Self {
        Self {
            store,
            default_tz,
            footer: Arc::new(Footer::new()),
        }
    }

    pub fn profile(&self, chat_id: i64) -> UserProfile {
        UserProfile::get(&self.store, chat_id)
    }

    pub fn tz_for(&self, chat_id: i64) -> Tz {
        self.profile(chat_id).tz(self.default_tz)
    }

    pub fn now_for(&self, chat_id: i64) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz_for(chat_id))
    }

    /// Rotating footer, already formatted for MarkdownV2 and prefixed with a
    /// blank line.
    pub fn footer(&self) -> String {
        format!("\n\n{}", italic(&self.footer.next()))
    }

    /// Keeps the sender's username current so shared reminders can find
    /// them. Failures are logged, never surfaced.
    pub fn remember_sender(&self, chat_id: i64, user: Option<&User>) {
        let username = user.and_then(|u| u.username.as_deref());
        if let Err(e) = UserProfile::remember_username(&self.store, chat_id, username) {
            log_store_error("remember_username", "user_data", &e.to_string());
        }
    }
}

pub struct BotHandler {
    pub state: BotState,
}

impl BotHandler {
    pub fn new(state: BotState) -> Self {
        Self { state }
    }

    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        let command_state = self.state.clone();
        let text_state = self.state.clone();
        let callback_state = self.state.clone();

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<crate::bot::commands::Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: crate::bot::commands::Command| {
                        let state = command_state.clone();
                        async move { message::command_handler(bot, msg, cmd, state).await }
                    }),
            )
            .branch(Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                let state = text_state.clone();
                async move { general_message::handle_general_message(bot, msg, state).await }
            }))
            .branch(Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let state = callback_state.clone();
                async move { callback::callback_handler(bot, q, state).await }
            }))
    }
}
