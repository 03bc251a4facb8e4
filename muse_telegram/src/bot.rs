use std::sync::Arc;
use std::time::Duration;

use muse_dialog::Router;
use muse_providers::OpenAiProvider;
use muse_store::Store;
use teloxide::prelude::*;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::{Result, command};

pub type DialogRouter = Router<OpenAiProvider, Store>;

/// Telegram front-end of the dialog router.
#[derive(Clone)]
pub struct TelegramBot {
    pub bot: Bot,
    pub(crate) router: Arc<DialogRouter>,
    /// Allowed chat ids; empty allows everyone.
    allowed_chats: Vec<i64>,
    /// Our own username, learned from `getMe`.
    pub(crate) username: Option<String>,
}

impl TelegramBot {
    pub fn new(token: String, router: Arc<DialogRouter>, allowed_chats: Vec<i64>) -> Self {
        if allowed_chats.is_empty() {
            info!("No allow-list configured, every chat may use the bot");
        }

        Self {
            bot: Bot::new(token),
            router,
            allowed_chats,
            username: None,
        }
    }

    #[must_use]
    pub fn is_allowed(&self, chat_id: i64) -> bool {
        self.allowed_chats.is_empty() || self.allowed_chats.contains(&chat_id)
    }

    /// Wait for the Telegram API to answer `getMe`, backing off 2s, 4s, ...
    /// up to 10s between attempts. Returns the bot's username.
    async fn test_connection(&self) -> Option<String> {
        const INITIAL_DELAY_SECS: u64 = 2;
        const MAX_DELAY_SECS: u64 = 10;

        let mut attempt = 1u64;
        loop {
            match self.bot.get_me().await {
                Ok(me) => {
                    info!(
                        "Connected to Telegram API as @{} (id: {})",
                        me.user.username.as_deref().unwrap_or("no username"),
                        me.user.id
                    );
                    return me.user.username;
                }
                Err(e) => {
                    let delay_secs = (INITIAL_DELAY_SECS * attempt).min(MAX_DELAY_SECS);
                    warn!("Connection attempt {attempt} failed: {e}. Retrying in {delay_secs}s...");
                    if attempt == 1 {
                        warn!("Check the bot token and that api.telegram.org is reachable");
                    }
                    sleep(Duration::from_secs(delay_secs)).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Run until interrupted. Updates are distributed per chat, so one
    /// user's events are handled in order while chats run concurrently.
    pub async fn run(mut self) -> Result<()> {
        use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
        use teloxide::dptree;
        use teloxide::types::{CallbackQuery, Message, Update};

        self.username = self.test_connection().await;

        if let Err(e) = self.bot.set_my_commands(command::bot_commands()).await {
            warn!("Failed to register bot commands: {e}");
        }

        let schema = dptree::entry()
            .branch(Update::filter_message().endpoint({
                let this = self.clone();
                move |msg: Message| {
                    let this = this.clone();
                    async move { crate::handler::handle_message(this, msg).await }
                }
            }))
            .branch(Update::filter_callback_query().endpoint({
                let this = self.clone();
                move |query: CallbackQuery| {
                    let this = this.clone();
                    async move { crate::handler::handle_callback(this, query).await }
                }
            }));

        info!("Starting dispatcher");
        Dispatcher::builder(self.bot.clone(), schema)
            .default_handler(|_| async {})
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Dispatcher stopped");
        Ok(())
    }
}
