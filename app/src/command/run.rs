use std::sync::Arc;

use muse_config::Config;
use muse_dialog::{GenerationConfig, Router};
use muse_providers::OpenAiProvider;
use muse_telegram::TelegramBot;
use tracing::info;

use super::{CommandStrategy, open_store};

/// Input for the `run` command.
pub struct RunInput {
    /// Bot token, overriding the config.
    pub token: Option<String>,
    /// Model, overriding `generation.model`.
    pub model: Option<String>,
}

/// Strategy for running the Telegram bot until Ctrl+C.
pub struct RunStrategy;

impl CommandStrategy for RunStrategy {
    type Input = RunInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        if let Some(model) = input.model {
            config.generation.model = model;
        }
        let token = input.token.unwrap_or_else(|| config.telegram.token.clone());

        info!("Starting muse with model {}", config.generation.model);

        let mut provider = OpenAiProvider::new(config.providers.openai.api_key.clone());
        if let Some(base_url) = config.providers.openai.base_url.clone() {
            provider = provider.with_base_url(base_url);
        }

        let store = Arc::new(open_store(&config).await?);
        let router = Router::new(
            provider,
            store,
            config.catalog.clone(),
            GenerationConfig::from(&config.generation),
        )?;

        let bot = TelegramBot::new(token, Arc::new(router), config.allowed_chats());

        info!("Telegram bot is running. Press Ctrl+C to stop.");
        bot.run().await?;
        Ok(())
    }
}
