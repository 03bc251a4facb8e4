use muse_config::Config;
use muse_store::redact_url;
use tracing::info;

use super::open_store;

/// Strategy for printing the effective configuration with secrets masked,
/// plus a store connectivity check.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.is_empty() {
        return "(not set)".to_string();
    }
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== muse Configuration ===\n");

        println!("Telegram:");
        println!("  Token: {}", mask_secret(&config.telegram.token));
        if config.telegram.allow_from.is_empty() {
            println!("  Allow From: (empty - all chats allowed)");
        } else {
            println!("  Allow From: {}", config.telegram.allow_from.join(", "));
        }
        println!();

        println!("OpenAI:");
        println!("  API Key: {}", mask_secret(&config.providers.openai.api_key));
        if let Some(base_url) = &config.providers.openai.base_url {
            println!("  Base URL: {base_url}");
        }
        println!();

        println!("Generation:");
        println!("  Model: {}", config.generation.model);
        println!("  Max Tokens: {}", config.generation.max_tokens);
        println!("  Temperature: {}", config.generation.temperature);
        println!();

        println!("Database:");
        println!("  URL: {}", redact_url(&config.database.url));
        info!("Testing database connection");
        match open_store(&config).await {
            Ok(_) => println!("  Status: Connected"),
            Err(e) => {
                println!("  Status: Connection failed");
                println!("  Error: {e}");
            }
        }
        println!();

        println!("Catalog:");
        let topics: Vec<&str> = config
            .catalog
            .quiz_topics
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        println!("  Quiz Topics: {}", topics.join(", "));
        let personas: Vec<&str> = config
            .catalog
            .personalities
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        println!("  Personalities: {}", personas.join(", "));
        for category in &config.catalog.recommendation_categories {
            println!(
                "  {} {}: {} genres",
                category.icon,
                category.name,
                category.genres.len()
            );
        }
        println!();

        println!("Logging:");
        println!("  Level: {}", config.logging.level);

        Ok(())
    }
}
