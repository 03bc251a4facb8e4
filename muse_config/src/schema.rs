use std::path::{Path, PathBuf};

use muse_dialog::{Catalog, GenerationConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const CONFIG_FILE: &str = "config.json";

const CONFIG_DIR: &str = "muse";
const TOKEN_PLACEHOLDER: &str = "your-telegram-bot-token-here";
const API_KEY_PLACEHOLDER: &str = "your-openai-api-key-here";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub catalog: Catalog,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TelegramConfig {
    pub token: String,
    /// Chat ids allowed to use the bot; empty allows everyone.
    #[serde(default)]
    pub allow_from: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    pub openai: ProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProviderConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GenerationSettings {
    #[serde(default = "GenerationSettings::default_model")]
    pub model: String,
    #[serde(default = "GenerationSettings::default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "GenerationSettings::default_temperature")]
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: Self::default_model(),
            max_tokens: Self::default_max_tokens(),
            temperature: Self::default_temperature(),
        }
    }
}

impl GenerationSettings {
    fn default_model() -> String {
        "gpt-4.1".to_string()
    }

    const fn default_max_tokens() -> usize {
        1000
    }

    const fn default_temperature() -> f32 {
        0.7
    }
}

impl From<&GenerationSettings> for GenerationConfig {
    fn from(settings: &GenerationSettings) -> Self {
        Self {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
        }
    }
}

impl DatabaseConfig {
    fn default_url() -> String {
        let path = Config::config_dir().map_or_else(
            |_| PathBuf::from("muse.db"),
            |dir| dir.join("muse.db"),
        );
        format!("sqlite://{}?mode=rwc", path.display())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Config {
    /// `~/muse`, where the config file and the default database live.
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load `~/muse/config.json`, apply environment overrides and validate.
    ///
    /// Without a config file the bot can still start from
    /// `TELEGRAM_BOT_TOKEN` and `OPENAI_API_KEY` alone.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        let env = |key: &str| std::env::var(key).ok();
        if env("TELEGRAM_BOT_TOKEN").is_some() && env("OPENAI_API_KEY").is_some() {
            info!("No config file, using environment variables");
            let mut config = Self::template();
            config.apply_overrides(env);
            config.validate()?;
            return Ok(config);
        }

        anyhow::bail!(
            "Config file not found at: {}. Please run 'muse init' to create config.",
            config_path.display()
        );
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Override file values with non-empty variables from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(token) = get("TELEGRAM_BOT_TOKEN") {
            self.telegram.token = token;
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.providers.openai.api_key = key;
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            self.providers.openai.base_url = Some(url);
        }
        if let Some(url) = get("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let token = self.telegram.token.trim();
        if token.is_empty() || token == TOKEN_PLACEHOLDER {
            anyhow::bail!("telegram.token is not set");
        }
        let api_key = self.providers.openai.api_key.trim();
        if api_key.is_empty() || api_key == API_KEY_PLACEHOLDER {
            anyhow::bail!("providers.openai.api_key is not set");
        }
        if self.generation.max_tokens == 0 {
            anyhow::bail!("generation.max_tokens must be positive");
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            anyhow::bail!("generation.temperature must be between 0 and 2");
        }
        self.catalog.validate()?;
        Ok(())
    }

    /// Chat ids parsed from `telegram.allow_from`; unparsable entries are skipped.
    #[must_use]
    pub fn allowed_chats(&self) -> Vec<i64> {
        self.telegram
            .allow_from
            .iter()
            .filter_map(|id| id.trim().parse::<i64>().ok())
            .collect()
    }

    /// A complete config with placeholder credentials.
    #[must_use]
    pub fn template() -> Self {
        Self {
            telegram: TelegramConfig {
                token: TOKEN_PLACEHOLDER.to_string(),
                allow_from: Vec::new(),
            },
            providers: ProvidersConfig {
                openai: ProviderConfig {
                    api_key: API_KEY_PLACEHOLDER.to_string(),
                    base_url: None,
                },
            },
            generation: GenerationSettings::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            catalog: Catalog::default(),
        }
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Write the template to `~/muse/config.json`, refusing to overwrite.
    pub fn create_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::ensure_config_dir()?.join(CONFIG_FILE);
        Self::write_template(&config_path)?;
        Ok(config_path)
    }

    pub fn write_template(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }
        std::fs::write(path, serde_json::to_string_pretty(&Self::template())?)?;
        info!("Created config file at {}", path.display());
        Ok(())
    }
}
