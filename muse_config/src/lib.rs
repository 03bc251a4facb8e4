mod schema;

pub use schema::{
    CONFIG_FILE, Config, DatabaseConfig, GenerationSettings, LoggingConfig, ProviderConfig,
    ProvidersConfig, TelegramConfig,
};
