#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use command::{
    CommandStrategy, InfoStrategy, InitStrategy, RunInput, RunStrategy, StatsInput, StatsStrategy,
    VersionStrategy,
};
use muse_config::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "muse")]
#[command(about = "muse Telegram assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Telegram bot
    Run {
        /// Bot token (overrides config)
        #[arg(short, long)]
        token: Option<String>,

        /// Model to use (overrides config)
        #[arg(short = 'M', long)]
        model: Option<String>,
    },
    /// Initialize configuration
    Init,
    /// Show configuration
    Info,
    /// Show quiz statistics for a user
    Stats {
        /// Telegram user id
        user_id: i64,

        /// Restrict to one quiz topic
        #[arg(short, long)]
        topic: Option<String>,
    },
    /// Show version
    Version,
}

/// `RUST_LOG` wins, then `logging.level` from the config, then `info`.
fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        let level = Config::load().map_or_else(|_| "info".to_string(), |c| c.logging.level);
        EnvFilter::try_new(level)
    })?;

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    match cli.command {
        Commands::Run { token, model } => RunStrategy.execute(RunInput { token, model }).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Stats { user_id, topic } => {
            StatsStrategy.execute(StatsInput { user_id, topic }).await
        }
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
