//! Static strategy pattern for CLI commands.
//!
//! Each subcommand is its own strategy type with its own input, dispatched
//! statically from `main`.

use muse_config::Config;
use muse_store::Store;
use tracing::info;

mod info;
mod init;
mod run;
mod stats;
mod version;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use run::{RunInput, RunStrategy};
pub use stats::{StatsInput, StatsStrategy};
pub use version::VersionStrategy;

/// Open the configured record store, creating missing tables.
async fn open_store(config: &Config) -> anyhow::Result<Store> {
    info!("Opening record store");
    Store::new(&config.database.url).await
}

/// Contract shared by all command strategies.
///
/// Every strategy declares its own input type, so `main` passes parsed
/// arguments without boxing or casting.
pub trait CommandStrategy: Send + Sync + 'static {
    type Input;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
