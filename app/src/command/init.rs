use muse_config::Config;

/// Strategy for writing the config template to `~/muse/config.json`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let path = Config::create_config()?;

        println!("Created {}", path.display());
        println!();
        println!("Next steps:");
        println!("  1. Set telegram.token to the token from @BotFather");
        println!("  2. Set providers.openai.api_key");
        println!("  3. Run `muse run`");
        Ok(())
    }
}
