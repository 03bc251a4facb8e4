use muse_dialog::Command;
use teloxide::types::BotCommand;

/// The command list registered with Telegram.
#[must_use]
pub fn bot_commands() -> Vec<BotCommand> {
    Command::all()
        .into_iter()
        .map(|command| BotCommand::new(command.name(), command.description()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_commands() {
        let commands = bot_commands();
        let names: Vec<&str> = commands.iter().map(|c| c.command.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "start",
                "random",
                "gpt",
                "talk",
                "quiz",
                "translate",
                "recommend",
                "stats",
                "cancel",
                "help"
            ]
        );
        assert!(commands.iter().all(|c| !c.description.is_empty()));
    }
}
