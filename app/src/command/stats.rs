use muse_config::Config;
use muse_core::{QuizScoreRepo, QuizStats};

use super::{CommandStrategy, open_store};

/// Input for the `stats` command.
pub struct StatsInput {
    pub user_id: i64,
    pub topic: Option<String>,
}

/// Strategy for printing a user's quiz accuracy from the record store.
pub struct StatsStrategy;

fn format_line(label: &str, stats: QuizStats) -> String {
    format!(
        "{label}: {}/{} ({:.2}%)",
        stats.correct,
        stats.total,
        stats.percentage()
    )
}

impl CommandStrategy for StatsStrategy {
    type Input = StatsInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let store = open_store(&config).await?;

        let topics: Vec<(String, String)> = match input.topic {
            Some(topic) => {
                let name = config
                    .catalog
                    .quiz_topic(&topic)
                    .map_or_else(|| topic.clone(), |t| t.name.clone());
                vec![(topic, name)]
            }
            None => config
                .catalog
                .quiz_topics
                .iter()
                .map(|t| (t.id.clone(), t.name.clone()))
                .collect(),
        };

        println!("=== Quiz statistics for user {} ===\n", input.user_id);
        for (id, name) in &topics {
            let stats = store.quiz_stats(input.user_id, Some(id.as_str())).await?;
            if stats.total > 0 {
                println!("{}", format_line(name, stats));
            }
        }

        let overall = store.quiz_stats(input.user_id, None).await?;
        if overall.total == 0 {
            println!("No answered questions yet.");
        } else {
            println!("{}", format_line("Overall", overall));
        }
        Ok(())
    }
}
