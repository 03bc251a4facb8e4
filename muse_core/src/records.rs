//! Durable record types shared by the dialog layer and the record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ChatMessage, UserId};

/// Running totals of one quiz round on one topic.
///
/// A round starts when the user picks a topic and ends when they leave the
/// quiz or pick another topic. Every answer rewrites the round's row with the
/// cumulative totals, so summing rows never counts an answer twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizScore {
    pub user_id: UserId,
    pub topic: String,
    pub round_id: Uuid,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate quiz accuracy across rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizStats {
    pub correct: u64,
    pub total: u64,
}

impl QuizStats {
    /// Accuracy in percent, rounded to two decimals. Zero when nothing was answered.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let raw = self.correct as f64 / self.total as f64 * 100.0;
        (raw * 100.0).round() / 100.0
    }

    /// Fold one more round into the aggregate.
    #[must_use]
    pub const fn add(self, correct: u64, total: u64) -> Self {
        Self {
            correct: self.correct + correct,
            total: self.total + total,
        }
    }
}

/// The single persisted talk context of a user: the latest personality and
/// its capped history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub user_id: UserId,
    pub personality: String,
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationFeedback {
    pub user_id: UserId,
    pub category: String,
    pub item_name: String,
    pub liked: bool,
}
