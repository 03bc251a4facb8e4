use async_trait::async_trait;

use crate::UserId;
use crate::records::{ConversationContext, QuizScore, QuizStats, RecommendationFeedback};

#[async_trait]
pub trait QuizScoreRepo: Send + Sync {
    /// Insert or replace the row of `score.round_id`.
    async fn upsert_score(&self, score: &QuizScore) -> anyhow::Result<()>;

    /// Sum of all rounds for the user, optionally restricted to one topic.
    async fn quiz_stats(&self, user_id: UserId, topic: Option<&str>) -> anyhow::Result<QuizStats>;
}

#[async_trait]
pub trait ConversationContextRepo: Send + Sync {
    /// Overwrite the user's single persisted context.
    async fn save_context(&self, context: &ConversationContext) -> anyhow::Result<()>;

    async fn find_context(&self, user_id: UserId) -> anyhow::Result<Option<ConversationContext>>;

    async fn clear_context(&self, user_id: UserId) -> anyhow::Result<()>;
}

#[async_trait]
pub trait RecommendationFeedbackRepo: Send + Sync {
    /// Insert or replace feedback for (user, category, item).
    async fn save_feedback(&self, feedback: &RecommendationFeedback) -> anyhow::Result<()>;

    async fn disliked_items(&self, user_id: UserId, category: &str)
    -> anyhow::Result<Vec<String>>;
}

#[async_trait]
pub trait PreferenceRepo: Send + Sync {
    async fn save_preference(&self, user_id: UserId, kind: &str, value: &str)
    -> anyhow::Result<()>;

    async fn find_preference(&self, user_id: UserId, kind: &str)
    -> anyhow::Result<Option<String>>;
}

/// Everything the dialog layer needs from durable storage.
pub trait RecordStore:
    QuizScoreRepo + ConversationContextRepo + RecommendationFeedbackRepo + PreferenceRepo
{
}

impl<T> RecordStore for T where
    T: QuizScoreRepo + ConversationContextRepo + RecommendationFeedbackRepo + PreferenceRepo
{
}
