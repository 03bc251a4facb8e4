use async_trait::async_trait;
use chrono::Utc;
use muse_core::{
    ChatMessage, ConversationContext, ConversationContextRepo, PreferenceRepo, QuizScore,
    QuizScoreRepo, QuizStats, RecommendationFeedback, RecommendationFeedbackRepo, UserId,
};
use muse_entities::{conversations, quiz_scores, recommendations, user_preferences};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{debug, info};

use crate::Store;

#[async_trait]
impl QuizScoreRepo for Store {
    async fn upsert_score(&self, score: &QuizScore) -> anyhow::Result<()> {
        let model = quiz_scores::ActiveModel {
            user_id: Set(score.user_id),
            topic: Set(score.topic.clone()),
            round_id: Set(score.round_id),
            correct_answers: Set(i32::try_from(score.correct_answers)?),
            total_questions: Set(i32::try_from(score.total_questions)?),
            updated_at: Set(score.updated_at),
        };

        quiz_scores::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    quiz_scores::Column::UserId,
                    quiz_scores::Column::Topic,
                    quiz_scores::Column::RoundId,
                ])
                .update_columns([
                    quiz_scores::Column::CorrectAnswers,
                    quiz_scores::Column::TotalQuestions,
                    quiz_scores::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&self.db)
            .await?;

        debug!(
            "Saved quiz score for user {} on {}: {}/{}",
            score.user_id, score.topic, score.correct_answers, score.total_questions
        );
        Ok(())
    }

    async fn quiz_stats(&self, user_id: UserId, topic: Option<&str>) -> anyhow::Result<QuizStats> {
        let mut query =
            quiz_scores::Entity::find().filter(quiz_scores::Column::UserId.eq(user_id));
        if let Some(topic) = topic {
            query = query.filter(quiz_scores::Column::Topic.eq(topic));
        }

        let rows = query.all(&self.db).await?;

        Ok(rows.iter().fold(QuizStats::default(), |stats, row| {
            stats.add(
                u64::try_from(row.correct_answers).unwrap_or(0),
                u64::try_from(row.total_questions).unwrap_or(0),
            )
        }))
    }
}

#[async_trait]
impl ConversationContextRepo for Store {
    async fn save_context(&self, context: &ConversationContext) -> anyhow::Result<()> {
        let model = conversations::ActiveModel {
            user_id: Set(context.user_id),
            personality: Set(context.personality.clone()),
            context: Set(serde_json::to_string(&context.history)?),
            updated_at: Set(Utc::now()),
        };

        conversations::Entity::insert(model)
            .on_conflict(
                OnConflict::column(conversations::Column::UserId)
                    .update_columns([
                        conversations::Column::Personality,
                        conversations::Column::Context,
                        conversations::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        debug!(
            "Saved conversation context for user {} ({} messages with {})",
            context.user_id,
            context.history.len(),
            context.personality
        );
        Ok(())
    }

    async fn find_context(&self, user_id: UserId) -> anyhow::Result<Option<ConversationContext>> {
        let Some(model) = conversations::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let history: Vec<ChatMessage> = serde_json::from_str(&model.context)?;

        Ok(Some(ConversationContext {
            user_id: model.user_id,
            personality: model.personality,
            history,
        }))
    }

    async fn clear_context(&self, user_id: UserId) -> anyhow::Result<()> {
        conversations::Entity::delete_by_id(user_id)
            .exec(&self.db)
            .await?;

        info!("Cleared conversation context for user {}", user_id);
        Ok(())
    }
}

#[async_trait]
impl RecommendationFeedbackRepo for Store {
    async fn save_feedback(&self, feedback: &RecommendationFeedback) -> anyhow::Result<()> {
        let model = recommendations::ActiveModel {
            user_id: Set(feedback.user_id),
            category: Set(feedback.category.clone()),
            item_name: Set(feedback.item_name.clone()),
            liked: Set(feedback.liked),
            updated_at: Set(Utc::now()),
        };

        recommendations::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    recommendations::Column::UserId,
                    recommendations::Column::Category,
                    recommendations::Column::ItemName,
                ])
                .update_columns([
                    recommendations::Column::Liked,
                    recommendations::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&self.db)
            .await?;

        debug!(
            "Saved feedback for user {} on {}/{}: liked={}",
            feedback.user_id, feedback.category, feedback.item_name, feedback.liked
        );
        Ok(())
    }

    async fn disliked_items(
        &self,
        user_id: UserId,
        category: &str,
    ) -> anyhow::Result<Vec<String>> {
        let rows = recommendations::Entity::find()
            .filter(recommendations::Column::UserId.eq(user_id))
            .filter(recommendations::Column::Category.eq(category))
            .filter(recommendations::Column::Liked.eq(false))
            .order_by_asc(recommendations::Column::ItemName)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(|row| row.item_name).collect())
    }
}

#[async_trait]
impl PreferenceRepo for Store {
    async fn save_preference(
        &self,
        user_id: UserId,
        kind: &str,
        value: &str,
    ) -> anyhow::Result<()> {
        let model = user_preferences::ActiveModel {
            user_id: Set(user_id),
            preference_type: Set(kind.to_owned()),
            preference_value: Set(value.to_owned()),
        };

        user_preferences::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    user_preferences::Column::UserId,
                    user_preferences::Column::PreferenceType,
                ])
                .update_column(user_preferences::Column::PreferenceValue)
                .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    async fn find_preference(
        &self,
        user_id: UserId,
        kind: &str,
    ) -> anyhow::Result<Option<String>> {
        let model = user_preferences::Entity::find_by_id((user_id, kind.to_owned()))
            .one(&self.db)
            .await?;

        Ok(model.map(|m| m.preference_value))
    }
}
