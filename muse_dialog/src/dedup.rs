//! Recommendation de-duplication.
//!
//! A request must never suggest an item the user disliked in that category
//! (durable) or an item already shown in that category this session.

use std::collections::BTreeSet;

use muse_core::{RecommendationFeedback, RecommendationFeedbackRepo, UserId};
use tracing::info;

/// Union of the stored dislikes and the session's shown items for `category`.
pub async fn compute_exclusion_set<S>(
    store: &S,
    user_id: UserId,
    category: &str,
    shown: &BTreeSet<String>,
) -> anyhow::Result<BTreeSet<String>>
where
    S: RecommendationFeedbackRepo + ?Sized,
{
    let mut excluded: BTreeSet<String> = store
        .disliked_items(user_id, category)
        .await?
        .into_iter()
        .collect();
    excluded.extend(shown.iter().cloned());
    Ok(excluded)
}

/// Persist a dislike for every item of the batch the user rejected.
pub async fn record_dislikes<S>(
    store: &S,
    user_id: UserId,
    category: &str,
    batch: &[String],
) -> anyhow::Result<()>
where
    S: RecommendationFeedbackRepo + ?Sized,
{
    for item in batch {
        store
            .save_feedback(&RecommendationFeedback {
                user_id,
                category: category.to_string(),
                item_name: item.clone(),
                liked: false,
            })
            .await?;
    }

    if !batch.is_empty() {
        info!(
            "User {} disliked {} {} item(s)",
            user_id,
            batch.len(),
            category
        );
    }
    Ok(())
}
