//! Recommendations by category and genre.
//!
//! Every request excludes the user's stored dislikes for the category and
//! everything already shown in that category this session. "Not interested"
//! marks the whole last batch as disliked before asking for a new one.

use muse_core::{LLMProvider, RecordStore, UserId};
use tracing::{debug, info, warn};

use crate::catalog::RecommendationCategory;
use crate::dedup;
use crate::error::Result;
use crate::gateway::Generation;
use crate::menus;
use crate::parse;
use crate::prompts;
use crate::reply::Reply;
use crate::router::Services;
use crate::session::{FlowState, RecommendState, Session};

const CATEGORY_PROMPT: &str = "🎬📚 Recommendations\n\nWhat would you like recommendations for?";

pub fn enter<P, S>(svc: &Services<P, S>, session: &mut Session) -> Vec<Reply> {
    session.flow = FlowState::Recommend(RecommendState::default());
    info!("User {} started recommendations", session.user_id);

    vec![
        Reply::text(CATEGORY_PROMPT)
            .with_photo(svc.catalog.image("recommend"))
            .with_menu(menus::categories_menu(&svc.catalog)),
    ]
}

pub fn select_category<P, S>(
    svc: &Services<P, S>,
    session: &mut Session,
    category_id: &str,
) -> Vec<Reply> {
    let Some(category) = svc.catalog.category(category_id) else {
        debug!("Unknown recommendation category {category_id}");
        return Vec::new();
    };

    info!("User {} selected category {}", session.user_id, category.name);
    // Shown sets survive as long as the flow does.
    let mut state = match std::mem::take(&mut session.flow) {
        FlowState::Recommend(state) => state,
        _ => RecommendState::default(),
    };
    state.category = Some(category.id.clone());
    state.genre = None;
    state.last_batch.clear();
    session.flow = FlowState::Recommend(state);

    vec![
        Reply::text(format!(
            "{} {} Recommendations\n\nChoose a genre:",
            category.icon, category.name
        ))
        .with_menu(menus::genres_menu(category)),
    ]
}

fn current_category<'c, P, S>(
    svc: &'c Services<P, S>,
    state: &RecommendState,
) -> Option<&'c RecommendationCategory> {
    state
        .category
        .as_deref()
        .and_then(|id| svc.catalog.category(id))
}

pub async fn select_genre<P, S>(
    svc: &Services<P, S>,
    session: &mut Session,
    genre_id: &str,
) -> Result<Vec<Reply>>
where
    P: LLMProvider,
    S: RecordStore,
{
    let user_id = session.user_id;
    let FlowState::Recommend(state) = &mut session.flow else {
        return Ok(Vec::new());
    };
    let Some(category) = current_category(svc, state) else {
        return Ok(Vec::new());
    };
    if category.genre(genre_id).is_none() {
        debug!("Unknown genre {genre_id} for {}", category.id);
        return Ok(Vec::new());
    }

    info!("User {user_id} selected genre {genre_id}");
    request_batch(svc, user_id, state, category, genre_id).await
}

/// Another batch for the current genre.
pub async fn more<P, S>(svc: &Services<P, S>, session: &mut Session) -> Result<Vec<Reply>>
where
    P: LLMProvider,
    S: RecordStore,
{
    let user_id = session.user_id;
    let FlowState::Recommend(state) = &mut session.flow else {
        return Ok(Vec::new());
    };
    let (Some(category), Some(genre_id)) = (current_category(svc, state), state.genre.clone())
    else {
        return Ok(Vec::new());
    };

    request_batch(svc, user_id, state, category, &genre_id).await
}

/// Persist the last batch as disliked, then fetch a new one.
pub async fn dislike<P, S>(svc: &Services<P, S>, session: &mut Session) -> Result<Vec<Reply>>
where
    P: LLMProvider,
    S: RecordStore,
{
    let user_id = session.user_id;
    let FlowState::Recommend(state) = &mut session.flow else {
        return Ok(Vec::new());
    };
    let (Some(category), Some(genre_id)) = (current_category(svc, state), state.genre.clone())
    else {
        return Ok(Vec::new());
    };

    dedup::record_dislikes(&*svc.store, user_id, &category.id, &state.last_batch).await?;
    request_batch(svc, user_id, state, category, &genre_id).await
}

/// Back to category selection. Shown items stay excluded.
pub fn back<P, S>(svc: &Services<P, S>, session: &mut Session) -> Vec<Reply> {
    if let FlowState::Recommend(state) = &mut session.flow {
        state.genre = None;
        state.last_batch.clear();
    }

    vec![Reply::text(CATEGORY_PROMPT).with_menu(menus::categories_menu(&svc.catalog))]
}

async fn request_batch<P, S>(
    svc: &Services<P, S>,
    user_id: UserId,
    state: &mut RecommendState,
    category: &RecommendationCategory,
    genre_id: &str,
) -> Result<Vec<Reply>>
where
    P: LLMProvider,
    S: RecordStore,
{
    let genre = category.genre(genre_id).unwrap_or(genre_id);
    let excluded = dedup::compute_exclusion_set(
        &*svc.store,
        user_id,
        &category.id,
        &state.shown_in(&category.id),
    )
    .await?;

    debug!(
        "Requesting {} {} for user {} excluding {} item(s)",
        genre,
        category.item_noun,
        user_id,
        excluded.len()
    );

    let prompt = prompts::recommendation(category, genre, &excluded);
    let Generation::Text(text) = svc.gateway.generate(&prompt, None).await else {
        return Ok(vec![Reply::apology()]);
    };

    let items = parse::extract_item_names(&text);
    if items.is_empty() {
        warn!("No item names found in recommendation response");
    }
    state.genre = Some(genre_id.to_string());
    state.record_batch(&category.id, items);

    Ok(vec![
        Reply::text(format!(
            "{} {} Recommendations - {genre}\n\n{text}",
            category.icon, category.name
        ))
        .with_menu(menus::feedback_menu()),
    ])
}
