//! Conversation with a configured persona.
//!
//! The stored context is hydrated only when it belongs to the persona being
//! selected. After every successful turn the whole bounded history is
//! written back over the user's single context row.

use muse_core::{ConversationContext, LLMProvider, RecordStore, UserId};
use tracing::{info, warn};

use crate::error::Result;
use crate::gateway::Generation;
use crate::history::TalkHistory;
use crate::menus;
use crate::reply::Reply;
use crate::router::Services;
use crate::session::{FlowState, Session, TalkState};

pub fn enter<P, S>(svc: &Services<P, S>, session: &mut Session) -> Vec<Reply> {
    session.flow = FlowState::Talk(TalkState::default());
    info!("User {} started talk", session.user_id);

    vec![
        Reply::text("👥 Choose a personality to talk to:")
            .with_photo(svc.catalog.image("talk"))
            .with_menu(menus::personalities_menu(&svc.catalog)),
    ]
}

pub async fn select_personality<P, S>(
    svc: &Services<P, S>,
    session: &mut Session,
    personality_id: &str,
) -> Result<Vec<Reply>>
where
    P: LLMProvider,
    S: RecordStore,
{
    let Some(persona) = svc.catalog.personality(personality_id) else {
        warn!("Unknown personality {personality_id}");
        return Ok(Vec::new());
    };

    let stored = svc.store.find_context(session.user_id).await?;
    let history = match stored {
        Some(context) if context.personality == persona.id => {
            TalkHistory::from_messages(context.history)
        }
        _ => TalkHistory::new(),
    };

    info!(
        "User {} talks to {} ({} messages restored)",
        session.user_id,
        persona.name,
        history.len()
    );

    let text = if history.is_empty() {
        format!("🎭 You're now talking to {}!\n\nType your message:", persona.name)
    } else {
        format!(
            "📜 Continuing your conversation with {}...\n\nType your message:",
            persona.name
        )
    };

    session.flow = FlowState::Talk(TalkState {
        personality: Some(persona.id.clone()),
        history,
    });

    Ok(vec![Reply::text(text).with_menu(menus::talk_menu())])
}

pub async fn on_text<P, S>(
    svc: &Services<P, S>,
    user_id: UserId,
    state: &mut TalkState,
    text: &str,
) -> Result<Vec<Reply>>
where
    P: LLMProvider,
    S: RecordStore,
{
    let Some(persona) = state
        .personality
        .as_deref()
        .and_then(|id| svc.catalog.personality(id))
    else {
        return Ok(Vec::new());
    };

    let request = state.history.build_request(&persona.prompt, text);
    let Generation::Text(answer) = svc.gateway.generate_from_history(request).await else {
        return Ok(vec![Reply::apology()]);
    };

    state.history.push_exchange(text, answer.clone());
    svc.store
        .save_context(&ConversationContext {
            user_id,
            personality: persona.id.clone(),
            history: state.history.messages().to_vec(),
        })
        .await?;

    Ok(vec![Reply::text(answer).with_menu(menus::talk_menu())])
}

/// Drop the whole session and offer the personas again.
pub fn change_personality<P, S>(svc: &Services<P, S>, session: &mut Session) -> Vec<Reply> {
    *session = Session::new(session.user_id);

    vec![
        Reply::text("🔄 Choose a new personality to talk to:")
            .with_menu(menus::personalities_menu(&svc.catalog)),
    ]
}
