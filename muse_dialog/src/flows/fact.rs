use muse_core::{LLMProvider, RecordStore};
use tracing::info;

use crate::gateway::Generation;
use crate::menus;
use crate::prompts;
use crate::reply::Reply;
use crate::router::Services;
use crate::session::Session;

/// Random facts keep no state; opening them leaves any active flow.
pub async fn enter<P, S>(svc: &Services<P, S>, session: &mut Session) -> Vec<Reply>
where
    P: LLMProvider,
    S: RecordStore,
{
    session.reset();
    info!("User {} requested a random fact", session.user_id);

    vec![
        Reply::text("🎲 Let me find an interesting fact for you...")
            .with_photo(svc.catalog.image("random")),
        fact(svc).await,
    ]
}

pub async fn another<P, S>(svc: &Services<P, S>) -> Vec<Reply>
where
    P: LLMProvider,
    S: RecordStore,
{
    vec![
        Reply::text("🎲 Finding another interesting fact..."),
        fact(svc).await,
    ]
}

async fn fact<P, S>(svc: &Services<P, S>) -> Reply
where
    P: LLMProvider,
    S: RecordStore,
{
    let text = match svc.gateway.generate(prompts::RANDOM_FACT_PROMPT, None).await {
        Generation::Text(fact) => format!("💡 Did you know?\n\n{fact}"),
        failed @ Generation::Failed => failed.into_text(),
    };
    Reply::text(text).with_menu(menus::fact_menu())
}
