use muse_core::{LLMProvider, RecordStore};
use tracing::info;

use crate::menus;
use crate::reply::Reply;
use crate::router::Services;
use crate::session::{FlowState, Session};

pub fn enter<P, S>(svc: &Services<P, S>, session: &mut Session) -> Vec<Reply> {
    session.flow = FlowState::Chat;
    info!("User {} started chat", session.user_id);

    vec![
        Reply::text("🤖 Chat mode\n\nSend me any message and I'll answer it.")
            .with_photo(svc.catalog.image("gpt"))
            .with_menu(menus::finish_menu()),
    ]
}

/// Each message is answered on its own, without history.
pub async fn on_text<P, S>(svc: &Services<P, S>, text: &str) -> Vec<Reply>
where
    P: LLMProvider,
    S: RecordStore,
{
    let answer = svc.gateway.generate(text, None).await.into_text();
    vec![Reply::text(answer).with_menu(menus::finish_menu())]
}
