use muse_core::{LLMProvider, RecordStore};
use tracing::info;

use crate::gateway::Generation;
use crate::menus;
use crate::parse;
use crate::prompts;
use crate::reply::Reply;
use crate::router::Services;
use crate::session::{FlowState, Session, TranslateMode, TranslateState};

pub fn enter<P, S>(svc: &Services<P, S>, session: &mut Session) -> Vec<Reply> {
    session.flow = FlowState::Translate(TranslateState::default());
    info!("User {} started translator", session.user_id);

    vec![
        Reply::text("🌐 Translator\n\nChoose translation mode:")
            .with_photo(svc.catalog.image("translate"))
            .with_menu(menus::translate_modes_menu()),
    ]
}

pub fn select_mode(session: &mut Session, mode: TranslateMode) -> Vec<Reply> {
    session.flow = FlowState::Translate(TranslateState { mode: Some(mode) });
    info!("User {} selected translation mode {}", session.user_id, mode.key());

    let text = match mode.target_language() {
        None => "🔄 Auto-detect mode\n\nSend me text in any language and I'll translate it.".to_string(),
        Some(target) => format!("{}\n\nSend me text to translate to {target}.", mode.label()),
    };
    vec![Reply::text(text).with_menu(menus::translate_continue_menu())]
}

/// Translate with the selected mode. Text sent before a mode is chosen is
/// ignored.
pub async fn on_text<P, S>(svc: &Services<P, S>, state: &TranslateState, text: &str) -> Vec<Reply>
where
    P: LLMProvider,
    S: RecordStore,
{
    let Some(mode) = state.mode else {
        return Vec::new();
    };

    let rendered = if let Some(target) = mode.target_language() {
        match svc.gateway.generate(&prompts::translation(text, target), None).await {
            Generation::Text(translation) => format!("📝 Translation to {target}:\n\n{translation}"),
            Generation::Failed => return vec![Reply::apology()],
        }
    } else {
        match svc.gateway.generate(&prompts::auto_translation(text), None).await {
            Generation::Text(raw) => {
                let parsed = parse::parse_auto_translation(&raw);
                let detected = if parsed.detected.is_empty() {
                    "unknown"
                } else {
                    parsed.detected.as_str()
                };
                format!("🔍 Detected: {detected}\n\n📝 Translation:\n{}", parsed.translation)
            }
            Generation::Failed => return vec![Reply::apology()],
        }
    };

    vec![Reply::text(rendered).with_menu(menus::translate_continue_menu())]
}

/// Back to mode selection; the previous mode is forgotten.
pub fn change_mode(session: &mut Session) -> Vec<Reply> {
    session.flow = FlowState::Translate(TranslateState::default());
    vec![Reply::text("🌐 Choose translation mode:").with_menu(menus::translate_modes_menu())]
}
