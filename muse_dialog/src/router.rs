//! Event routing and session commit.

use std::sync::Arc;

use muse_core::{LLMProvider, RecordStore, UserId};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::event::{Command, EventKind, Feature, InboundEvent};
use crate::flows::{chat, fact, quiz, recommend, start, talk, translate};
use crate::gateway::{GenerationConfig, TextGateway};
use crate::reply::{Menu, Reply};
use crate::session::{FlowState, Session, SessionStore};
use crate::token::CallbackToken;

/// What every flow handler may use.
pub struct Services<P, S> {
    pub gateway: TextGateway<P>,
    pub store: Arc<S>,
    pub catalog: Catalog,
}

/// Routes inbound events to the active flow of the sending user.
///
/// Each event works on a copy of the user's session. The copy is committed
/// only when the handler succeeds, so a storage failure leaves the session
/// exactly as it was and produces no replies. Events of one user must be
/// delivered sequentially; different users may be handled concurrently.
pub struct Router<P, S> {
    services: Services<P, S>,
    sessions: SessionStore,
}

impl<P, S> Router<P, S>
where
    P: LLMProvider,
    S: RecordStore,
{
    pub fn new(
        provider: P,
        store: Arc<S>,
        catalog: Catalog,
        generation: GenerationConfig,
    ) -> Result<Self> {
        catalog.validate()?;
        info!(
            "Router ready: {} quiz topics, {} personalities, {} recommendation categories",
            catalog.quiz_topics.len(),
            catalog.personalities.len(),
            catalog.recommendation_categories.len()
        );

        Ok(Self {
            services: Services {
                gateway: TextGateway::new(provider, generation),
                store,
                catalog,
            },
            sessions: SessionStore::new(),
        })
    }

    pub const fn catalog(&self) -> &Catalog {
        &self.services.catalog
    }

    /// Snapshot of a user's committed session.
    pub async fn session(&self, user_id: UserId) -> Option<Session> {
        self.sessions.get(user_id).await
    }

    pub async fn handle(&self, event: InboundEvent) -> Result<Vec<Reply>> {
        let InboundEvent {
            user_id,
            display_name,
            kind,
        } = event;
        let name = display_name.as_deref();

        let before = self.sessions.checkout(user_id).await;
        let mut session = before.clone();

        let replies = match kind {
            EventKind::Command(command) => self.on_command(&mut session, command, name).await?,
            EventKind::FreeText(text) => self.on_text(&mut session, &text).await?,
            EventKind::ButtonPress(data) => self.on_button(&mut session, &data, name).await?,
            EventKind::UnknownCommand(word) => {
                debug!("User {user_id} sent unsupported command {word}");
                Vec::new()
            }
        };

        let rendered: Vec<CallbackToken> = replies
            .iter()
            .filter_map(|reply| reply.menu.as_ref())
            .flat_map(Menu::tokens)
            .cloned()
            .collect();
        if !rendered.is_empty() {
            session.live_tokens = rendered;
        }

        if session != before {
            self.sessions.commit(session).await;
        }
        Ok(replies)
    }

    async fn on_command(
        &self,
        session: &mut Session,
        command: Command,
        name: Option<&str>,
    ) -> Result<Vec<Reply>> {
        let svc = &self.services;
        debug!("User {} sent /{}", session.user_id, command.name());

        match command {
            Command::Start => Ok(start::welcome(svc, session, name)),
            Command::Help => Ok(start::help()),
            Command::Cancel => Ok(start::finish(session, name)),
            Command::Stats => start::stats(svc, session.user_id).await,
            Command::Open(feature) => Ok(self.open(session, feature).await),
        }
    }

    async fn open(&self, session: &mut Session, feature: Feature) -> Vec<Reply> {
        let svc = &self.services;
        match feature {
            Feature::RandomFact => fact::enter(svc, session).await,
            Feature::Chat => chat::enter(svc, session),
            Feature::Talk => talk::enter(svc, session),
            Feature::Quiz => quiz::enter(svc, session),
            Feature::Translate => translate::enter(svc, session),
            Feature::Recommend => recommend::enter(svc, session),
        }
    }

    /// Free text goes to the active flow; with no flow it is ignored.
    async fn on_text(&self, session: &mut Session, text: &str) -> Result<Vec<Reply>> {
        let svc = &self.services;
        let user_id = session.user_id;

        match &mut session.flow {
            FlowState::Idle => {
                debug!("User {user_id} sent text with no active flow");
                Ok(Vec::new())
            }
            FlowState::Chat => Ok(chat::on_text(svc, text).await),
            FlowState::Talk(state) => talk::on_text(svc, user_id, state, text).await,
            FlowState::Quiz(state) => quiz::on_text(svc, user_id, state, text).await,
            FlowState::Translate(state) => Ok(translate::on_text(svc, state, text).await),
            FlowState::Recommend(_) => {
                debug!("User {user_id} sent text while browsing recommendations");
                Ok(Vec::new())
            }
        }
    }

    /// Buttons from menus that are no longer current are ignored, except
    /// for navigation that is valid from anywhere.
    async fn on_button(
        &self,
        session: &mut Session,
        data: &str,
        name: Option<&str>,
    ) -> Result<Vec<Reply>> {
        let svc = &self.services;

        let token = match data.parse::<CallbackToken>() {
            Ok(token) => token,
            Err(e) => {
                debug!("User {} pressed an unknown button: {e}", session.user_id);
                return Ok(Vec::new());
            }
        };
        if !session.accepts(&token) {
            debug!("User {} pressed a stale button {token}", session.user_id);
            return Ok(Vec::new());
        }

        match token {
            CallbackToken::Open(feature) => Ok(self.open(session, feature).await),
            CallbackToken::Finish => Ok(start::finish(session, name)),
            CallbackToken::AnotherFact => Ok(fact::another(svc).await),
            CallbackToken::QuizTopic(topic) => {
                Ok(quiz::select_topic(svc, session, topic.as_str()).await)
            }
            CallbackToken::QuizNext => Ok(quiz::next_question(svc, session).await),
            CallbackToken::QuizChangeTopic => Ok(quiz::change_topic(svc, session)),
            CallbackToken::TalkPersona(persona) => {
                talk::select_personality(svc, session, persona.as_str()).await
            }
            CallbackToken::TalkChangePersona => Ok(talk::change_personality(svc, session)),
            CallbackToken::TranslateMode(mode) => Ok(translate::select_mode(session, mode)),
            CallbackToken::TranslateChangeMode => Ok(translate::change_mode(session)),
            CallbackToken::RecCategory(category) => {
                Ok(recommend::select_category(svc, session, category.as_str()))
            }
            CallbackToken::RecGenre(genre) => {
                recommend::select_genre(svc, session, genre.as_str()).await
            }
            CallbackToken::RecBack => Ok(recommend::back(svc, session)),
            CallbackToken::RecDislike => recommend::dislike(svc, session).await,
            CallbackToken::RecMore => recommend::more(svc, session).await,
        }
    }
}
