//! Test doubles for the generator and the record store.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use muse_core::{
    ChatRequest, ConversationContext, ConversationContextRepo, LLMProvider, LLMResponse,
    PreferenceRepo, QuizScore, QuizScoreRepo, QuizStats, RecommendationFeedback,
    RecommendationFeedbackRepo, UserId,
};
use muse_dialog::{
    Catalog, EventKind, GenerationConfig, InboundEvent, Reply, Router,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Replays queued completions in order; an empty queue or a queued `None`
/// is a provider error. Every request is recorded.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<Option<String>>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ScriptedProvider {
    pub fn reply(&self, text: &str) -> &Self {
        lock(&self.replies).push_back(Some(text.to_string()));
        self
    }

    pub fn fail(&self) -> &Self {
        lock(&self.replies).push_back(None);
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Content of the last message of the most recent request.
    pub fn last_prompt(&self) -> String {
        lock(&self.requests)
            .last()
            .and_then(|request| request.messages.last())
            .map(|message| message.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn chat(&self, request: &ChatRequest) -> anyhow::Result<LLMResponse> {
        lock(&self.requests).push(request.clone());
        match lock(&self.replies).pop_front().flatten() {
            Some(content) => Ok(LLMResponse {
                content,
                usage: None,
            }),
            None => Err(anyhow::anyhow!("generator unavailable")),
        }
    }

    fn get_default_model(&self) -> &'static str {
        "scripted"
    }
}

/// In-memory record store with switchable failure.
#[derive(Default)]
pub struct MemoryStore {
    failing: AtomicBool,
    scores: Mutex<Vec<QuizScore>>,
    contexts: Mutex<BTreeMap<UserId, ConversationContext>>,
    feedback: Mutex<BTreeMap<(UserId, String, String), bool>>,
    preferences: Mutex<BTreeMap<(UserId, String), String>>,
}

impl MemoryStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("database is locked");
        }
        Ok(())
    }

    pub fn scores(&self) -> Vec<QuizScore> {
        lock(&self.scores).clone()
    }

    pub fn context(&self, user_id: UserId) -> Option<ConversationContext> {
        lock(&self.contexts).get(&user_id).cloned()
    }

    pub fn dislikes(&self, user_id: UserId, category: &str) -> Vec<String> {
        lock(&self.feedback)
            .iter()
            .filter(|((user, cat, _), liked)| *user == user_id && cat == category && !**liked)
            .map(|((_, _, item), _)| item.clone())
            .collect()
    }
}

#[async_trait]
impl QuizScoreRepo for MemoryStore {
    async fn upsert_score(&self, score: &QuizScore) -> anyhow::Result<()> {
        self.check()?;
        let mut scores = lock(&self.scores);
        scores.retain(|row| {
            (row.user_id, &row.topic, row.round_id) != (score.user_id, &score.topic, score.round_id)
        });
        scores.push(score.clone());
        Ok(())
    }

    async fn quiz_stats(&self, user_id: UserId, topic: Option<&str>) -> anyhow::Result<QuizStats> {
        self.check()?;
        Ok(lock(&self.scores)
            .iter()
            .filter(|row| row.user_id == user_id && topic.is_none_or(|t| row.topic == t))
            .fold(QuizStats::default(), |stats, row| {
                stats.add(
                    u64::from(row.correct_answers),
                    u64::from(row.total_questions),
                )
            }))
    }
}

#[async_trait]
impl ConversationContextRepo for MemoryStore {
    async fn save_context(&self, context: &ConversationContext) -> anyhow::Result<()> {
        self.check()?;
        lock(&self.contexts).insert(context.user_id, context.clone());
        Ok(())
    }

    async fn find_context(&self, user_id: UserId) -> anyhow::Result<Option<ConversationContext>> {
        self.check()?;
        Ok(self.context(user_id))
    }

    async fn clear_context(&self, user_id: UserId) -> anyhow::Result<()> {
        self.check()?;
        lock(&self.contexts).remove(&user_id);
        Ok(())
    }
}

#[async_trait]
impl RecommendationFeedbackRepo for MemoryStore {
    async fn save_feedback(&self, feedback: &RecommendationFeedback) -> anyhow::Result<()> {
        self.check()?;
        lock(&self.feedback).insert(
            (
                feedback.user_id,
                feedback.category.clone(),
                feedback.item_name.clone(),
            ),
            feedback.liked,
        );
        Ok(())
    }

    async fn disliked_items(
        &self,
        user_id: UserId,
        category: &str,
    ) -> anyhow::Result<Vec<String>> {
        self.check()?;
        Ok(self.dislikes(user_id, category))
    }
}

#[async_trait]
impl PreferenceRepo for MemoryStore {
    async fn save_preference(
        &self,
        user_id: UserId,
        kind: &str,
        value: &str,
    ) -> anyhow::Result<()> {
        self.check()?;
        lock(&self.preferences).insert((user_id, kind.to_string()), value.to_string());
        Ok(())
    }

    async fn find_preference(
        &self,
        user_id: UserId,
        kind: &str,
    ) -> anyhow::Result<Option<String>> {
        self.check()?;
        Ok(lock(&self.preferences)
            .get(&(user_id, kind.to_string()))
            .cloned())
    }
}

pub const USER: UserId = 1001;

pub struct Harness {
    pub router: Router<ScriptedProvider, MemoryStore>,
    pub provider: ScriptedProvider,
    pub store: Arc<MemoryStore>,
}

impl Harness {
    pub fn new() -> anyhow::Result<Self> {
        let provider = ScriptedProvider::default();
        let store = Arc::new(MemoryStore::default());
        let router = Router::new(
            provider.clone(),
            Arc::clone(&store),
            Catalog::default(),
            GenerationConfig::default(),
        )?;
        Ok(Self {
            router,
            provider,
            store,
        })
    }

    pub async fn send(&self, kind: EventKind) -> anyhow::Result<Vec<Reply>> {
        Ok(self
            .router
            .handle(InboundEvent::new(USER, kind).with_display_name("Ada"))
            .await?)
    }

    pub async fn command(&self, text: &str) -> anyhow::Result<Vec<Reply>> {
        let command = muse_dialog::Command::parse(text)
            .ok_or_else(|| anyhow::anyhow!("not a command: {text}"))?;
        self.send(EventKind::Command(command)).await
    }

    /// A raw chat message, classified the way the transport does it.
    pub async fn message(&self, text: &str) -> anyhow::Result<Vec<Reply>> {
        self.send(EventKind::from_message(text, Some("muse_bot"))).await
    }

    pub async fn text(&self, text: &str) -> anyhow::Result<Vec<Reply>> {
        self.send(EventKind::FreeText(text.to_string())).await
    }

    pub async fn press(&self, token: &str) -> anyhow::Result<Vec<Reply>> {
        self.send(EventKind::ButtonPress(token.to_string())).await
    }

    pub async fn session(&self) -> anyhow::Result<muse_dialog::Session> {
        self.router
            .session(USER)
            .await
            .ok_or_else(|| anyhow::anyhow!("no session for {USER}"))
    }
}

/// Text of the single reply, failing on anything else.
pub fn only_text(replies: &[Reply]) -> anyhow::Result<&str> {
    match replies {
        [reply] => Ok(reply.text.as_str()),
        other => anyhow::bail!("expected one reply, got {}", other.len()),
    }
}
