//! Per-user session state and the in-memory session store.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Utc;
use muse_core::{QuizScore, QuizStats, UserId};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::history::TalkHistory;
use crate::parse::QuizQuestion;
use crate::token::CallbackToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslateMode {
    Auto,
    EnglishToRussian,
    RussianToEnglish,
}

impl TranslateMode {
    pub const ALL: [Self; 3] = [Self::Auto, Self::EnglishToRussian, Self::RussianToEnglish];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::EnglishToRussian => "en-ru",
            Self::RussianToEnglish => "ru-en",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.key() == key)
    }

    /// Language every input is translated into; `None` for auto-detect.
    #[must_use]
    pub const fn target_language(self) -> Option<&'static str> {
        match self {
            Self::Auto => None,
            Self::EnglishToRussian => Some("Russian"),
            Self::RussianToEnglish => Some("English"),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Auto => "🔄 Auto-detect",
            Self::EnglishToRussian => "🇬🇧 English → Russian",
            Self::RussianToEnglish => "🇷🇺 Russian → English",
        }
    }
}

/// Which flow, if any, owns the user's free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    None,
    Chat,
    Talk,
    Quiz,
    Translate,
    Recommend,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TalkState {
    /// Unset after the persona menu was shown and before a choice.
    pub personality: Option<String>,
    pub history: TalkHistory,
}

/// One quiz round: from picking a topic until leaving or changing topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRound {
    pub id: Uuid,
    pub topic: String,
    pub score: u32,
    pub attempts: u32,
    /// Questions asked so far, fed back to avoid repeats.
    pub asked: Vec<String>,
    pub current: QuizQuestion,
}

impl QuizRound {
    #[must_use]
    pub fn start(topic: impl Into<String>, first: QuizQuestion) -> Self {
        let mut round = Self {
            id: Uuid::now_v7(),
            topic: topic.into(),
            score: 0,
            attempts: 0,
            asked: Vec::new(),
            current: QuizQuestion::default(),
        };
        round.ask(first);
        round
    }

    pub fn ask(&mut self, question: QuizQuestion) {
        if !question.question.is_empty() {
            self.asked.push(question.question.clone());
        }
        self.current = question;
    }

    pub const fn record_answer(&mut self, correct: bool) {
        self.attempts += 1;
        if correct {
            self.score += 1;
        }
    }

    #[must_use]
    pub fn stats(&self) -> QuizStats {
        QuizStats::default().add(u64::from(self.score), u64::from(self.attempts))
    }

    /// The row persisted for this round after each judged answer.
    #[must_use]
    pub fn score_record(&self, user_id: UserId) -> QuizScore {
        QuizScore {
            user_id,
            topic: self.topic.clone(),
            round_id: self.id,
            correct_answers: self.score,
            total_questions: self.attempts,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStage {
    TopicSelect,
    AwaitingAnswer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizState {
    pub round: Option<QuizRound>,
}

impl QuizState {
    #[must_use]
    pub const fn stage(&self) -> QuizStage {
        if self.round.is_some() {
            QuizStage::AwaitingAnswer
        } else {
            QuizStage::TopicSelect
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateState {
    pub mode: Option<TranslateMode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendState {
    pub category: Option<String>,
    pub genre: Option<String>,
    /// Item names shown this session, per category. Only ever grows.
    pub shown: BTreeMap<String, BTreeSet<String>>,
    pub last_batch: Vec<String>,
}

impl RecommendState {
    /// Items already shown in `category` during this session.
    #[must_use]
    pub fn shown_in(&self, category: &str) -> BTreeSet<String> {
        self.shown.get(category).cloned().unwrap_or_default()
    }

    pub fn record_batch(&mut self, category: &str, items: Vec<String>) {
        self.shown
            .entry(category.to_string())
            .or_default()
            .extend(items.iter().cloned());
        self.last_batch = items;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    Chat,
    Talk(TalkState),
    Quiz(QuizState),
    Translate(TranslateState),
    Recommend(RecommendState),
}

impl FlowState {
    #[must_use]
    pub const fn kind(&self) -> FlowKind {
        match self {
            Self::Idle => FlowKind::None,
            Self::Chat => FlowKind::Chat,
            Self::Talk(_) => FlowKind::Talk,
            Self::Quiz(_) => FlowKind::Quiz,
            Self::Translate(_) => FlowKind::Translate,
            Self::Recommend(_) => FlowKind::Recommend,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub flow: FlowState,
    /// Tokens of the most recently rendered menus.
    pub live_tokens: Vec<CallbackToken>,
}

impl Session {
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            flow: FlowState::Idle,
            live_tokens: Vec::new(),
        }
    }

    #[must_use]
    pub const fn active_flow(&self) -> FlowKind {
        self.flow.kind()
    }

    /// Drop all flow state.
    pub fn reset(&mut self) {
        self.flow = FlowState::Idle;
    }

    /// Whether a pressed button may be honoured.
    #[must_use]
    pub fn accepts(&self, token: &CallbackToken) -> bool {
        token.is_global() || self.live_tokens.contains(token)
    }
}

/// Sessions keyed by user. Lost on restart.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, Session>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A working copy of the user's session, fresh if none exists.
    pub async fn checkout(&self, user_id: UserId) -> Session {
        self.sessions
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| Session::new(user_id))
    }

    pub async fn commit(&self, session: Session) {
        self.sessions.lock().await.insert(session.user_id, session);
    }

    pub async fn get(&self, user_id: UserId) -> Option<Session> {
        self.sessions.lock().await.get(&user_id).cloned()
    }
}
