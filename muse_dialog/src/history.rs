//! Bounded persona conversation history.

use muse_core::ChatMessage;

/// Maximum number of user and assistant messages retained per persona.
pub const TALK_HISTORY_LIMIT: usize = 20;

/// A FIFO window of alternating user and assistant messages.
///
/// The window never holds more than its limit; the oldest messages are
/// dropped first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkHistory {
    messages: Vec<ChatMessage>,
    limit: usize,
}

impl Default for TalkHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl TalkHistory {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_limit(TALK_HISTORY_LIMIT)
    }

    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            messages: Vec::new(),
            limit,
        }
    }

    /// Hydrate from persisted messages, keeping only the newest ones.
    #[must_use]
    pub fn from_messages(messages: Vec<ChatMessage>) -> Self {
        let mut history = Self {
            messages,
            limit: TALK_HISTORY_LIMIT,
        };
        history.truncate();
        history
    }

    pub fn push_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.messages.push(ChatMessage::user(user));
        self.messages.push(ChatMessage::assistant(assistant));
        self.truncate();
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// System prompt, then the retained history, then the new user message.
    #[must_use]
    pub fn build_request(&self, system_prompt: &str, new_message: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.messages.len() + 2);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend(self.messages.iter().cloned());
        messages.push(ChatMessage::user(new_message));
        messages
    }

    fn truncate(&mut self) {
        let excess = self.messages.len().saturating_sub(self.limit);
        self.messages.drain(..excess);
    }
}
