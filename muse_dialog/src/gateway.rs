//! The single seam to the text generator.
//!
//! Generation never raises: a provider error or an empty completion becomes
//! [`Generation::Failed`], and flows answer with [`FALLBACK_TEXT`] while
//! leaving their state untouched.

use muse_core::{ChatMessage, ChatRequest, LLMProvider};
use tracing::{debug, error, warn};

pub const FALLBACK_TEXT: &str =
    "I apologize, but I have encountered an error. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Text(String),
    Failed,
}

impl Generation {
    /// The generated text, or the fallback apology.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Failed => FALLBACK_TEXT.to_string(),
        }
    }

    #[must_use]
    pub fn text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Failed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

pub struct TextGateway<P> {
    provider: P,
    config: GenerationConfig,
}

impl<P: LLMProvider> TextGateway<P> {
    pub const fn new(provider: P, config: GenerationConfig) -> Self {
        Self { provider, config }
    }

    /// One-shot generation with an optional system prompt.
    pub async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> Generation {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));
        self.complete(messages).await
    }

    /// Generation over an explicit message list, system prompt included.
    pub async fn generate_from_history(&self, messages: Vec<ChatMessage>) -> Generation {
        self.complete(messages).await
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Generation {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(
            "Generating with {} ({} messages)",
            request.model,
            request.messages.len()
        );

        match self.provider.chat(&request).await {
            Ok(response) if response.content.trim().is_empty() => {
                warn!("Generator returned an empty completion");
                Generation::Failed
            }
            Ok(response) => Generation::Text(response.content),
            Err(e) => {
                error!("Text generation failed: {e:#}");
                Generation::Failed
            }
        }
    }
}
