use async_trait::async_trait;
use muse_core::{ChatRequest, LLMProvider, LLMResponse, Usage};
use reqwest::Client;
use serde_json::{Map, Value, json};
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for OpenAI-compatible `/chat/completions` endpoints.
///
/// Each call is a single attempt; callers decide what a failure means.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> Self {
        info!("Creating OpenAiProvider");
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn request_body(request: &ChatRequest) -> Value {
        json!({
            "model": request.model,
            "messages": request.messages,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        })
    }
}

/// A usage counter; absent or malformed counters read as zero.
fn token_count(usage: &Map<String, Value>, key: &str) -> u32 {
    usage
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

/// Extract the first choice and token usage from a completion payload.
fn parse_completion(response: &Value) -> anyhow::Result<LLMResponse> {
    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing content"))?
        .trim()
        .to_string();

    let usage = response["usage"].as_object().map(|u| Usage {
        prompt_tokens: token_count(u, "prompt_tokens"),
        completion_tokens: token_count(u, "completion_tokens"),
        total_tokens: token_count(u, "total_tokens"),
    });

    Ok(LLMResponse { content, usage })
}

#[async_trait]
impl LLMProvider for OpenAiProvider {
    async fn chat(&self, request: &ChatRequest) -> anyhow::Result<LLMResponse> {
        info!(
            "Sending request to {}: model={}, messages={}",
            self.base_url,
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&Self::request_body(request))
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        let parsed = parse_completion(&response)?;

        if let Some(usage) = &parsed.usage {
            info!(
                "Received completion: {} prompt + {} completion = {} tokens",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(parsed)
    }

    fn get_default_model(&self) -> &'static str {
        "gpt-4.1"
    }
}
