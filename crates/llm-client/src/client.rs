use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::types::{ApiErrorBody, ChatResponse, Completion, PromptRequest};
use crate::{LlmError, Result};

// ─── Completer ────────────────────────────────────────────────────────────

/// Anything that can turn a prompt into generated text.
///
/// The CLI depends on this trait rather than on [`CompletionClient`] so the
/// command handlers can run against a canned responder in tests.
pub trait Completer {
    fn complete(&self, request: &PromptRequest) -> Result<Completion>;
}

// ─── ClientConfig ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    /// Base URL up to and including the API version, e.g.
    /// `https://api.openai.com/v1`.
    pub base_url: String,
    /// Whole-request timeout. `None` waits until the transport gives up.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: None,
        }
    }
}

// ─── CompletionClient ─────────────────────────────────────────────────────

/// Blocking client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl CompletionClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("kube-ai/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Completer for CompletionClient {
    fn complete(&self, request: &PromptRequest) -> Result<Completion> {
        let body = request.to_chat_request();
        tracing::debug!(
            endpoint = %self.endpoint,
            model = %body.model,
            system_chars = request.system.as_deref().map_or(0, str::len),
            user_chars = request.user.len(),
            max_tokens = ?body.max_tokens,
            "sending chat completion request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|source| {
            LlmError::Decode {
                body: truncate(&text, 500),
                source,
            }
        })?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion usage"
            );
        }

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;

        Ok(Completion {
            text: choice.message.content.unwrap_or_default(),
            model: parsed.model,
            finish_reason: choice.finish_reason,
            usage: parsed.usage,
        })
    }
}

/// Prefer the server's `error.message`; fall back to the raw body.
fn api_error(status: StatusCode, body: &str) -> LlmError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| {
            let raw = body.trim();
            if raw.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                truncate(raw, 500)
            }
        });
    LlmError::Api {
        status: status.as_u16(),
        message,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

// ─── Tests ────────────────────────────────────────────────────────────────
