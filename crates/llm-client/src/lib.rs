//! `llm-client`: blocking client for OpenAI-compatible chat-completion APIs.
//!
//! # Architecture
//!
//! ```text
//! PromptRequest       ← system prompt, user prompt, model, token budget
//!     │
//!     ▼
//! ChatRequest         ← wire body for POST {base_url}/chat/completions
//!     │
//!     ▼
//! CompletionClient    ← reqwest blocking client, bearer auth
//!     │
//!     ▼
//! Completion          ← first choice's text + model, finish reason, usage
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use llm_client::{ClientConfig, Completer, CompletionClient, PromptRequest};
//!
//! let client = CompletionClient::new(ClientConfig::new(api_key, "https://api.openai.com/v1"))?;
//! let req = PromptRequest::new("gpt-3.5-turbo", "How do I list pods?")
//!     .system("You are a Kubernetes expert.")
//!     .max_tokens(512);
//! println!("{}", client.complete(&req)?.text);
//! ```

pub mod client;
pub mod error;
pub mod types;


pub use client::{ClientConfig, Completer, CompletionClient};
pub use error::LlmError;
pub use types::{ChatMessage, ChatRequest, ChatResponse, Completion, PromptRequest, Role, Usage};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, LlmError>;
