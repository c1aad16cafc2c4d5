//! Text generation through the Anthropic Messages API.
//!
//! Domain code depends only on `TextGenerator`; `LlmClient` is the one
//! implementation that talks to the network. A call is made once and its
//! outcome returned as is, so fan-out callers (tailoring) decide per item what
//! a failure means.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";
/// Tailored summaries are a few sections of markdown; this bounds the reply.
const MAX_OUTPUT_TOKENS: u32 = 4096;
const CALL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to model failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model API returned {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("model returned no text")]
    Empty,
}

/// Prompt in, text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'static str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserTurn<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> MessagesRequest<'a> {
    fn single_turn(prompt: &'a str, system: &'a str) -> Self {
        Self {
            model: MODEL,
            max_tokens: MAX_OUTPUT_TOKENS,
            system,
            messages: [UserTurn {
                role: "user",
                content: prompt,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<ResponseBlock>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl MessagesResponse {
    /// All `text` blocks joined; `None` when that is blank.
    pub fn joined_text(&self) -> Option<String> {
        let joined = self
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<String>();
        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Human-readable reason from an API error body; the raw body if it isn't JSON.
fn rejection_reason(body: String) -> String {
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body,
    }
}

#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let http = Client::builder().timeout(CALL_TIMEOUT).build()?;
        Ok(Self { http, api_key })
    }

    /// One Messages API round trip.
    pub async fn send(&self, prompt: &str, system: &str) -> Result<MessagesResponse, LlmError> {
        let response = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&MessagesRequest::single_turn(prompt, system))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Rejected {
                status: status.as_u16(),
                message: rejection_reason(body),
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        if let Some(usage) = &parsed.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "model call finished"
            );
        }
        Ok(parsed)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.send(prompt, system)
            .await?
            .joined_text()
            .ok_or(LlmError::Empty)
    }
}
