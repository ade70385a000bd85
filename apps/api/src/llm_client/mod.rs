/// LLM Client: the single point of entry for all Claude API calls in Anchor.
///
/// No other module may call the Anthropic API directly.
///
/// Model: claude-sonnet-4-20250514 (matches the guides already generated)
use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-20250514";
const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f32 = 0.7;
/// Total attempts per completion, including the first.
const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: Box<LlmError> },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'static str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [UserTurn<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> CompletionBody<'a> {
    fn new(prompt: &'a str, system: &'a str) -> Self {
        Self {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system,
            messages: [UserTurn {
                role: "user",
                content: prompt,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct Completion {
    content: Vec<Block>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct Block {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl Completion {
    /// Trimmed text of the first non-empty text block.
    fn into_text(self) -> Option<String> {
        self.content
            .into_iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text)
            .map(|t| t.trim().to_string())
            .find(|t| !t.is_empty())
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

/// Outcome of a single request to the Messages API.
enum Attempt {
    Done(Completion),
    Retry(LlmError),
    Fail(LlmError),
}

/// Wraps the Anthropic Messages API with bounded retry.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to build HTTP client for the LLM")?;
        Ok(Self { client, api_key })
    }

    /// Sends one user turn and returns the reply text.
    /// Rate limits, 5xx responses and transport errors are retried with exponential backoff.
    pub async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let body = CompletionBody::new(prompt, system);
        let mut attempt = 1;

        loop {
            let last = match self.attempt(&body).await {
                Attempt::Done(completion) => {
                    if let Some(usage) = &completion.usage {
                        debug!(
                            input_tokens = usage.input_tokens,
                            output_tokens = usage.output_tokens,
                            "LLM completion received"
                        );
                    }
                    return completion.into_text().ok_or(LlmError::EmptyContent);
                }
                Attempt::Fail(e) => return Err(e),
                Attempt::Retry(e) => e,
            };

            if attempt >= MAX_ATTEMPTS {
                return Err(LlmError::Exhausted {
                    attempts: attempt,
                    last: Box::new(last),
                });
            }
            let delay = backoff(attempt);
            warn!(attempt, delay_ms = delay.as_millis() as u64, error = %last, "LLM call failed, retrying");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, body: &CompletionBody<'_>) -> Attempt {
        let response = match self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return Attempt::Retry(LlmError::Http(e)),
        };

        let status = response.status();
        if status.is_success() {
            return match response.json::<Completion>().await {
                Ok(completion) => Attempt::Done(completion),
                Err(e) => Attempt::Fail(LlmError::Http(e)),
            };
        }

        let raw = response.text().await.unwrap_or_default();
        let error = LlmError::Api {
            status: status.as_u16(),
            message: error_message(raw),
        };
        if is_retryable(status) {
            Attempt::Retry(error)
        } else {
            Attempt::Fail(error)
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// 1s after the first failure, 2s after the second.
fn backoff(failed_attempts: u32) -> Duration {
    Duration::from_secs(1 << (failed_attempts - 1).min(4))
}

/// `error.message` from an Anthropic error body, or the raw body when it is not JSON.
fn error_message(raw: String) -> String {
    serde_json::from_str::<ErrorEnvelope>(&raw)
        .map(|e| e.error.message)
        .unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_text_skips_non_text_blocks() {
        let completion: Completion = serde_json::from_value(serde_json::json!({
            "content": [
                {"type": "tool_use"},
                {"type": "text", "text": "  "},
                {"type": "text", "text": "## Before your hearing\n"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 20}
        }))
        .unwrap();
        assert_eq!(completion.into_text().as_deref(), Some("## Before your hearing"));
    }

    #[test]
    fn test_error_message_extraction() {
        let raw = r#"{"type":"error","error":{"type":"invalid_request_error","message":"bad key"}}"#;
        assert_eq!(error_message(raw.to_string()), "bad key");
        assert_eq!(error_message("upstream down".to_string()), "upstream down");
    }

    #[test]
    fn test_retry_policy() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
        assert_eq!(backoff(1), Duration::from_secs(1));
        assert_eq!(backoff(2), Duration::from_secs(2));
    }

    #[test]
    fn test_body_carries_sampling_settings() {
        let json = serde_json::to_value(CompletionBody::new("hi", "sys")).unwrap();
        assert_eq!(json["model"], "claude-sonnet-4-20250514");
        assert_eq!(json["max_tokens"], 2048);
        assert_eq!(json["system"], "sys");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
    }
}
