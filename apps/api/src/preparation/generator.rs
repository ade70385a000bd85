//! Guide generation: pluggable, trait-based backends that write a preparation guide.
//!
//! Default: `RemoteGuideGenerator` (the hosted `/prepare` service).
//! Alternative: `LlmGuideGenerator` (Claude via `LlmClient`).
//!
//! `AppState` holds an `Arc<dyn GuideGenerator>`, chosen at startup by `PREPARE_BACKEND`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError, MODEL};
use crate::models::preparation::GeneratedGuide;
use crate::models::profile::Role;
use crate::preparation::context::GuideRequest;
use crate::preparation::prompts::{guide_prompt, hearing_type, person_for, GUIDE_SYSTEM};

#[derive(Debug, Error)]
pub enum GuideError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("prepare service returned status {0}")]
    Status(u16),

    #[error("prepare service returned no guide")]
    EmptyResponse,

    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl From<GuideError> for AppError {
    fn from(e: GuideError) -> Self {
        AppError::GuideUnavailable(e.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap guide backends without touching the handlers.
#[async_trait]
pub trait GuideGenerator: Send + Sync {
    async fn generate(&self, request: &GuideRequest) -> Result<GeneratedGuide, GuideError>;

    /// Short name for logs.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// RemoteGuideGenerator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PrepareBody {
    prompt: String,
    role: Role,
    context: String,
}

#[derive(Debug, Deserialize)]
struct PrepareReply {
    response: Option<String>,
}

/// Posts `{prompt, role, context}` to `<base>/prepare` and reads `{response}`.
pub struct RemoteGuideGenerator {
    client: Client,
    endpoint: String,
}

impl RemoteGuideGenerator {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(90))
            .build()?;
        Ok(Self {
            client,
            endpoint: prepare_endpoint(base_url),
        })
    }
}

fn prepare_endpoint(base_url: &str) -> String {
    format!("{}/prepare", base_url.trim_end_matches('/'))
}

fn body_for(request: &GuideRequest) -> PrepareBody {
    PrepareBody {
        prompt: request.prompt(),
        role: request.role,
        context: request.context(),
    }
}

#[async_trait]
impl GuideGenerator for RemoteGuideGenerator {
    async fn generate(&self, request: &GuideRequest) -> Result<GeneratedGuide, GuideError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body_for(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, endpoint = %self.endpoint, "Prepare service rejected request");
            return Err(GuideError::Status(status.as_u16()));
        }

        let reply: PrepareReply = response.json().await?;
        let content = reply
            .response
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .ok_or(GuideError::EmptyResponse)?;

        debug!(chars = content.len(), "Guide received from prepare service");
        Ok(GeneratedGuide {
            content,
            model: None,
        })
    }

    fn backend(&self) -> &'static str {
        "remote"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmGuideGenerator
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmGuideGenerator {
    llm: LlmClient,
}

impl LlmGuideGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

pub fn llm_prompt(request: &GuideRequest) -> String {
    guide_prompt(
        person_for(request.role),
        &hearing_type(request.prep_type, request.meeting_role),
        request.current_stage.as_deref(),
        &request.concerns,
    )
}

#[async_trait]
impl GuideGenerator for LlmGuideGenerator {
    async fn generate(&self, request: &GuideRequest) -> Result<GeneratedGuide, GuideError> {
        let content = self.llm.complete(&llm_prompt(request), GUIDE_SYSTEM).await?;
        Ok(GeneratedGuide {
            content,
            model: Some(MODEL.to_string()),
        })
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::preparation::{MeetingRole, PrepType};
    use std::sync::Mutex;

    /// Returns a canned guide (or a failure) and records every request.
    pub(crate) struct StubGenerator {
        pub fail: bool,
        pub seen: Mutex<Vec<GuideRequest>>,
    }

    impl StubGenerator {
        pub(crate) fn new(fail: bool) -> Self {
            Self {
                fail,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GuideGenerator for StubGenerator {
        async fn generate(&self, request: &GuideRequest) -> Result<GeneratedGuide, GuideError> {
            self.seen.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(GuideError::Status(503));
            }
            Ok(GeneratedGuide {
                content: "## What to bring".to_string(),
                model: None,
            })
        }

        fn backend(&self) -> &'static str {
            "stub"
        }
    }

    fn meeting_request() -> GuideRequest {
        GuideRequest {
            prep_type: PrepType::Meeting,
            meeting_role: Some(MeetingRole::Attorney),
            concerns: "I want to ask about visits.".to_string(),
            role: Role::Parent,
            current_stage: Some("Review Hearings".to_string()),
        }
    }

    #[test]
    fn test_prepare_endpoint_joins_cleanly() {
        assert_eq!(
            prepare_endpoint("https://anchor-ap1c.onrender.com/"),
            "https://anchor-ap1c.onrender.com/prepare"
        );
        assert_eq!(prepare_endpoint("http://localhost:9000"), "http://localhost:9000/prepare");
    }

    #[test]
    fn test_remote_body_shape() {
        let req = meeting_request();
        let json = serde_json::to_value(body_for(&req)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "prompt": "I want to ask about visits. I am preparing for a meeting with my Attorney / Lawyer.",
                "role": "parent",
                "context": "preparing for a meeting with Attorney / Lawyer in California dependency court"
            })
        );
    }

    #[test]
    fn test_llm_prompt_mentions_stage_and_person() {
        let prompt = llm_prompt(&meeting_request());
        assert!(prompt.starts_with("A parent in California dependency court is preparing for a meeting with their Attorney / Lawyer."));
        assert!(prompt.contains("\"Review Hearings\" stage"));
    }

    #[test]
    fn test_guide_error_maps_to_bad_gateway() {
        use axum::response::IntoResponse;
        let resp = AppError::from(GuideError::EmptyResponse).into_response();
        assert_eq!(resp.status(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_stub_records_requests() {
        let stub = StubGenerator::new(false);
        let guide = stub.generate(&meeting_request()).await.unwrap();
        assert_eq!(guide.content, "## What to bring");
        assert_eq!(stub.seen.lock().unwrap().len(), 1);
        assert!(StubGenerator::new(true).generate(&meeting_request()).await.is_err());
    }
}
