use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::notifier::ResetNotifier;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::preparation::generator::GuideGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Present only when `ANTHROPIC_API_KEY` is set; the direct guide function needs it.
    pub llm: Option<LlmClient>,
    /// Pluggable guide backend. Default: RemoteGuideGenerator. Swap via PREPARE_BACKEND.
    pub guides: Arc<dyn GuideGenerator>,
    /// Delivers password reset links. Default: LogResetNotifier.
    pub reset_notifier: Arc<dyn ResetNotifier>,
    pub config: Config,
}
