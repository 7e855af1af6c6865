use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::profile::sink::ProfileSink;
use crate::quiz::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    /// Question source. `LlmClient` in production.
    pub llm: Arc<dyn TextGenerator>,
    /// Profile store. `PgProfileSink` in production.
    pub profiles: Arc<dyn ProfileSink>,
    pub config: Config,
}
