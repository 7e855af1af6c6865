//! Axum route handlers for the quiz flow: start → question/answer × 12 → result.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::quiz::ranking::RankedResult;
use crate::quiz::session::{reset_and_generate, CurrentQuestion, StartOutcome};
use crate::quiz::store::SharedSession;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartQuery {
    /// Restart this session instead of creating a new one.
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub outcome: StartOutcome,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub session_id: Uuid,
    pub riasec: String,
    pub option: i64,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

async fn find_session(state: &AppState, session_id: Uuid) -> Result<SharedSession, AppError> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Quiz session {session_id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /start
///
/// Resets (or creates) a session and generates its twelve questions.
/// Generation failures come back as `ready: false` with an error reason, not as an HTTP error.
pub async fn handle_start(
    State(state): State<AppState>,
    Query(params): Query<StartQuery>,
) -> Result<Json<StartResponse>, AppError> {
    let (session_id, session) = match params.session_id {
        Some(id) => (id, find_session(&state, id).await?),
        None => state.sessions.create().await,
    };

    let outcome = reset_and_generate(
        &session,
        state.llm.as_ref(),
        state.config.generation_timeout,
    )
    .await;
    info!(%session_id, ready = outcome.ready, "Quiz start finished");

    Ok(Json(StartResponse {
        session_id,
        outcome,
    }))
}

/// GET /question
pub async fn handle_question(
    State(state): State<AppState>,
    Query(params): Query<SessionQuery>,
) -> Result<Json<CurrentQuestion>, AppError> {
    let session = find_session(&state, params.session_id).await?;
    let current = session.lock().await.current_question();
    Ok(Json(current))
}

/// POST /answer
pub async fn handle_answer(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<OkResponse>, AppError> {
    let session = find_session(&state, req.session_id).await?;
    session.lock().await.submit_answer(&req.riasec, req.option)?;
    Ok(Json(OkResponse { ok: true }))
}

/// GET /result
///
/// Ranks whatever has been scored so far; callable before the quiz is finished.
pub async fn handle_result(
    State(state): State<AppState>,
    Query(params): Query<SessionQuery>,
) -> Result<Json<RankedResult>, AppError> {
    let session = find_session(&state, params.session_id).await?;
    let result = session.lock().await.rank();
    Ok(Json(result))
}
