use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::profile::validation::{validate_profile, ProfileRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateProfileResponse {
    pub ok: bool,
    pub id: String,
}

/// POST /profile
pub async fn handle_create_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<CreateProfileResponse>, AppError> {
    let profile =
        validate_profile(&req).map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let id = state.profiles.store_profile(&profile).await?;

    Ok(Json(CreateProfileResponse { ok: true, id }))
}
