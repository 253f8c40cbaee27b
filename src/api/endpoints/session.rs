//! `POST /api/session`: open a case file for review.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::session::SessionSummary;

#[derive(Deserialize)]
pub struct OpenSessionRequest {
    pub file: String,
}

pub async fn open(
    State(ctx): State<ApiContext>,
    Json(request): Json<OpenSessionRequest>,
) -> Result<Json<SessionSummary>, ApiError> {
    if request.file.trim().is_empty() {
        return Err(ApiError::BadRequest("File name is required".into()));
    }

    ctx.core.open_case_file(&request.file)?;
    let summary = ctx.core.with_session(|session| Ok(session.summary()))?;
    Ok(Json(summary))
}
