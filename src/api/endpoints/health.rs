//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub session_open: bool,
    pub version: &'static str,
}

/// `GET /api/health`: connection check for the renderer.
pub async fn check(
    State(ctx): State<ApiContext>,
) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok",
        session_open: ctx.core.has_session(),
        version: crate::config::APP_VERSION,
    }))
}
