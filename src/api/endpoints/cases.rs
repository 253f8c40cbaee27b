//! Case picker endpoints.
//!
//! - `GET /api/cases`: display names, current selection, progress
//! - `POST /api/cases/select`: select a case by display name
//! - `GET /api/cases/current`: parsed view of the selected case

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::session::{CaseView, SessionSummary};

pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<SessionSummary>, ApiError> {
    let summary = ctx.core.with_session(|session| Ok(session.summary()))?;
    Ok(Json(summary))
}

#[derive(Deserialize)]
pub struct SelectCaseRequest {
    pub display_name: String,
}

pub async fn select(
    State(ctx): State<ApiContext>,
    Json(request): Json<SelectCaseRequest>,
) -> Result<Json<CaseView>, ApiError> {
    let view = ctx.core.with_session_mut(|session| {
        session.select(&request.display_name)?;
        session.case_view()
    })?;
    Ok(Json(view))
}

pub async fn current(
    State(ctx): State<ApiContext>,
) -> Result<Json<CaseView>, ApiError> {
    let view = ctx.core.with_session(|session| session.case_view())?;
    Ok(Json(view))
}
