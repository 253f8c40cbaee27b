//! `POST /api/reviews`: submit a review of the selected case.
//!
//! An incomplete review is answered with 400 and the reviewer-facing
//! message; nothing is written to the ledger.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::ReviewSubmission;
use crate::session::SubmitOutcome;

pub async fn submit(
    State(ctx): State<ApiContext>,
    Json(submission): Json<ReviewSubmission>,
) -> Result<Json<SubmitOutcome>, ApiError> {
    let outcome = ctx.core.with_session_mut(|session| session.submit(&submission))?;
    Ok(Json(outcome))
}
