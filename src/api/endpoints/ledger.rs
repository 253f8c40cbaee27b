//! Ledger endpoints.
//!
//! - `GET /api/ledger`: the ledger file, unmodified, as an attachment
//! - `GET /api/ledger/reviews`: parsed rows for inspection

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::ledger::ReviewLedger;
use crate::models::ReviewRecord;

fn open_ledger(ctx: &ApiContext) -> Result<ReviewLedger, ApiError> {
    Ok(ctx.core.with_session(|session| Ok(session.ledger().clone()))?)
}

pub async fn download(State(ctx): State<ApiContext>) -> Result<Response, ApiError> {
    let ledger = open_ledger(&ctx)?;
    let bytes = ledger
        .contents()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let file_name = ledger
        .path()
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| "reviews.csv".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub async fn reviews(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<ReviewRecord>>, ApiError> {
    let ledger = open_ledger(&ctx)?;
    let records = ledger
        .reviews()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(records))
}
