//! `GET /api/files`: case files available for review.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::ledger::ReviewLedger;

#[derive(Serialize)]
pub struct CaseFileEntry {
    pub name: String,
    /// A ledger already exists for this file.
    pub has_reviews: bool,
}

#[derive(Serialize)]
pub struct CaseFilesResponse {
    pub files: Vec<CaseFileEntry>,
}

pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<CaseFilesResponse>, ApiError> {
    let reviews_dir = &ctx.core.config.reviews_dir;
    let files = ctx
        .core
        .case_files()
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            let has_reviews = ReviewLedger::for_case_file(&path, reviews_dir).exists();
            Some(CaseFileEntry { name, has_reviews })
        })
        .collect();

    Ok(Json(CaseFilesResponse { files }))
}
