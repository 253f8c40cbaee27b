//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::session::SessionError;

/// Structured error response body for the review renderer.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No case file is open")]
    NoActiveSession,
    #[error("Review incomplete: {0}")]
    IncompleteReview(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NoActiveSession => (
                StatusCode::CONFLICT,
                "NO_SESSION",
                "Open a case file first".to_string(),
            ),
            ApiError::IncompleteReview(detail) => (
                StatusCode::BAD_REQUEST,
                "REVIEW_INCOMPLETE",
                detail.clone(),
            ),
            ApiError::NotFound(detail) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                detail.clone(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                detail.clone(),
            ),
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NoActiveSession => ApiError::NoActiveSession,
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::UnknownCaseFile(name) => {
                ApiError::NotFound(format!("Case file not found: {name}"))
            }
            CoreError::Session(e) => e.into(),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Incomplete(e) => ApiError::IncompleteReview(e.to_string()),
            SessionError::UnknownCase(_) | SessionError::UnknownDisplayName(_) => {
                ApiError::NotFound(err.to_string())
            }
            SessionError::NoCaseSelected => ApiError::BadRequest(err.to_string()),
            SessionError::Case(e) => ApiError::Internal(e.to_string()),
            SessionError::Ledger(e) => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    use crate::validation::ValidationError;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn no_session_returns_409() {
        let response = ApiError::NoActiveSession.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NO_SESSION");
    }

    #[tokio::test]
    async fn incomplete_review_carries_reviewer_message() {
        let api_err: ApiError = SessionError::Incomplete(ValidationError::MissingComment).into();
        let response = api_err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "REVIEW_INCOMPLETE");
        assert_eq!(
            json["error"]["message"],
            "Please add a comment before saving the review."
        );
    }

    #[tokio::test]
    async fn unknown_label_returns_404() {
        let api_err: ApiError = SessionError::UnknownDisplayName("case".into()).into();
        assert_eq!(api_err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn internal_returns_500() {
        let response = ApiError::Internal("disk full".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        // Internal errors hide details from client
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn core_error_maps_through_session() {
        let api_err: ApiError = CoreError::NoActiveSession.into();
        assert_eq!(api_err.into_response().status(), StatusCode::CONFLICT);

        let api_err: ApiError = CoreError::UnknownCaseFile("x.json".into()).into();
        assert_eq!(api_err.into_response().status(), StatusCode::NOT_FOUND);

        let api_err: ApiError = CoreError::Session(SessionError::NoCaseSelected).into();
        assert_eq!(api_err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
