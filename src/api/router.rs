//! Review API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. Every response carries
//! `Cache-Control: no-store`; each request is logged by the access logger.

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the review API router.
pub fn review_api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/files", get(endpoints::files::list))
        .route("/session", post(endpoints::session::open))
        .route("/cases", get(endpoints::cases::list))
        .route("/cases/select", post(endpoints::cases::select))
        .route("/cases/current", get(endpoints::cases::current))
        .route("/reviews", post(endpoints::reviews::submit))
        .route("/ledger", get(endpoints::ledger::download))
        .route("/ledger/reviews", get(endpoints::ledger::reviews))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new().nest("/api", api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::config::ReviewConfig;

    /// CoreState over a temp simulations dir holding `Medbot.json`.
    /// The tempdir guard must be kept alive for the duration of the test.
    fn test_core_state() -> (Arc<CoreState>, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let sims = tmp.path().join("simulations");
        std::fs::create_dir_all(&sims).unwrap();
        let cases = json!({
            "fever_1": {
                "conversation_history": [
                    {"role": "user", "content": "{'age': 34, 'sex': 'F'} is experiencing given symptoms fever, cough"},
                    {"role": "system", "content": "you should ask about fever."},
                    {"role": "assistant", "content": "Do you have a fever?"},
                    {"role": "user", "content": "fever: yes, for two days"},
                    {"role": "system", "content": "you should ask about rash."},
                    {"role": "user", "content": "no rash"}
                ],
                "chatbot_predictions": {"Flu": 0.6, "Cold": 0.3}
            },
            "cough_2": {
                "conversation_history": [],
                "chatbot_predictions": {}
            }
        });
        std::fs::write(sims.join("Medbot.json"), cases.to_string()).unwrap();

        let core = CoreState::new(ReviewConfig {
            simulations_dir: sims,
            reviews_dir: tmp.path().join("reviews"),
            ..ReviewConfig::default()
        });
        (Arc::new(core), tmp)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn open_medbot(app: &Router) {
        let response = app
            .clone()
            .oneshot(post_json("/api/session", json!({"file": "Medbot.json"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_without_session() {
        let (core, _tmp) = test_core_state();
        let app = review_api_router(core);

        let response = app.oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");

        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["session_open"], false);
    }

    #[tokio::test]
    async fn files_lists_case_files() {
        let (core, _tmp) = test_core_state();
        let app = review_api_router(core);

        let response = app.oneshot(get_request("/api/files")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["files"][0]["name"], "Medbot.json");
        assert_eq!(json["files"][0]["has_reviews"], false);
    }

    #[tokio::test]
    async fn cases_require_open_session() {
        let (core, _tmp) = test_core_state();
        let app = review_api_router(core);

        let response = app.oneshot(get_request("/api/cases")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "NO_SESSION");
    }

    #[tokio::test]
    async fn open_unknown_file_is_404() {
        let (core, _tmp) = test_core_state();
        let app = review_api_router(core);

        let response = app
            .oneshot(post_json("/api/session", json!({"file": "Missing.json"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn open_session_lists_display_names() {
        let (core, _tmp) = test_core_state();
        let app = review_api_router(core);
        open_medbot(&app).await;

        let response = app.oneshot(get_request("/api/cases")).await.unwrap();
        let json = json_body(response).await;
        assert_eq!(json["display_names"], json!(["fever", "cough"]));
        assert_eq!(json["current_display"], "fever");
        assert_eq!(json["progress"]["reviewed"], 0);
        assert_eq!(json["progress"]["total"], 2);
    }

    #[tokio::test]
    async fn current_case_view_has_parsed_transcript() {
        let (core, _tmp) = test_core_state();
        let app = review_api_router(core);
        open_medbot(&app).await;

        let response = app.oneshot(get_request("/api/cases/current")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["case_id"], "fever_1");
        assert_eq!(json["profile"]["age"], 34);
        assert_eq!(json["initial_symptoms"], json!(["fever", "cough"]));
        assert_eq!(json["asked_symptoms"][0]["symptom"], "fever");
        assert_eq!(json["asked_symptoms"][0]["status"], "present");
        assert_eq!(json["asked_symptoms"][1]["status"], "absent");
        assert_eq!(json["top_predictions"][0]["disease"], "Flu");
    }

    #[tokio::test]
    async fn select_by_display_name() {
        let (core, _tmp) = test_core_state();
        let app = review_api_router(core);
        open_medbot(&app).await;

        let response = app
            .clone()
            .oneshot(post_json("/api/cases/select", json!({"display_name": "cough"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["case_id"], "cough_2");
        assert_eq!(json["top_predictions"], json!([]));
        assert_eq!(json["has_predictions"], false);

        let response = app
            .oneshot(post_json("/api/cases/select", json!({"display_name": "rash"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn incomplete_review_rejected_and_not_written() {
        let (core, _tmp) = test_core_state();
        let app = review_api_router(core);
        open_medbot(&app).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/reviews",
                json!({"relevance": "Yes", "correctness": "Yes", "relevant_symptoms": ["fever"], "comment": "  "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "REVIEW_INCOMPLETE");

        let response = app.oneshot(get_request("/api/ledger")).await.unwrap();
        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn submit_review_appends_and_advances() {
        let (core, _tmp) = test_core_state();
        let app = review_api_router(core);
        open_medbot(&app).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/reviews",
                json!({
                    "relevance": "Partially",
                    "correctness": "Yes",
                    "relevant_symptoms": ["fever"],
                    "comment": "good"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["next_display"], "cough");
        assert_eq!(json["all_reviewed"], false);
        assert_eq!(json["record"]["irrelevant_symptoms"], json!(["rash"]));

        let response = app.clone().oneshot(get_request("/api/ledger")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Disposition").unwrap(),
            "attachment; filename=\"doctor_reviews_Medbot.csv\""
        );
        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"fever_1,Partially,Yes,fever,rash,good\n");

        let response = app.clone().oneshot(get_request("/api/cases")).await.unwrap();
        let json = json_body(response).await;
        assert_eq!(json["display_names"], json!(["\u{2705} fever", "cough"]));
        assert_eq!(json["progress"]["reviewed"], 1);

        let response = app.oneshot(get_request("/api/ledger/reviews")).await.unwrap();
        let json = json_body(response).await;
        assert_eq!(json[0]["case_id"], "fever_1");
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let (core, _tmp) = test_core_state();
        let app = review_api_router(core);

        let response = app.oneshot(get_request("/api/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
