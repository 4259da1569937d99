//! Router assembly: HTTP endpoints, WebSocket upgrade, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - REST-ish API under `/api/v1/...`
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/exams/:exam_id/start", post(http::http_start_exam))
        .route("/api/v1/exams/:exam_id/submit", post(http::http_submit_exam))
        .route("/api/v1/exams/:exam_id/bias", get(http::http_exam_bias))
        .route("/api/v1/concepts/assign", post(http::http_assign_concepts))
        .route("/api/v1/levels/:level", get(http::http_level_concepts))
        .route("/api/v1/coverage", get(http::http_coverage))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt; // for `oneshot`

    fn app() -> Router {
        build_router(Arc::new(AppState::from_config(None).expect("state")))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Should read body");
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(app(), "GET", "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn start_then_submit_over_http() {
        let app = app();
        let (status, started) = send(app.clone(), "POST", "/api/v1/exams/exam-l1/start", None).await;
        assert_eq!(status, StatusCode::OK);
        let attempt_id = started["attemptId"].as_str().expect("attempt id").to_string();
        assert_eq!(started["questions"].as_array().map(Vec::len), Some(4));

        let answers: Vec<Value> = started["questions"]
            .as_array()
            .expect("questions")
            .iter()
            .map(|q| json!({ "questionId": q["id"], "selectedOptionId": "A" }))
            .collect();
        let (status, result) = send(
            app.clone(),
            "POST",
            "/api/v1/exams/exam-l1/submit",
            Some(json!({ "attemptId": attempt_id, "answers": answers })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["total_questions"], 4);
        let correct = result["correct_count"].as_u64().expect("count");
        let marked = result["feedback"]
            .as_array()
            .expect("feedback")
            .iter()
            .filter(|f| f["correct_label"] == "A")
            .count() as u64;
        assert_eq!(correct, marked);

        // the attempt is consumed
        let (status, err) = send(
            app,
            "POST",
            "/api/v1/exams/exam-l1/submit",
            Some(json!({ "attemptId": attempt_id, "answers": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn bias_report_for_seed_exam() {
        let (status, body) = send(app(), "GET", "/api/v1/exams/exam-l1/bias", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_balanced"], false);
        assert_eq!(body["max_share_label"], "B");
    }

    #[tokio::test]
    async fn assign_with_and_without_body() {
        let app = app();
        let (status, _) = send(app.clone(), "GET", "/api/v1/coverage", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(app.clone(), "POST", "/api/v1/concepts/assign", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["coverage"]["coverage_percentage"], 100.0);

        let (status, level) = send(app.clone(), "GET", "/api/v1/levels/3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(level["concept_ids"].as_array().expect("ids").iter().any(|id| id == "gov-roles"));

        let pool = json!({ "concepts": [
            { "id": "n1", "domain": "law", "difficulty": "beginner" },
            { "id": "n1", "domain": "law", "difficulty": "expert" },
        ]});
        let (status, err) = send(app.clone(), "POST", "/api/v1/concepts/assign", Some(pool)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"]["code"], "INVALID_CONCEPTS");

        let (status, coverage) = send(app, "GET", "/api/v1/coverage", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(coverage["unassigned_items"].as_array().expect("list").is_empty());
    }

    async fn send_raw(app: Router, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        let response = app.oneshot(builder.body(Body::from(body.to_string())).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Should read body");
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn malformed_pool_is_rejected_not_replaced() {
        let app = app();
        // concept without a difficulty
        let (status, err) = send(
            app.clone(),
            "POST",
            "/api/v1/concepts/assign",
            Some(json!({ "concepts": [{ "id": "only-one", "domain": "law" }] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"]["code"], "BAD_REQUEST");

        let (status, _) = send_raw(app.clone(), "/api/v1/concepts/assign", Some("application/json"), "{\"concepts\": [").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // nothing was computed by the rejected requests
        let (status, _) = send(app, "GET", "/api/v1/coverage", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn pool_without_content_type_is_still_used() {
        let body = json!({ "concepts": [{ "id": "solo", "domain": "law", "difficulty": "expert" }] });
        let (status, out) = send_raw(app(), "/api/v1/concepts/assign", None, &body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out["coverage"]["total_items"], 1);
    }

    #[tokio::test]
    async fn unknown_exam_is_404() {
        let (status, body) = send(app(), "POST", "/api/v1/exams/missing/start", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"]["message"].as_str().expect("message").contains("missing"));
    }
}
