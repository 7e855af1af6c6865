pub mod health;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::profile::handlers as profile;
use crate::quiz::handlers as quiz;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/profile", post(profile::handle_create_profile))
        .route("/start", get(quiz::handle_start))
        .route("/question", get(quiz::handle_question))
        .route("/answer", post(quiz::handle_answer))
        .route("/result", get(quiz::handle_result))
        .with_state(state)
}

/// Permissive when no origins are configured, otherwise limited to the given list.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::quiz::category::ASSIGNMENT;
    use crate::test_support::{
        questions_json, test_state, FailingGenerator, FailingSink, FixedGenerator, MemorySink,
    };

    fn app() -> Router {
        build_router(test_state(
            Arc::new(FixedGenerator::new(questions_json(12))),
            Arc::new(MemorySink::default()),
        ))
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_req(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn start(app: &Router) -> String {
        let (status, body) = send(app, get_req("/start")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ready"], true);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_full_quiz_flow() {
        let app = app();
        let id = start(&app).await;

        for (i, category) in ASSIGNMENT.iter().enumerate() {
            let (status, q) = send(&app, get_req(&format!("/question?session_id={id}"))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(q["step"], i + 1);
            assert_eq!(q["total"], 12);
            assert_eq!(q["riasec"], category.symbol().to_string());

            // Strongest option for R/I/A, weakest for the rest.
            let option = if i % 6 < 3 { 0 } else { 3 };
            let (status, body) = send(
                &app,
                post_req(
                    "/answer",
                    json!({"session_id": id, "riasec": q["riasec"], "option": option}),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"ok": true}));
        }

        let (_, q) = send(&app, get_req(&format!("/question?session_id={id}"))).await;
        assert_eq!(q, json!({"done": true}));

        let (status, result) = send(&app, get_req(&format!("/result?session_id={id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["code"], "RIA");
        assert_eq!(
            result["scores"],
            json!({"R": 6, "I": 6, "A": 6, "S": 0, "E": 0, "C": 0})
        );
    }

    #[tokio::test]
    async fn test_start_failure_reports_reason_and_stays_loading() {
        let app = build_router(test_state(
            Arc::new(FailingGenerator),
            Arc::new(MemorySink::default()),
        ));
        let (status, body) = send(&app, get_req("/start")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ready"], false);
        assert_eq!(body["error"]["code"], "SERVICE_ERROR");

        let id = body["session_id"].as_str().unwrap();
        let (_, q) = send(&app, get_req(&format!("/question?session_id={id}"))).await;
        assert_eq!(q, json!({"loading": true}));
    }

    #[tokio::test]
    async fn test_start_with_short_response_is_not_ready() {
        let app = build_router(test_state(
            Arc::new(FixedGenerator::new(questions_json(5))),
            Arc::new(MemorySink::default()),
        ));
        let (_, body) = send(&app, get_req("/start")).await;
        assert_eq!(body["ready"], false);
        assert_eq!(body["error"]["code"], "WRONG_QUESTION_COUNT");
    }

    #[tokio::test]
    async fn test_invalid_answers_are_bad_requests_and_do_not_score() {
        let app = app();
        let id = start(&app).await;

        for body in [
            json!({"session_id": id, "riasec": "R", "option": 4}),
            json!({"session_id": id, "riasec": "R", "option": -1}),
            json!({"session_id": id, "riasec": "Z", "option": 0}),
        ] {
            let (status, err) = send(&app, post_req("/answer", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
        }

        let (_, q) = send(&app, get_req(&format!("/question?session_id={id}"))).await;
        assert_eq!(q["step"], 1);
        let (_, result) = send(&app, get_req(&format!("/result?session_id={id}"))).await;
        assert!(result["scores"]
            .as_object()
            .unwrap()
            .values()
            .all(|v| v == 0));
    }

    #[tokio::test]
    async fn test_answer_missing_fields_is_client_error() {
        let app = app();
        let id = start(&app).await;
        let (status, _) = send(
            &app,
            post_req("/answer", json!({"session_id": id, "riasec": "R"})),
        )
        .await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_answer_after_last_question_conflicts() {
        let app = app();
        let id = start(&app).await;
        for category in ASSIGNMENT {
            let body = json!({"session_id": id, "riasec": category.symbol().to_string(), "option": 1});
            let (status, _) = send(&app, post_req("/answer", body)).await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, err) = send(
            &app,
            post_req(
                "/answer",
                json!({"session_id": id, "riasec": "R", "option": 0}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(err["error"]["code"], "CONFLICT");

        let (_, result) = send(&app, get_req(&format!("/result?session_id={id}"))).await;
        assert_eq!(result["scores"]["R"], 4);
    }

    #[tokio::test]
    async fn test_restart_resets_existing_session() {
        let app = app();
        let id = start(&app).await;
        send(
            &app,
            post_req(
                "/answer",
                json!({"session_id": id, "riasec": "R", "option": 0}),
            ),
        )
        .await;

        let (_, body) = send(&app, get_req(&format!("/start?session_id={id}"))).await;
        assert_eq!(body["session_id"], id);
        assert_eq!(body["ready"], true);

        let (_, q) = send(&app, get_req(&format!("/question?session_id={id}"))).await;
        assert_eq!(q["step"], 1);
        let (_, result) = send(&app, get_req(&format!("/result?session_id={id}"))).await;
        assert_eq!(result["scores"]["R"], 0);
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_progress() {
        let app = app();
        let first = start(&app).await;
        let second = start(&app).await;
        send(
            &app,
            post_req(
                "/answer",
                json!({"session_id": first, "riasec": "R", "option": 0}),
            ),
        )
        .await;

        let (_, q) = send(&app, get_req(&format!("/question?session_id={second}"))).await;
        assert_eq!(q["step"], 1);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = app();
        let id = uuid::Uuid::new_v4();
        for uri in [
            format!("/question?session_id={id}"),
            format!("/result?session_id={id}"),
            format!("/start?session_id={id}"),
        ] {
            let (status, err) = send(&app, get_req(&uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(err["error"]["code"], "NOT_FOUND");
        }
    }

    #[tokio::test]
    async fn test_missing_session_id_is_bad_request() {
        let (status, _) = send(&app(), get_req("/question")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_result_before_finishing() {
        let app = app();
        let id = start(&app).await;
        send(
            &app,
            post_req(
                "/answer",
                json!({"session_id": id, "riasec": "S", "option": 1}),
            ),
        )
        .await;
        let (_, result) = send(&app, get_req(&format!("/result?session_id={id}"))).await;
        assert_eq!(result["code"], "SRI");
    }

    fn profile_body() -> Value {
        json!({
            "name": "Asha Verma",
            "age": 17,
            "currentStatus": "Class 12",
            "mobile": "9876543210",
            "email": "asha@example.com"
        })
    }

    #[tokio::test]
    async fn test_create_profile_stores_and_returns_id() {
        let sink = Arc::new(MemorySink::default());
        let app = build_router(test_state(
            Arc::new(FixedGenerator::new(questions_json(12))),
            sink.clone(),
        ));
        let (status, body) = send(&app, post_req("/profile", profile_body())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "id": "profile-1"}));

        let stored = sink.stored.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, "Class 12");
        assert_eq!(stored[0].phone, "9876543210");
    }

    #[tokio::test]
    async fn test_create_profile_rejects_bad_email() {
        let sink = Arc::new(MemorySink::default());
        let app = build_router(test_state(
            Arc::new(FixedGenerator::new(questions_json(12))),
            sink.clone(),
        ));
        let mut body = profile_body();
        body["email"] = json!("not-an-email");
        let (status, err) = send(&app, post_req("/profile", body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err["error"]["message"]
            .as_str()
            .unwrap()
            .contains("email"));
        assert!(sink.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_profile_store_failure_carries_cause() {
        let app = build_router(test_state(
            Arc::new(FixedGenerator::new(questions_json(12))),
            Arc::new(FailingSink),
        ));
        let (status, err) = send(&app, post_req("/profile", profile_body())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = err["error"]["message"].as_str().unwrap();
        assert!(message.starts_with("Profile creation failed:"), "{message}");
        assert!(message.contains("pool timed out"), "{message}");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_only() {
        let app = app().layer(cors_layer(&["https://quiz.example.com".to_string()]));

        let req = Request::builder()
            .uri("/health")
            .header("origin", "https://quiz.example.com")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "https://quiz.example.com"
        );

        let req = Request::builder()
            .uri("/health")
            .header("origin", "https://evil.example.com")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert!(resp.headers().get("access-control-allow-origin").is_none());
    }
}
