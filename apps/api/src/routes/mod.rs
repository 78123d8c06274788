pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::advice::handlers as advice_handlers;
use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_login))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_logout),
        )
        .route(
            "/api/v1/sessions/:id/profile",
            post(handlers::handle_submit_profile),
        )
        .route(
            "/api/v1/sessions/:id/advice",
            get(handlers::handle_get_advice),
        )
        .route(
            "/api/v1/sessions/:id/checklist",
            put(handlers::handle_toggle_checklist),
        )
        .route(
            "/api/v1/sessions/:id/roadmap",
            put(handlers::handle_toggle_roadmap),
        )
        .route(
            "/api/v1/sessions/:id/roadmap.dot",
            get(handlers::handle_roadmap_dot),
        )
        // Stateless decoding
        .route("/api/v1/advice/decode", post(advice_handlers::handle_decode))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::advice::decoder::SAMPLE_REPLY;
    use crate::advice::sections::MarkerSet;
    use crate::completion::{CompletionStateStore, InMemoryDocumentStore};
    use crate::llm_client::{LlmError, TextGenerator};
    use crate::session::SessionRegistry;

    struct CannedReply;

    #[async_trait]
    impl TextGenerator for CannedReply {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Ok(SAMPLE_REPLY.to_string())
        }
    }

    fn app() -> Router {
        build_router(AppState {
            llm: Arc::new(CannedReply),
            completion: CompletionStateStore::new(Arc::new(InMemoryDocumentStore::default())),
            sessions: Arc::new(SessionRegistry::default()),
            markers: Arc::new(MarkerSet::default()),
        })
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn profile_json() -> Value {
        json!({
            "age": 27,
            "location": "Berlin",
            "education": "BSc Computer Science",
            "experience_years": 3,
            "skills": [{"name": "Python", "proficiency": "intermediate"}],
            "interests": "distributed systems",
            "target_role": "Backend Engineer"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["completion_store"], "memory");
    }

    #[tokio::test]
    async fn test_full_session_flow() {
        let app = app();
        let (status, login) = send(
            &app,
            Method::POST,
            "/api/v1/sessions",
            Some(json!({"username": "ada", "email": "ada@example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = login["session_id"].as_str().unwrap().to_string();

        let (status, _) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}/advice"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, view) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/profile"),
            Some(profile_json()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["roadmap_steps"].as_array().unwrap().len(), 3);
        assert_eq!(view["graph"]["edges"].as_array().unwrap().len(), 2);
        assert_eq!(view["checklist"]["mode"], "checklist");

        let (status, view) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/checklist"),
            Some(json!({"label": "Solve 50 SQL problems", "completed": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["checklist"]["items"][0]["completed"], true);

        let (status, view) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/roadmap"),
            Some(json!({"title": "Build a service", "completed": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["roadmap_steps"][2]["completed"], true);
        assert_eq!(view["roadmap_steps"][0]["completed"], false);
        assert_eq!(view["graph"]["nodes"][2]["completed"], true);

        let (status, view) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}/advice"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["checklist"]["items"][0]["completed"], true);
        assert_eq!(view["roadmap_steps"][2]["completed"], true);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_login_with_blank_fields_is_rejected() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/sessions",
            Some(json!({"username": " ", "email": "ada@example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_checklist_label_is_not_found() {
        let app = app();
        let (_, login) = send(
            &app,
            Method::POST,
            "/api/v1/sessions",
            Some(json!({"username": "ada", "email": "ada@example.com"})),
        )
        .await;
        let id = login["session_id"].as_str().unwrap().to_string();
        send(&app, Method::POST, &format!("/api/v1/sessions/{id}/profile"), Some(profile_json())).await;

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/checklist"),
            Some(json!({"label": "Learn COBOL", "completed": true})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_unknown_roadmap_step_is_not_found() {
        let app = app();
        let (_, login) = send(
            &app,
            Method::POST,
            "/api/v1/sessions",
            Some(json!({"username": "ada", "email": "ada@example.com"})),
        )
        .await;
        let id = login["session_id"].as_str().unwrap().to_string();
        send(&app, Method::POST, &format!("/api/v1/sessions/{id}/profile"), Some(profile_json())).await;

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/roadmap"),
            Some(json!({"title": "Learn COBOL", "completed": true})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_stateless_decode_of_string_roadmap() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/advice/decode",
            Some(json!({"raw_text": "===Roadmap===\n[\"Learn Python\", \"Build projects\"]"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["roadmap"]["status"], "parsed");
        assert_eq!(body["roadmap"]["steps"][0]["title"], "Learn Python");
        assert_eq!(body["roadmap"]["steps"][1]["description"], "?");
    }

    #[tokio::test]
    async fn test_stateless_decode() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/advice/decode",
            Some(json!({"raw_text": "===Roadmap===\nno json here"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["roadmap"]["status"], "fallback");
        assert_eq!(body["roadmap"]["raw"], "no json here");
        assert_eq!(body["sections"]["career"], "");
    }
}
