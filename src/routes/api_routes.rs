use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chat_widget_core::{ChatRequest, ChatResponse, InitializeRequest, InitializeResponse};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::service::chat_service::ChatService;

/// Full API surface. The widget is embedded on other origins, so CORS is open.
pub fn router(svc: ChatService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/initialize", post(initialize_handler))
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(svc)
}

/// GET `/health`
async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// POST `/api/initialize` — load a decoded flight log into a new session
pub async fn initialize_handler(
    State(svc): State<ChatService>,
    Json(request): Json<InitializeRequest>,
) -> Result<Json<InitializeResponse>, AppError> {
    svc.initialize(request).map(Json)
}

/// POST `/api/chat` — one question, one answer
pub async fn chat_handler(
    State(svc): State<ChatService>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    svc.chat(request).await.map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use chrono::TimeDelta;
    use tower::ServiceExt;

    use super::*;
    use crate::agent::testing::StubAgent;
    use crate::session::store::SessionStore;

    fn app(agent: StubAgent) -> Router {
        let svc = ChatService::new(
            SessionStore::new(4, TimeDelta::seconds(600)),
            Arc::new(agent),
            8000,
        );
        router(svc)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn initialize(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/initialize",
                json!({ "parsedMessages": { "GPS[0]": { "Alt": [100, 120, 90] } } }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Agent initialized successfully");
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let response = app(StubAgent::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn initialize_then_chat_round_trip() {
        let app = app(StubAgent::default());
        let session_id = initialize(&app).await;

        let response = app
            .oneshot(post_json(
                "/api/chat",
                json!({ "message": "Max GPS_0 altitude?", "sessionId": session_id }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "response": "answer to: Max GPS_0 altitude?" })
        );
    }

    #[tokio::test]
    async fn unknown_session_returns_error_body() {
        let response = app(StubAgent::default())
            .oneshot(post_json("/api/chat", json!({ "message": "hi", "sessionId": "stale" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Invalid or expired session ID" })
        );
    }

    #[tokio::test]
    async fn empty_upload_is_bad_request() {
        let response = app(StubAgent::default())
            .oneshot(post_json("/api/initialize", json!({ "parsedMessages": {} })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "No messages provided for initialization" })
        );
    }

    #[tokio::test]
    async fn agent_outage_is_service_unavailable() {
        let app = app(StubAgent::failing());
        let session_id = initialize(&app).await;

        let response = app
            .oneshot(post_json("/api/chat", json!({ "message": "hi", "sessionId": session_id })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/chat")
            .header(header::ORIGIN, "https://viewer.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app(StubAgent::default()).oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
