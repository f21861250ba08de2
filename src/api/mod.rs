//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and request/response structures.

pub mod handlers;
pub mod requests;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(list_timers_handler).post(create_timer_handler))
        .route("/timers/:id", delete(delete_timer_handler))
        .route("/timers/:id/toggle", post(toggle_timer_handler))
        .route("/timers/:id/reset", post(reset_timer_handler))
        .route("/timers/:id/focus", post(focus_timer_handler))
        .route("/view/unfocus", post(unfocus_handler))
        .route("/events", get(events_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use futures::StreamExt;
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::{
        persistence::{MemoryStorage, TimerPersistence},
        state::Intent,
    };

    fn state() -> Arc<AppState> {
        let persistence = TimerPersistence::new(Arc::new(MemoryStorage::new()));
        Arc::new(AppState::new(persistence, 0, "127.0.0.1".to_string()))
    }

    fn app() -> Router {
        create_router(state())
    }

    async fn next_event(body: &mut axum::body::BodyDataStream) -> String {
        let chunk = tokio::time::timeout(Duration::from_secs(5), body.next())
            .await
            .expect("no event within 5s")
            .expect("event stream ended")
            .unwrap();
        String::from_utf8(chunk.to_vec()).unwrap()
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header("content-type", "application/json");
        }
        let request = request
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn create_toggle_and_read_back() {
        let app = app();

        let (status, created) = send(
            &app,
            "POST",
            "/timers",
            Some(r#"{"name": "Tea", "hours": "0", "minutes": "1", "seconds": "30"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = created["created"].as_u64().unwrap();

        let (status, toggled) = send(&app, "POST", &format!("/timers/{}/toggle", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(toggled["snapshot"]["timers"][0]["isRunning"], true);

        let (status, listed) = send(&app, "GET", "/timers", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed["timers"][0]["name"], "Tea");
        assert_eq!(listed["timers"][0]["duration"], 90);
        assert_eq!(listed["timers"][0]["display"], "01:30");
        assert_eq!(listed["view"]["mode"], "list");
    }

    #[tokio::test]
    async fn unknown_timer_is_404_not_a_crash() {
        let app = app();

        let (status, body) = send(&app, "DELETE", "/timers/12345", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "not_found");

        let (status, _) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn focus_and_unfocus_routes() {
        let app = app();
        let (_, created) = send(&app, "POST", "/timers", Some(r#"{"name": "Egg", "seconds": 5}"#)).await;
        let id = created["created"].as_u64().unwrap();

        let (status, focused) = send(&app, "POST", &format!("/timers/{}/focus", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(focused["snapshot"]["view"]["mode"], "singleFocus");
        assert_eq!(focused["snapshot"]["view"]["focusedId"].as_u64(), Some(id));

        let (status, unfocused) = send(&app, "POST", "/view/unfocus", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(unfocused["snapshot"]["view"]["mode"], "list");
    }

    #[tokio::test]
    async fn events_stream_pushes_snapshot_after_intent() {
        let state = state();
        let app = create_router(Arc::clone(&state));

        let request = Request::builder().uri("/events").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let mut body = response.into_body().into_data_stream();

        let initial = next_event(&mut body).await;
        assert!(initial.contains("event: snapshot"));
        assert!(!initial.contains("Tea"));

        state
            .submit(Intent::CreateTimer {
                name: "Tea".to_string(),
                hours: 0,
                minutes: 1,
                seconds: 30,
            })
            .await
            .unwrap();

        let mut received = String::new();
        while !received.contains("Tea") {
            received.push_str(&next_event(&mut body).await);
        }
        assert!(received.contains("event: snapshot"));
        assert!(received.contains("\"name\":\"Tea\""));
        assert!(received.contains("\"display\":\"01:30\""));
    }
}
