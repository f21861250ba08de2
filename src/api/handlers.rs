//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::Stream;
use tokio_stream::{wrappers::WatchStream, StreamExt};
use tracing::{debug, error, info, warn};

use crate::{
    error::CoreError,
    state::{AppState, Intent, TimerId},
};
use super::{
    requests::CreateTimerRequest,
    responses::{ApiResponse, HealthResponse, SnapshotResponse, StatusResponse},
};

/// Response of every intent endpoint: the snapshot after the intent, with
/// 404 when the intent named a missing timer
pub type IntentResponse = Result<(StatusCode, Json<ApiResponse>), StatusCode>;

/// Dispatch an intent and turn the outcome into a response
async fn dispatch_intent(state: &Arc<AppState>, intent: Intent, message: impl FnOnce() -> String) -> IntentResponse {
    match state.submit(intent).await {
        Ok(transition) => Ok((
            StatusCode::OK,
            Json(ApiResponse::ok(message(), &transition.snapshot).with_created(transition.created)),
        )),
        Err(CoreError::NotFound(id)) => {
            debug!("Intent ignored, timer {} not found", id);
            match state.snapshot() {
                Ok(snapshot) => Ok((
                    StatusCode::NOT_FOUND,
                    Json(ApiResponse::not_found(format!("Timer {} not found", id), &snapshot)),
                )),
                Err(e) => {
                    error!("Failed to read snapshot: {}", e);
                    Err(StatusCode::INTERNAL_SERVER_ERROR)
                }
            }
        }
        Err(e) => {
            error!("Failed to apply intent: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /timers - Return the current snapshot
pub async fn list_timers_handler(State(state): State<Arc<AppState>>) -> Result<Json<SnapshotResponse>, StatusCode> {
    match state.snapshot() {
        Ok(snapshot) => Ok(Json(SnapshotResponse::from(&snapshot))),
        Err(e) => {
            error!("Failed to read snapshot: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timers - Create a paused timer
pub async fn create_timer_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTimerRequest>,
) -> IntentResponse {
    let name = request.name.trim().to_string();
    let response = dispatch_intent(&state, request.into_intent(), || format!("Timer '{}' created", name)).await?;
    if let Some(id) = response.1.created {
        info!("Created timer {} '{}'", id, name);
    }
    Ok(response)
}

/// Handle POST /timers/:id/toggle - Start or pause a timer
pub async fn toggle_timer_handler(State(state): State<Arc<AppState>>, Path(id): Path<TimerId>) -> IntentResponse {
    dispatch_intent(&state, Intent::ToggleRunning(id), || format!("Timer {} toggled", id)).await
}

/// Handle POST /timers/:id/reset - Restore a timer's full duration
pub async fn reset_timer_handler(State(state): State<Arc<AppState>>, Path(id): Path<TimerId>) -> IntentResponse {
    dispatch_intent(&state, Intent::ResetTimer(id), || format!("Timer {} reset", id)).await
}

/// Handle DELETE /timers/:id - Remove a timer
pub async fn delete_timer_handler(State(state): State<Arc<AppState>>, Path(id): Path<TimerId>) -> IntentResponse {
    let response = dispatch_intent(&state, Intent::DeleteTimer(id), || format!("Timer {} deleted", id)).await?;
    if response.0 == StatusCode::OK {
        info!("Deleted timer {}", id);
    }
    Ok(response)
}

/// Handle POST /timers/:id/focus - Switch to the single-timer view
pub async fn focus_timer_handler(State(state): State<Arc<AppState>>, Path(id): Path<TimerId>) -> IntentResponse {
    dispatch_intent(&state, Intent::FocusTimer(id), || format!("Focused timer {}", id)).await
}

/// Handle POST /view/unfocus - Return to the list view
pub async fn unfocus_handler(State(state): State<Arc<AppState>>) -> IntentResponse {
    dispatch_intent(&state, Intent::Unfocus, || "Showing all timers".to_string()).await
}

/// Handle GET /events - Stream a snapshot for every render pass
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Snapshot stream subscriber connected");

    let stream = WatchStream::new(state.subscribe()).map(|snapshot| {
        let body = SnapshotResponse::from(&snapshot);
        let event = match Event::default().event("snapshot").json_data(&body) {
            Ok(event) => event,
            Err(e) => {
                warn!("Failed to encode snapshot event: {}", e);
                Event::default().event("error").data(e.to_string())
            }
        };
        Ok::<_, Infallible>(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /status - Return service status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = match state.snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to read snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer_count: snapshot.timers.len(),
        running_count: snapshot.running_count(),
        view_mode: snapshot.view.mode_name().to_string(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
