//! API response structures

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::{Snapshot, TimerId, TimerRecord, ViewSelector};

/// A timer with its display string
#[derive(Debug, Clone, Serialize)]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: TimerRecord,
    pub display: String,
}

impl From<&TimerRecord> for TimerView {
    fn from(timer: &TimerRecord) -> Self {
        Self {
            timer: timer.clone(),
            display: timer.display(),
        }
    }
}

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotResponse {
    pub view: ViewSelector,
    /// All timers in store order
    pub timers: Vec<TimerView>,
    /// Timers the current view shows
    pub visible: Vec<TimerView>,
}

impl From<&Snapshot> for SnapshotResponse {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            view: snapshot.view,
            timers: snapshot.timers.iter().map(TimerView::from).collect(),
            visible: snapshot.visible().into_iter().map(TimerView::from).collect(),
        }
    }
}

/// API response structure for intent endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<TimerId>,
    pub snapshot: SnapshotResponse,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, snapshot: &Snapshot) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            created: None,
            snapshot: SnapshotResponse::from(snapshot),
        }
    }

    /// Create a response for an applied intent
    pub fn ok(message: String, snapshot: &Snapshot) -> Self {
        Self::new("ok", message, snapshot)
    }

    /// Create a response for an intent that referenced a missing timer
    pub fn not_found(message: String, snapshot: &Snapshot) -> Self {
        Self::new("not_found", message, snapshot)
    }

    pub fn with_created(mut self, created: Option<TimerId>) -> Self {
        self.created = created;
        self
    }
}

/// Service status with timer counts
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timer_count: usize,
    pub running_count: usize,
    pub view_mode: String,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
