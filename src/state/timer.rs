//! Timer record structure and its transitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque timer identifier, unique within a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single named countdown timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerRecord {
    pub id: TimerId,
    pub name: String,
    /// Configured length in seconds, restored on reset
    pub duration: u64,
    /// Seconds left, never above `duration`
    pub remaining: u64,
    pub is_running: bool,
}

impl TimerRecord {
    /// Create a paused timer with the full duration remaining
    pub fn new(id: TimerId, name: impl Into<String>, duration: u64) -> Self {
        Self {
            id,
            name: name.into(),
            duration,
            remaining: duration,
            is_running: false,
        }
    }

    /// Flip between running and paused.
    ///
    /// An expired timer is allowed to flip to running here; the next tick
    /// puts it back to paused without touching `remaining`.
    pub fn toggle(&mut self) {
        self.is_running = !self.is_running;
    }

    /// Restore the full duration and pause
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.is_running = false;
    }

    /// Advance by one countdown step
    pub fn tick(&mut self) {
        if self.is_running && self.remaining > 0 {
            self.remaining -= 1;
        } else if self.remaining == 0 {
            self.is_running = false;
        }
    }

    /// Remaining time as `MM:SS`, or `HH:MM:SS` from one hour up
    pub fn display(&self) -> String {
        format_remaining(self.remaining)
    }
}

/// Format a second count as `MM:SS` below one hour, `HH:MM:SS` otherwise
pub fn format_remaining(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
