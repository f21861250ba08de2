//! Intents accepted by the timer core and the effects they request

use super::timer::TimerId;

/// A user or engine request to change core state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Raw time fields; negative values are clamped to zero by the core
    CreateTimer {
        name: String,
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    ToggleRunning(TimerId),
    ResetTimer(TimerId),
    DeleteTimer(TimerId),
    FocusTimer(TimerId),
    Unfocus,
    Tick,
}

impl Intent {
    /// Short action name for status reporting
    pub fn name(&self) -> &'static str {
        match self {
            Intent::CreateTimer { .. } => "create",
            Intent::ToggleRunning(_) => "toggle",
            Intent::ResetTimer(_) => "reset",
            Intent::DeleteTimer(_) => "delete",
            Intent::FocusTimer(_) => "focus",
            Intent::Unfocus => "unfocus",
            Intent::Tick => "tick",
        }
    }
}

/// Side effect the host must run after a transition, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Flush the timer store to durable storage
    Persist,
    /// Hand the new snapshot to the presentation layer
    Render,
}

/// Total configured seconds for the given time fields.
/// Negative fields count as zero.
pub fn total_seconds(hours: i64, minutes: i64, seconds: i64) -> u64 {
    let clamp = |v: i64| u64::try_from(v).unwrap_or(0);
    clamp(hours)
        .saturating_mul(3600)
        .saturating_add(clamp(minutes).saturating_mul(60))
        .saturating_add(clamp(seconds))
}
