//! State management module
//! 
//! This module contains the timer model, its transitions, the view selector
//! and the shared application state that serializes all intents.

pub mod timer;
pub mod store;
pub mod view;
pub mod intent;
pub mod controller;
pub mod app_state;

// Re-export main types
pub use timer::{format_remaining, TimerId, TimerRecord};
pub use store::TimerStore;
pub use view::ViewSelector;
pub use intent::{Effect, Intent};
pub use controller::{Snapshot, TimerCore, Transition};
pub use app_state::AppState;
