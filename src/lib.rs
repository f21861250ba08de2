//! Multi Timer - named countdown timers with persisted state
//! 
//! This library provides the timer core (records, countdown, view selector),
//! its persistence adapter, and a local HTTP surface for a presentation layer.

pub mod config;
pub mod error;
pub mod state;
pub mod persistence;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::CoreError;
pub use state::{AppState, Intent, Snapshot, TimerCore};
pub use persistence::{FileStorage, MemoryStorage, Storage, TimerPersistence};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
