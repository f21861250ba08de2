//! Persistence module
//!
//! A key-value slot store and the adapter that keeps the timer list in it.

pub mod adapter;
pub mod storage;

// Re-export main types
pub use adapter::{TimerPersistence, STORAGE_KEY};
pub use storage::{FileStorage, MemoryStorage, Storage};
