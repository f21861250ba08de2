//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, error, warn};

use super::{Effect, Intent, Snapshot, TimerCore, TimerStore, Transition};
use crate::{
    error::{CoreError, Result},
    persistence::TimerPersistence,
};

/// Main application state: the timer core plus the effects it drives
#[derive(Debug)]
pub struct AppState {
    /// Timer store and view selector; every intent goes through this lock
    pub core: Arc<Mutex<TimerCore>>,
    persistence: TimerPersistence,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel carrying each rendered snapshot
    pub snapshot_tx: watch::Sender<Snapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<Snapshot>,
}

impl AppState {
    /// Create the state, restoring timers from persistence
    pub fn new(persistence: TimerPersistence, port: u16, host: String) -> Self {
        let core = TimerCore::new(TimerStore::from_records(persistence.load()));
        let (snapshot_tx, snapshot_rx) = watch::channel(core.snapshot());

        Self {
            core: Arc::new(Mutex::new(core)),
            persistence,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Apply an intent and run its effects in order.
    ///
    /// The core lock is held until the effects have run, so persisted and
    /// rendered snapshots never interleave between two intents.
    pub fn dispatch(&self, intent: Intent) -> Result<Transition> {
        let action = intent.name();
        let is_tick = intent == Intent::Tick;

        let mut core = self.core.lock()
            .map_err(|e| CoreError::Lock(format!("timer core: {}", e)))?;

        let transition = core.apply(intent)?;

        for effect in &transition.effects {
            match effect {
                Effect::Persist => {
                    if let Err(e) = self.persistence.save(&transition.snapshot.timers) {
                        error!("Failed to persist timers: {}", e);
                    }
                }
                Effect::Render => {
                    if let Err(e) = self.snapshot_tx.send(transition.snapshot.clone()) {
                        warn!("Failed to publish snapshot: {}", e);
                    }
                }
            }
        }
        drop(core); // Release the lock after the effects

        if !is_tick {
            debug!("Applied {} intent", action);
            if let Ok(mut last_action) = self.last_action.lock() {
                *last_action = Some(action.to_string());
            }
            if let Ok(mut last_time) = self.last_action_time.lock() {
                *last_time = Some(Utc::now());
            }
        }

        Ok(transition)
    }

    /// Dispatch from async code.
    ///
    /// The persist effect writes to storage, so the whole dispatch runs on
    /// the blocking pool instead of a runtime worker.
    pub async fn submit(self: &Arc<Self>, intent: Intent) -> Result<Transition> {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || state.dispatch(intent))
            .await
            .map_err(|e| CoreError::Task(e.to_string()))?
    }

    /// Get the current snapshot
    pub fn snapshot(&self) -> Result<Snapshot> {
        self.core.lock()
            .map(|core| core.snapshot())
            .map_err(|e| CoreError::Lock(format!("timer core: {}", e)))
    }

    /// Subscribe to rendered snapshots
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Write the current store to persistence
    pub fn flush(&self) -> Result<()> {
        let core = self.core.lock()
            .map_err(|e| CoreError::Lock(format!("timer core: {}", e)))?;
        self.persistence.save(core.store().records())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
