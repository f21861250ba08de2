//! Timer controller: the store and view selector behind one intent dispatcher

use serde::Serialize;
use tracing::debug;

use super::{
    intent::{total_seconds, Effect, Intent},
    store::TimerStore,
    timer::{TimerId, TimerRecord},
    view::ViewSelector,
};
use crate::error::{CoreError, Result};

/// Read-only view of the core handed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub view: ViewSelector,
    pub timers: Vec<TimerRecord>,
}

impl Snapshot {
    /// Timers the current view shows.
    ///
    /// A focus on a timer that no longer exists shows nothing.
    pub fn visible(&self) -> Vec<&TimerRecord> {
        match self.view {
            ViewSelector::List => self.timers.iter().collect(),
            ViewSelector::SingleFocus { focused_id } => {
                self.timers.iter().filter(|t| t.id == focused_id).collect()
            }
        }
    }

    pub fn get(&self, id: TimerId) -> Option<&TimerRecord> {
        self.timers.iter().find(|t| t.id == id)
    }

    pub fn running_count(&self) -> usize {
        self.timers.iter().filter(|t| t.is_running).count()
    }
}

/// Result of applying one intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub snapshot: Snapshot,
    pub effects: Vec<Effect>,
    /// Id of the timer created by this intent, if any
    pub created: Option<TimerId>,
}

/// Owns the timer store and the view selector.
///
/// `apply` is the only writer of either; it performs no I/O and reports
/// which effects the host has to run.
#[derive(Debug, Clone, Default)]
pub struct TimerCore {
    store: TimerStore,
    view: ViewSelector,
}

impl TimerCore {
    pub fn new(store: TimerStore) -> Self {
        Self {
            store,
            view: ViewSelector::default(),
        }
    }

    pub fn store(&self) -> &TimerStore {
        &self.store
    }

    pub fn view(&self) -> ViewSelector {
        self.view
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            view: self.view,
            timers: self.store.records().to_vec(),
        }
    }

    /// Apply an intent. A missing id leaves all state untouched.
    pub fn apply(&mut self, intent: Intent) -> Result<Transition> {
        const STORE_CHANGED: &[Effect] = &[Effect::Persist, Effect::Render];
        const VIEW_CHANGED: &[Effect] = &[Effect::Render];

        let mut created = None;
        let effects = match intent {
            Intent::CreateTimer {
                name,
                hours,
                minutes,
                seconds,
            } => {
                let duration = total_seconds(hours, minutes, seconds);
                created = Some(self.store.create(name.trim(), duration));
                STORE_CHANGED
            }
            Intent::ToggleRunning(id) => {
                let timer = self.store.toggle(id)?;
                debug!("Timer {} running={}", id, timer.is_running);
                STORE_CHANGED
            }
            Intent::ResetTimer(id) => {
                self.store.reset(id)?;
                debug!("Timer {} reset", id);
                STORE_CHANGED
            }
            Intent::DeleteTimer(id) => {
                self.store.delete(id)?;
                if self.view.on_deleted(id) {
                    debug!("Focused timer {} deleted, back to list view", id);
                }
                STORE_CHANGED
            }
            Intent::FocusTimer(id) => {
                if !self.store.contains(id) {
                    return Err(CoreError::NotFound(id));
                }
                self.view.focus(id);
                VIEW_CHANGED
            }
            Intent::Unfocus => {
                self.view.back();
                VIEW_CHANGED
            }
            Intent::Tick => {
                self.store.tick();
                STORE_CHANGED
            }
        };

        Ok(Transition {
            snapshot: self.snapshot(),
            effects: effects.to_vec(),
            created,
        })
    }
}
