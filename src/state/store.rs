//! Ordered timer store, the single source of truth for timer state

use std::collections::HashSet;

use chrono::Utc;
use tracing::debug;

use super::timer::{TimerId, TimerRecord};
use crate::error::{CoreError, Result};

/// Ordered collection of timers keyed by their unique id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerStore {
    timers: Vec<TimerRecord>,
}

impl TimerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already validated records, keeping their order
    pub fn from_records(timers: Vec<TimerRecord>) -> Self {
        Self { timers }
    }

    pub fn records(&self) -> &[TimerRecord] {
        &self.timers
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn get(&self, id: TimerId) -> Option<&TimerRecord> {
        self.timers.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.get(id).is_some()
    }

    fn get_mut(&mut self, id: TimerId) -> Result<&mut TimerRecord> {
        self.timers
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CoreError::NotFound(id))
    }

    /// Append a new paused timer and return its id
    pub fn create(&mut self, name: impl Into<String>, duration: u64) -> TimerId {
        let id = self.next_id();
        let timer = TimerRecord::new(id, name, duration);
        debug!("Created timer {} ({}s)", id, duration);
        self.timers.push(timer);
        id
    }

    pub fn toggle(&mut self, id: TimerId) -> Result<&TimerRecord> {
        let timer = self.get_mut(id)?;
        timer.toggle();
        Ok(&*timer)
    }

    pub fn reset(&mut self, id: TimerId) -> Result<&TimerRecord> {
        let timer = self.get_mut(id)?;
        timer.reset();
        Ok(&*timer)
    }

    pub fn delete(&mut self, id: TimerId) -> Result<TimerRecord> {
        let index = self
            .timers
            .iter()
            .position(|t| t.id == id)
            .ok_or(CoreError::NotFound(id))?;
        Ok(self.timers.remove(index))
    }

    /// Advance every timer by one countdown step
    pub fn tick(&mut self) {
        for timer in &mut self.timers {
            timer.tick();
        }
    }

    /// Wall-clock milliseconds, bumped past the largest id already in use.
    /// Once the largest id is `u64::MAX`, falls back to the smallest free id.
    fn next_id(&self) -> TimerId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        match self.timers.iter().map(|t| t.id.0).max() {
            None => TimerId(now),
            Some(max) => match max.checked_add(1) {
                Some(floor) => TimerId(now.max(floor)),
                None => self.smallest_free_id(),
            },
        }
    }

    fn smallest_free_id(&self) -> TimerId {
        let used: HashSet<u64> = self.timers.iter().map(|t| t.id.0).collect();
        // The store can never hold u64::MAX + 1 timers, so a gap exists
        let free = (0..=u64::MAX).find(|id| !used.contains(id)).unwrap_or(0);
        TimerId(free)
    }
}
