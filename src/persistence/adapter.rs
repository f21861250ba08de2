//! Saves and loads the timer list under a fixed storage key

use std::{collections::HashSet, fmt, sync::Arc};

use tracing::{debug, info, warn};

use super::storage::Storage;
use crate::{
    error::{CoreError, Result},
    state::TimerRecord,
};

/// Slot holding the serialized timer list
pub const STORAGE_KEY: &str = "timers";

/// Persistence adapter for the ordered timer list
#[derive(Clone)]
pub struct TimerPersistence {
    storage: Arc<dyn Storage>,
}

impl fmt::Debug for TimerPersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerPersistence")
            .field("key", &STORAGE_KEY)
            .finish_non_exhaustive()
    }
}

impl TimerPersistence {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Serialize the full list into the slot
    pub fn save(&self, timers: &[TimerRecord]) -> Result<()> {
        let payload = serde_json::to_string(timers)?;
        self.storage.write(STORAGE_KEY, &payload)?;
        debug!("Saved {} timers", timers.len());
        Ok(())
    }

    /// Load the stored list.
    ///
    /// Never fails: a missing slot, unreadable storage or malformed payload
    /// all come back as an empty list. A malformed payload is set aside
    /// first so the next save does not overwrite it.
    pub fn load(&self) -> Vec<TimerRecord> {
        let payload = match self.storage.read(STORAGE_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                info!("No stored timers, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read stored timers, starting empty: {}", e);
                return Vec::new();
            }
        };

        match parse(&payload) {
            Ok(timers) => {
                info!("Loaded {} timers from storage", timers.len());
                timers
            }
            Err(e) => {
                warn!("Discarding stored timers ({} bytes): {}", payload.len(), e);
                match self.storage.set_aside(STORAGE_KEY) {
                    Ok(Some(aside)) => warn!("Corrupt timer payload kept at {}", aside),
                    Ok(None) => {}
                    Err(e) => warn!("Failed to set corrupt timer payload aside: {}", e),
                }
                Vec::new()
            }
        }
    }
}

fn parse(payload: &str) -> Result<Vec<TimerRecord>> {
    let timers: Vec<TimerRecord> = serde_json::from_str(payload)?;
    validate(&timers)?;
    Ok(timers)
}

/// Reject payloads that would break store invariants
fn validate(timers: &[TimerRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(timers.len());
    for timer in timers {
        if !seen.insert(timer.id) {
            return Err(CoreError::Corrupt(format!("duplicate timer id {}", timer.id)));
        }
        if timer.remaining > timer.duration {
            return Err(CoreError::Corrupt(format!(
                "timer {} has {}s remaining of a {}s duration",
                timer.id, timer.remaining, timer.duration
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        persistence::{FileStorage, MemoryStorage},
        state::{TimerId, TimerStore},
    };

    fn memory() -> (Arc<MemoryStorage>, TimerPersistence) {
        let storage = Arc::new(MemoryStorage::new());
        let persistence = TimerPersistence::new(storage.clone());
        (storage, persistence)
    }

    fn sample() -> Vec<TimerRecord> {
        let mut running = TimerRecord::new(TimerId(2), "Pasta", 600);
        running.toggle();
        running.tick();
        vec![
            TimerRecord::new(TimerId(1), "Tea", 90),
            running,
            TimerRecord::new(TimerId(3), "Zero", 0),
        ]
    }

    #[test]
    fn save_then_load_round_trips_in_order() {
        let (_, persistence) = memory();
        persistence.save(&sample()).unwrap();
        assert_eq!(persistence.load(), sample());
    }

    #[test]
    fn empty_list_round_trips() {
        let (storage, persistence) = memory();
        persistence.save(&[]).unwrap();
        assert_eq!(storage.read(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn missing_slot_loads_empty() {
        let (_, persistence) = memory();
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn malformed_payloads_load_empty() {
        let (storage, persistence) = memory();
        for payload in [
            "not json",
            "{\"id\": 1}",
            "[{\"id\": 1, \"name\": \"x\"}]",
            "[{\"id\": 1, \"name\": \"x\", \"duration\": -5, \"remaining\": 0, \"isRunning\": false}]",
            "null",
            "",
        ] {
            storage.write(STORAGE_KEY, payload).unwrap();
            assert!(persistence.load().is_empty(), "payload {:?}", payload);
        }
    }

    #[test]
    fn malformed_payload_is_set_aside_before_next_save() {
        let (storage, persistence) = memory();
        storage.write(STORAGE_KEY, "{ not timers").unwrap();

        assert!(persistence.load().is_empty());
        persistence.save(&sample()).unwrap();

        assert_eq!(
            storage.read("timers.corrupt").unwrap().as_deref(),
            Some("{ not timers")
        );
        assert_eq!(persistence.load(), sample());
    }

    #[test]
    fn store_at_top_of_id_range_survives_create_save_load() {
        let (storage, persistence) = memory();
        storage
            .write(
                STORAGE_KEY,
                r#"[{"id":18446744073709551615,"name":"top","duration":5,"remaining":5,"isRunning":false}]"#,
            )
            .unwrap();

        let mut store = TimerStore::from_records(persistence.load());
        let created = store.create("next", 1);
        assert_ne!(created, TimerId(u64::MAX));
        persistence.save(store.records()).unwrap();

        let reloaded = persistence.load();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded, store.records());
    }

    #[test]
    fn invariant_breaking_payloads_load_empty() {
        let (storage, persistence) = memory();
        storage
            .write(
                STORAGE_KEY,
                r#"[{"id":1,"name":"a","duration":5,"remaining":5,"isRunning":false},
                    {"id":1,"name":"b","duration":5,"remaining":5,"isRunning":false}]"#,
            )
            .unwrap();
        assert!(persistence.load().is_empty());

        storage
            .write(
                STORAGE_KEY,
                r#"[{"id":1,"name":"a","duration":5,"remaining":9,"isRunning":false}]"#,
            )
            .unwrap();
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn reads_the_documented_layout() {
        let (storage, persistence) = memory();
        storage
            .write(
                STORAGE_KEY,
                r#"[{"id":1700000000000,"name":"Tea","duration":90,"remaining":42,"isRunning":true}]"#,
            )
            .unwrap();

        let timers = persistence.load();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].id, TimerId(1_700_000_000_000));
        assert_eq!(timers[0].remaining, 42);
        assert!(timers[0].is_running);
    }

    #[test]
    fn file_backed_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = TimerPersistence::new(Arc::new(FileStorage::new(dir.path())));
        persistence.save(&sample()).unwrap();

        let reopened = TimerPersistence::new(Arc::new(FileStorage::new(dir.path())));
        assert_eq!(reopened.load(), sample());
    }
}
