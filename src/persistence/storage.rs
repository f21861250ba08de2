//! Durable key-value slots

use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
    sync::Mutex,
};

use chrono::Utc;
use tracing::debug;

use crate::error::{CoreError, Result};

/// A store of named string slots, read and replaced whole
pub trait Storage: Send + Sync {
    /// Read a slot, `None` if it has never been written
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace a slot's content
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Move a slot's content out of the way so the next write cannot
    /// destroy it. Returns where it went, `None` if the slot was empty.
    fn set_aside(&self, key: &str) -> Result<Option<String>>;
}

/// One JSON file per slot inside a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn aside_path(&self, key: &str) -> PathBuf {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%3f");
        let mut path = self.dir.join(format!("{}.corrupt-{}.json", key, stamp));
        let mut attempt = 1;
        while path.exists() {
            path = self.dir.join(format!("{}.corrupt-{}-{}.json", key, stamp, attempt));
            attempt += 1;
        }
        path
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored slot at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.slot_path(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn set_aside(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let aside = self.aside_path(key);
        fs::rename(&path, &aside)?;
        Ok(Some(aside.display().to_string()))
    }
}

/// In-process slots, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|e| CoreError::Lock(format!("memory storage: {}", e)))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| CoreError::Lock(format!("memory storage: {}", e)))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_aside(&self, key: &str) -> Result<Option<String>> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| CoreError::Lock(format!("memory storage: {}", e)))?;
        let Some(content) = slots.remove(key) else {
            return Ok(None);
        };
        let aside = format!("{}.corrupt", key);
        slots.insert(aside.clone(), content);
        Ok(Some(aside))
    }
}
