use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

use super::TokenStorage;

/// Storage file name in the origin's cache directory
const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredValue {
    pub value: String,
    pub stored_at: DateTime<Utc>,
}

impl StoredValue {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            stored_at: Utc::now(),
        }
    }
}

/// Slots persisted as one JSON document, surviving process restarts.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STORAGE_FILE)
    }

    /// Full slot entry, including when it was written
    pub fn entry(&self, key: &str) -> Result<Option<StoredValue>> {
        Ok(self.load()?.remove(key))
    }

    fn load(&self) -> Result<BTreeMap<String, StoredValue>> {
        let path = self.path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, slots: &BTreeMap<String, StoredValue>) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let contents = serde_json::to_string_pretty(slots)?;
        std::fs::write(self.path(), contents)?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.entry(key)?.map(|e| e.value);
        debug!(key, found = value.is_some(), "read slot from {}", self.path().display());
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.load()?;
        slots.insert(key.to_string(), StoredValue::new(value));
        self.save(&slots)?;
        debug!(key, "wrote slot to {}", self.path().display());
        Ok(())
    }
}
