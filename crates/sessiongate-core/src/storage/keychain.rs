use std::collections::HashMap;
use std::sync::Mutex;

use keyring::Entry;
use tracing::debug;

use crate::error::{GatewayError, Result};

use super::TokenStorage;

/// Base keychain service name; the origin, if any, is appended
const SERVICE_NAME: &str = "sessiongate";

/// Slots kept in the OS keychain, one entry per key.
///
/// Entries are opened once per key and reused, so a store whose
/// credentials live inside the entry (keyring's mock) reads back what
/// was written through the same `KeyringStorage`.
pub struct KeyringStorage {
    service: String,
    entries: Mutex<HashMap<String, Entry>>,
}

impl KeyringStorage {
    pub fn new(origin: Option<&str>) -> Self {
        let service = match origin {
            Some(origin) => format!("{}:{}", SERVICE_NAME, origin),
            None => SERVICE_NAME.to_string(),
        };
        Self {
            service,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn with_entry<T>(&self, key: &str, f: impl FnOnce(&Entry) -> Result<T>) -> Result<T> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| GatewayError::Storage("keychain entry lock poisoned".to_string()))?;
        if !entries.contains_key(key) {
            let entry = Entry::new(&self.service, key)?;
            entries.insert(key.to_string(), entry);
        }
        match entries.get(key) {
            Some(entry) => f(entry),
            None => Err(GatewayError::Storage(format!("keychain entry {} missing", key))),
        }
    }
}

impl TokenStorage for KeyringStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_entry(key, |entry| match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => {
                debug!(key, service = %self.service, "no keychain entry");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_entry(key, |entry| {
            entry.set_password(value)?;
            debug!(key, service = %self.service, "stored keychain entry");
            Ok(())
        })
    }
}
