//! Key-value slots holding the session token.
//!
//! The gateway only ever reads a slot or overwrites it wholesale; there is
//! no delete. Backends:
//! - `MemoryStorage`: process-local map, used in tests and embedding
//! - `FileStorage`: JSON document in the per-origin cache directory
//! - `KeyringStorage`: OS keychain entry per key

pub mod file;
pub mod keychain;
pub mod memory;

pub use self::file::FileStorage;
pub use self::keychain::KeyringStorage;
pub use self::memory::MemoryStorage;

use crate::error::Result;

pub trait TokenStorage {
    /// Value stored under `key`, or `None` if the slot was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace whatever is stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: TokenStorage + ?Sized> TokenStorage for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

impl<T: TokenStorage + ?Sized> TokenStorage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
