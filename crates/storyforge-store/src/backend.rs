//! The storage backend trait and the in-memory implementation.
//!
//! A backend is the raw key-value substrate: browser localStorage behind
//! a WASM bridge, a file on disk, or just a map in memory. Backends are
//! allowed to fail per call — it's [`SessionStore`](crate::SessionStore)
//! that turns a fallible backend into a never-failing store.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::StorageError;

/// A raw, fallible key-value store.
///
/// Operations are synchronous, mirroring the storage APIs this abstracts
/// over (localStorage's `getItem`/`setItem`/`removeItem` are synchronous
/// and may throw).
///
/// # Trait bounds
///
/// `Send + Sync + 'static` — the backend sits inside a `SessionStore`
/// that is shared across async tasks.
pub trait StorageBackend: Send + Sync + 'static {
    /// Reads a key. `Ok(None)` means the key is absent (not an error).
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a key.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes a key. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// A backend that lives entirely in process memory.
///
/// Infallible by construction. Used standalone when the host has no
/// durable storage at all, and in tests as the known-good backend.
///
/// Interior mutability via `Mutex` because the trait takes `&self`: the
/// store is shared, and the synchronous critical sections here are a few
/// map operations, far too short to contend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().expect("storage mutex poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().expect("storage mutex poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().expect("storage mutex poisoned");
        entries.remove(key);
        Ok(())
    }
}
