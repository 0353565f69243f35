//! The never-failing session store: durable backend + memory fallback.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::StorageBackend;

/// Key used to probe the backend at construction. Written and deleted
/// immediately; never visible to callers.
const PROBE_KEY: &str = "__probe__";

/// A key-value store that never fails.
///
/// Wraps a fallible [`StorageBackend`] and guarantees:
///
/// - `get`/`set`/`remove` never return errors and never panic on backend
///   failure;
/// - a value that was `set` is always visible to a later `get`, even if
///   the backend refused the write;
/// - [`is_durable`](Self::is_durable) reports honestly whether values
///   are actually persisting.
///
/// ## How the fallback works
///
/// ```text
/// set(k,v) ──→ backend ok? ──yes──→ durable copy, drop any shadow
///                   │no
///                   └────→ fallback map holds k (the "shadow"),
///                          capability flag drops to false
///
/// get(k)  ──→ backend hit? ──yes──→ that value
///                   │ no / error
///                   └────→ fallback map
/// ```
///
/// The fallback map is consulted whenever the backend comes up empty,
/// so a key whose write was redirected keeps round-tripping for the
/// rest of the process lifetime.
///
/// ## Two assessments of the backend
///
/// The **probe result** is decided once at construction and gates
/// whether backend calls are attempted at all: a backend that failed
/// the probe is never touched again. The **capability flag** starts
/// equal to the probe result but also degrades (one-way) on any later
/// call failure — storage that dropped a write mid-session can't be
/// trusted to hold a login, and callers deserve to know.
pub struct SessionStore<B: StorageBackend> {
    backend: B,

    /// Shadow map for keys the backend failed to hold.
    fallback: Mutex<HashMap<String, String>>,

    /// Did the backend pass the construction-time probe? Fixed for the
    /// process lifetime; gates every backend access.
    probe_ok: bool,

    /// Whether the backend can currently be trusted to persist values.
    /// Starts at `probe_ok`, degrades on call-time failure.
    durable: AtomicBool,

    /// Namespace prefix applied to every key, so the app's entries can't
    /// collide with whatever else shares the backend.
    prefix: String,
}

impl<B: StorageBackend> SessionStore<B> {
    /// Creates a store over `backend`, probing it once.
    ///
    /// The probe writes and deletes a sentinel key. If either step
    /// fails, the store runs memory-only for the process lifetime.
    pub fn new(backend: B, prefix: &str) -> Self {
        let probe_key = format!("{prefix}{PROBE_KEY}");
        let probe_ok = backend.set(&probe_key, "1").is_ok() && backend.remove(&probe_key).is_ok();

        Self {
            backend,
            fallback: Mutex::new(HashMap::new()),
            probe_ok,
            durable: AtomicBool::new(probe_ok),
            prefix: prefix.to_string(),
        }
    }

    /// Whether values written through this store actually persist.
    ///
    /// `false` means the probe failed at startup, or the backend failed
    /// at some point since. Callers use this to explain "login worked
    /// but won't survive a reload" instead of looping silently.
    pub fn is_durable(&self) -> bool {
        self.durable.load(Ordering::Relaxed)
    }

    /// Reads a key. Never fails; absent keys return `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        let key = self.namespaced(key);

        if self.probe_ok {
            match self.backend.get(&key) {
                Ok(Some(value)) => return Some(value),
                // Backend empty for this key: the write may have been
                // redirected, so fall through to the shadow map.
                Ok(None) => {}
                Err(_) => self.degrade(),
            }
        }

        let fallback = self.fallback.lock().expect("storage mutex poisoned");
        fallback.get(&key).cloned()
    }

    /// Writes a key. Never fails; on backend failure the value lands in
    /// the in-memory shadow map instead.
    pub fn set(&self, key: &str, value: &str) {
        let key = self.namespaced(key);

        if self.probe_ok {
            match self.backend.set(&key, value) {
                Ok(()) => {
                    // The durable copy is now authoritative; a stale
                    // shadow from an earlier failure must not mask it.
                    let mut fallback = self.fallback.lock().expect("storage mutex poisoned");
                    fallback.remove(&key);
                    return;
                }
                Err(_) => self.degrade(),
            }
        }

        let mut fallback = self.fallback.lock().expect("storage mutex poisoned");
        fallback.insert(key, value.to_string());
    }

    /// Deletes a key from both the backend and the shadow map.
    pub fn remove(&self, key: &str) {
        let key = self.namespaced(key);

        if self.probe_ok && self.backend.remove(&key).is_err() {
            self.degrade();
        }

        let mut fallback = self.fallback.lock().expect("storage mutex poisoned");
        fallback.remove(&key);
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// One-way capability downgrade after a call-time backend failure.
    fn degrade(&self) {
        self.durable.store(false, Ordering::Relaxed);
    }
}

// =========================================================================
// Tests
// =========================================================================
