//! Durable session storage with in-memory fallback.
//!
//! Browsers (and other sandboxed hosts) are allowed to refuse persistent
//! storage: private windows, quota exhaustion, embedded webviews with
//! storage disabled. A session store that assumes writes always land
//! produces the worst kind of bug — login "succeeds" but evaporates on
//! the next page load, with nothing in the logs.
//!
//! This crate's answer is a store that **never fails outward**:
//!
//! 1. **Probe at startup** — [`SessionStore::new`] writes and deletes a
//!    sentinel key. If that fails, the store runs memory-only for the
//!    process lifetime.
//! 2. **Capability flag** — [`SessionStore::is_durable`] tells callers
//!    whether persistence is real, so the login flow can explain
//!    "your browser is blocking storage" instead of retrying forever.
//! 3. **Per-call safety net** — even a backend that passed the probe can
//!    fail later (storage evicted mid-session). Every operation catches
//!    the failure and redirects that key to the in-memory map.
//!
//! The store itself stays silent: no logging, no user-facing alerts.
//! Diagnostics are the caller's responsibility, made possible by the
//! capability flag.

mod backend;
mod error;
mod store;

pub use backend::{MemoryBackend, StorageBackend};
pub use error::StorageError;
pub use store::SessionStore;
