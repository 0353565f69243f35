//! Error types for storage backends.

/// Failure modes a durable storage backend may report.
///
/// These never escape [`SessionStore`](crate::SessionStore) — the store
/// absorbs them and falls back to memory. They exist so backend
/// implementations can be honest about *why* a call failed, and so tests
/// can exercise each mode.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    /// The backend is out of space.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// The host denies storage access (private mode, policy, sandbox).
    #[error("storage access denied: {0}")]
    AccessDenied(String),

    /// Any other backend failure.
    #[error("storage backend failure: {0}")]
    Backend(String),
}
