//! Unified error type for the Storyforge engine.

use storyforge_identity::IdentityError;
use storyforge_store::StorageError;
use storyforge_sync::SyncError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `storyforge` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate. The
/// `#[from]` attribute on each variant auto-generates `From` impls, so
/// the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum StoryforgeError {
    /// An identity-boundary error (query, credentials, provider).
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// A storage-backend error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A sync-layer error (projects boundary).
    #[error(transparent)]
    Sync(#[from] SyncError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_identity_error() {
        let err = IdentityError::QueryFailed("timeout".into());
        let top: StoryforgeError = err.into();
        assert!(matches!(top, StoryforgeError::Identity(_)));
        assert!(top.to_string().contains("timeout"));
    }

    #[test]
    fn test_from_storage_error() {
        let err = StorageError::QuotaExceeded;
        let top: StoryforgeError = err.into();
        assert!(matches!(top, StoryforgeError::Storage(_)));
    }

    #[test]
    fn test_from_sync_error() {
        let err = SyncError::Projects("list failed".into());
        let top: StoryforgeError = err.into();
        assert!(matches!(top, StoryforgeError::Sync(_)));
    }
}
