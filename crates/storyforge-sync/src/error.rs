//! Error types for the sync layer.

use storyforge_identity::IdentityError;

/// Errors that can occur inside the sync layer.
///
/// Note what's absent: "no session" is not here. A resolver that comes
/// up empty is a valid logged-out answer, not a failure. These variants
/// cover the collaborator boundaries only.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SyncError {
    /// The projects API rejected or failed a call. Isolated by policy:
    /// a failed project load never downgrades the view state.
    #[error("projects api error: {0}")]
    Projects(String),

    /// An identity operation failed outside a retry loop.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}
