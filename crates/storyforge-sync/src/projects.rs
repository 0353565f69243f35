//! The projects collaborator: the dependent data behind the logged-in view.
//!
//! Projects are what the user actually came for — the storyboard list on
//! the dashboard. From this crate's perspective they are strictly
//! *dependent* data: loaded best-effort after entering the logged-in
//! state, never allowed to affect the auth state machine itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use storyforge_identity::Session;

use crate::SyncError;

/// One storyboard project as the collaborator API reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// The API's identifier for the project.
    pub id: String,

    /// Display title.
    pub title: String,

    /// The owning user's id. Carried for display and linking only —
    /// ownership enforcement is the API's job (row-level policy), and
    /// the client performs no trust-sensitive filtering of its own.
    pub owner_id: String,

    /// Free-form project metadata (editor, format, team, ...). Opaque
    /// here; the editor screens interpret it.
    pub meta: Value,

    /// Creation timestamp, milliseconds since the Unix epoch.
    pub created_at_ms: u64,
}

/// The projects CRUD boundary.
///
/// Calls take the caller's [`Session`] because the API authenticates
/// every request with it; the API decides what the session's owner may
/// see.
///
/// # Trait bounds
///
/// `Send + Sync + 'static`, like every boundary trait in the stack: the
/// implementation is shared behind an `Arc`.
pub trait ProjectsApi: Send + Sync + 'static {
    /// Lists the session owner's projects, newest first.
    async fn list(&self, session: &Session) -> Result<Vec<Project>, SyncError>;

    /// Creates a project owned by the session's user.
    async fn create(
        &self,
        session: &Session,
        title: &str,
        meta: Value,
    ) -> Result<Project, SyncError>;
}
