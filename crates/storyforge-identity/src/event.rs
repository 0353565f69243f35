//! Auth-state-change events pushed by the identity provider.
//!
//! The provider notifies the application whenever its view of the session
//! changes: at startup, after a sign-in, after a background token refresh,
//! and so on. Each notification is an [`AuthEvent`] — a kind tag plus an
//! optional attached session.
//!
//! Whether a session is attached matters a great deal to the layer above:
//! an event *with* a session can be rendered directly, while an event
//! *without* one is ambiguous and needs the resolver's retry loop. That
//! decision lives in the sync layer; this module only defines the shape.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Session;

/// The kind of auth-state change the provider is reporting.
///
/// This is a closed set — providers in the wild emit more event names,
/// but everything the synchronizer reacts to maps onto one of these.
/// A tagged enum (rather than string matching at each call site) means
/// the dispatcher's match is checked by the compiler: add a variant and
/// every match that forgot it fails to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEventKind {
    /// The provider finished its startup session check. Fired exactly
    /// once, session attached if one was restored from storage.
    InitialSession,

    /// A sign-in completed somewhere (this tab or another).
    SignedIn,

    /// The provider refreshed the access token in the background.
    TokenRefreshed,

    /// The user record changed (email confirmed, profile update).
    UserUpdated,

    /// The user signed out. Any attached session payload is stale and
    /// must be ignored.
    SignedOut,
}

impl fmt::Display for AuthEventKind {
    /// Delegates to Debug — the variant names are already the right
    /// human-readable form for log lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// One push notification from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    /// What changed.
    pub kind: AuthEventKind,
    /// The provider's session at the time of the event, if it had one.
    pub session: Option<Session>,
}

impl AuthEvent {
    /// Convenience constructor for an event with no attached session.
    pub fn bare(kind: AuthEventKind) -> Self {
        Self {
            kind,
            session: None,
        }
    }

    /// Convenience constructor for an event carrying a session.
    pub fn with_session(kind: AuthEventKind, session: Session) -> Self {
        Self {
            kind,
            session: Some(session),
        }
    }
}
