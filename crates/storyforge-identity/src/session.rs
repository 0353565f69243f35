//! Session and user value types.
//!
//! A "session" is the provider's record that a user is authenticated.
//! The application never mutates one — it only reads the subject for
//! display and hands the whole value back to collaborator APIs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An authenticated session issued by the identity provider.
///
/// Opaque to the application beyond the fields below. The provider owns
/// the token material itself; what crosses the boundary here is just
/// enough to answer "am I logged in, and as whom."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The subject identifier — the user's email address.
    pub subject: String,

    /// The provider's stable user id. Carried for collaborator APIs
    /// (project ownership references), never interpreted locally.
    pub user_id: String,

    /// When the session was issued or last refreshed, in milliseconds
    /// since the Unix epoch. Informational only.
    pub issued_at_ms: u64,
}

impl fmt::Display for Session {
    /// Renders as the subject, so `tracing::info!(%session, ...)` logs
    /// "who" without dumping the whole value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.subject)
    }
}

/// The user record a credential operation may return alongside (or
/// instead of) a session.
///
/// Sign-up in particular can yield a user but no session — the account
/// exists but still needs email confirmation before a session is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// The provider's stable user id.
    pub id: String,
    /// The user's email address.
    pub email: String,
}
