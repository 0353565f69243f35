//! The view state and the render target it is projected onto.

use std::fmt;

use storyforge_identity::Session;

/// The one piece of UI state this system maintains.
///
/// Exactly one variant is active at any time, and rendering is a pure
/// function of the value — there is no other UI state to get out of
/// sync with. The state machine is deliberately tiny:
///
/// ```text
///   LoggedOut(reason) ──(session resolved)──→ LoggedIn(session)
///         ↑                                        │
///         └──────(sign-out / resolution empty)─────┘
/// ```
///
/// The `reason` on `LoggedOut` exists for diagnostics: "signed out",
/// "no session at startup", "session missing after login" all render the
/// same view but tell very different stories in the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// No authenticated session. The reason records which path led here.
    LoggedOut {
        /// Diagnostic label for the transition, never shown as an error
        /// to the user.
        reason: String,
    },

    /// An authenticated session is active.
    LoggedIn {
        /// The session being displayed.
        session: Session,
    },
}

impl ViewState {
    /// Shorthand constructor for the logged-out variant.
    pub fn logged_out(reason: &str) -> Self {
        Self::LoggedOut {
            reason: reason.to_string(),
        }
    }

    /// Returns `true` if a session is active.
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn { .. })
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoggedOut { reason } => write!(f, "logged-out ({reason})"),
            Self::LoggedIn { session } => write!(f, "logged-in ({session})"),
        }
    }
}

/// The surface the view state is rendered onto.
///
/// In a browser build this toggles DOM views; in the demo it prints to
/// the console; in tests it records calls. The contract implementations
/// must honor: **rendering is idempotent** — showing the same state
/// twice has no observable effect beyond redundant writes. The
/// [`Synchronizer`](crate::Synchronizer) guarantees the expensive part
/// (the dependent project load fires once per transition, not once per
/// render), but sinks should not, say, append a second copy of the
/// project list either.
///
/// # Trait bounds
///
/// `Send + Sync + 'static` — the sink is shared behind an `Arc` between
/// the synchronizer, the dispatcher, and the credential flow.
pub trait ViewSink: Send + Sync + 'static {
    /// Shows the logged-in view for `session`.
    async fn show_logged_in(&self, session: &Session);

    /// Shows the logged-out view. `reason` is diagnostic context, not
    /// user-facing copy.
    async fn show_logged_out(&self, reason: &str);

    /// Renders the project list inside the logged-in view.
    async fn show_projects(&self, projects: &[crate::Project]);

    /// Surfaces a user-visible message (validation problems, provider
    /// rejections, storage diagnostics).
    async fn notify(&self, message: &str);
}
