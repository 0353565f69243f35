//! The auth event dispatcher: provider notifications → synchronizer triggers.

use std::sync::Arc;

use storyforge_identity::{AuthEvent, AuthEventKind, IdentityClient};
use tokio::sync::mpsc;
use tracing::debug;

use crate::{ProjectsApi, Synchronizer, ViewSink};

/// Consumes the identity provider's push notifications and maps each
/// event kind to the right synchronizer call.
///
/// The mapping is the heart of the debouncing story:
///
/// | Event | Session attached? | Effect |
/// |---|---|---|
/// | `InitialSession` | yes | render logged-in directly |
/// | `InitialSession` | no | render logged-out ("no session at startup") |
/// | `SignedIn` / `TokenRefreshed` / `UserUpdated` | yes | render logged-in directly |
/// | `SignedIn` / `TokenRefreshed` / `UserUpdated` | no | full synchronization pass (retry) |
/// | `SignedOut` | ignored | render logged-out ("signed out") |
///
/// Events that arrive *with* a session have nothing to resolve — the
/// provider already did — so they render directly and cause no polling
/// and no flicker. Only the ambiguous case (a state change implied, no
/// session attached, which happens when the session lags the event by a
/// moment) pays for the resolver's retry loop. `SignedOut` ignores any
/// attached payload: a sign-out event carrying a stale session must
/// still log the user out.
pub struct AuthEventDispatcher<I, P, V> {
    sync: Arc<Synchronizer<I, P, V>>,
}

impl<I, P, V> AuthEventDispatcher<I, P, V>
where
    I: IdentityClient,
    P: ProjectsApi,
    V: ViewSink,
{
    /// Creates a dispatcher feeding the given synchronizer.
    pub fn new(sync: Arc<Synchronizer<I, P, V>>) -> Self {
        Self { sync }
    }

    /// Applies one event according to the table above.
    pub async fn dispatch(&self, event: AuthEvent) {
        debug!(
            kind = %event.kind,
            has_session = event.session.is_some(),
            "auth event"
        );

        match (event.kind, event.session) {
            (AuthEventKind::InitialSession, Some(session)) => {
                self.sync.apply_logged_in(session).await;
            }
            (AuthEventKind::InitialSession, None) => {
                self.sync.apply_logged_out("no session at startup").await;
            }

            (
                AuthEventKind::SignedIn
                | AuthEventKind::TokenRefreshed
                | AuthEventKind::UserUpdated,
                Some(session),
            ) => {
                self.sync.apply_logged_in(session).await;
            }
            (
                AuthEventKind::SignedIn
                | AuthEventKind::TokenRefreshed
                | AuthEventKind::UserUpdated,
                None,
            ) => {
                // The session may lag the event briefly — re-resolve
                // with retry instead of concluding logged-out.
                self.sync.synchronize("auth event without session").await;
            }

            // Unconditional: any attached session payload is stale.
            (AuthEventKind::SignedOut, _) => {
                self.sync.apply_logged_out("signed out").await;
            }
        }
    }

    /// Runs the dispatch loop until the provider drops its sender.
    ///
    /// Subscribed once at startup; there is no re-subscription story
    /// because a closed event stream means the provider itself is gone.
    pub async fn run(&self, mut events: mpsc::Receiver<AuthEvent>) {
        while let Some(event) = events.recv().await {
            self.dispatch(event).await;
        }
        debug!("auth event stream closed");
    }
}
