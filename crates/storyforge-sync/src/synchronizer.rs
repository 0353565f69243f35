//! The synchronizer: single-flight owner of the view state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use storyforge_identity::{IdentityClient, Session};
use storyforge_resolver::{RetryBudget, SessionResolver};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{ProjectsApi, ViewSink, ViewState};

/// Releases the single-flight gate when a synchronization pass exits.
///
/// Tied to a scope rather than written at each return site, so the gate
/// is released on *every* exit path — early return, error, or panic
/// unwinding through the pass. A leaked gate would silently turn every
/// future `synchronize` call into a no-op, which is exactly the class of
/// "stuck UI" bug this component exists to prevent.
struct FlightGuard<'a> {
    gate: &'a AtomicBool,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.gate.store(false, Ordering::Release);
    }
}

/// Owns the [`ViewState`] and keeps it consistent with the identity
/// provider's session.
///
/// ## Single-flight
///
/// `synchronize` is gated: if a pass is already running, a new call
/// returns immediately without doing anything. The in-flight pass will
/// reach a consistent end state on its own, so concurrent triggers (an
/// auth event firing while a manual refresh is mid-resolution) collapse
/// into one effective pass instead of interleaving partial renders.
///
/// ## Ownership
///
/// This type is the **only** writer of `ViewState`. The dispatcher and
/// the credential flow both mutate state exclusively through the
/// `apply_*` methods here, which also keep the transition bookkeeping
/// (the once-per-transition project load) in one place.
pub struct Synchronizer<I, P, V> {
    client: Arc<I>,
    projects: Arc<P>,
    sink: Arc<V>,

    /// Resolver carrying the routine budget, used by `synchronize`.
    resolver: SessionResolver,

    /// The single owned view state.
    state: Mutex<ViewState>,

    /// Single-flight gate for `synchronize`. An `AtomicBool` rather than
    /// a mutex because the failure mode we want is "skip", not "wait":
    /// a caller that finds a pass in flight must not queue up behind it.
    in_flight: AtomicBool,
}

impl<I, P, V> Synchronizer<I, P, V>
where
    I: IdentityClient,
    P: ProjectsApi,
    V: ViewSink,
{
    /// Creates a synchronizer. The view starts logged out; nothing is
    /// rendered until the first pass or event.
    pub fn new(
        client: Arc<I>,
        projects: Arc<P>,
        sink: Arc<V>,
        routine_budget: RetryBudget,
    ) -> Self {
        Self {
            client,
            projects,
            sink,
            resolver: SessionResolver::new(routine_budget),
            state: Mutex::new(ViewState::logged_out("not yet synchronized")),
            in_flight: AtomicBool::new(false),
        }
    }

    /// A snapshot of the current view state.
    pub async fn view_state(&self) -> ViewState {
        self.state.lock().await.clone()
    }

    /// The projects collaborator this synchronizer loads from.
    pub fn projects(&self) -> &P {
        &self.projects
    }

    /// Brings the view in line with the provider's session.
    ///
    /// Resolves the session with the routine retry budget, then renders
    /// logged-in or logged-out accordingly. `reason` labels the trigger
    /// in logs and in the resulting logged-out state.
    ///
    /// No-op if a pass is already in flight.
    pub async fn synchronize(&self, reason: &str) {
        // try-acquire: losing the race means someone else is already
        // doing this work, and their result will be just as consistent.
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(reason, "synchronization already in flight — skipping");
            return;
        }
        let _guard = FlightGuard {
            gate: &self.in_flight,
        };

        debug!(reason, "synchronizing view from session");

        match self.resolver.resolve(self.client.as_ref()).await {
            Some(session) => self.apply_logged_in(session).await,
            None => self.apply_logged_out(reason).await,
        }

        // _guard drops here → gate released, also on any early exit above.
    }

    /// Transitions to `LoggedIn(session)` and renders it.
    ///
    /// Only a genuine transition (the previous state was logged out)
    /// triggers the dependent project load; re-applying a logged-in
    /// state re-renders but does not reload. The load itself is
    /// best-effort: a failure is logged and the view stays logged in —
    /// login success must remain visually evident even if the secondary
    /// fetch fails.
    pub async fn apply_logged_in(&self, session: Session) {
        let entering = {
            let mut state = self.state.lock().await;
            let entering = !state.is_logged_in();
            *state = ViewState::LoggedIn {
                session: session.clone(),
            };
            entering
        };

        info!(%session, entering, "view: logged in");
        self.sink.show_logged_in(&session).await;

        if entering {
            self.load_projects(&session).await;
        }
    }

    /// Transitions to `LoggedOut(reason)` and renders it.
    pub async fn apply_logged_out(&self, reason: &str) {
        {
            let mut state = self.state.lock().await;
            *state = ViewState::logged_out(reason);
        }

        info!(reason, "view: logged out");
        self.sink.show_logged_out(reason).await;
    }

    /// Reloads the project list into the current logged-in view.
    ///
    /// Exposed for call sites that change the list (project creation)
    /// and need a refresh without a state transition.
    pub async fn load_projects(&self, session: &Session) {
        match self.projects.list(session).await {
            Ok(projects) => {
                debug!(count = projects.len(), "project list loaded");
                self.sink.show_projects(&projects).await;
            }
            Err(e) => {
                // The dependent load failing never downgrades the view
                // state and never propagates.
                warn!(error = %e, "project list load failed");
            }
        }
    }
}
