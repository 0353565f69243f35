//! Credential actions: login, register, logout, project creation.
//!
//! These are the user-initiated entry points. Every public action here
//! catches its own failures and leaves the view state in a well-defined
//! terminal state — nothing thrown at the identity boundary is allowed
//! to propagate into the render path.

use std::sync::Arc;

use serde_json::Value;
use storyforge_identity::IdentityClient;
use storyforge_resolver::{RetryBudget, SessionResolver};
use storyforge_store::{SessionStore, StorageBackend};
use tracing::{info, warn};

use crate::{ProjectsApi, Synchronizer, ViewSink};

/// Shown when both credential fields aren't filled in.
const MSG_MISSING_FIELDS: &str = "Please enter both email and password.";

/// Shown when login succeeded but no session converged AND storage is
/// known to be non-durable: the honest explanation, instead of letting
/// the user retry into the same wall forever.
const MSG_STORAGE_BLOCKED: &str = "Login succeeded, but this browser is blocking local storage.\n\
     The sign-in cannot be kept across reloads.\n\
     Allow cookies and site data, or try a different browser.";

/// Shown when login succeeded, storage is fine, and the provider still
/// never produced an observable session within the budget.
const MSG_SESSION_MISSING: &str = "Login succeeded, but the session is not available.\n\
     Clear this site's data and try again.";

/// Shown after a successful registration (confirmation flow).
const MSG_REGISTERED: &str = "Registered. Check your email to confirm (spam folder too).";

/// User-initiated credential operations.
///
/// Holds the long, sign-in-specific retry budget — the one place a
/// false "you are not logged in" is expensive enough to justify several
/// seconds of polling — plus the storage capability flag that powers the
/// post-login diagnostics.
pub struct CredentialFlow<I, P, V, B: StorageBackend> {
    client: Arc<I>,
    sync: Arc<Synchronizer<I, P, V>>,
    sink: Arc<V>,
    store: Arc<SessionStore<B>>,

    /// Resolver carrying the sign-in budget.
    resolver: SessionResolver,

    /// Resolver carrying the routine budget, for non-login actions that
    /// just need the current session.
    routine: SessionResolver,

    /// Where the confirmation email sends the user back to.
    redirect: String,
}

impl<I, P, V, B> CredentialFlow<I, P, V, B>
where
    I: IdentityClient,
    P: ProjectsApi,
    V: ViewSink,
    B: StorageBackend,
{
    /// Creates the flow.
    ///
    /// `sign_in_budget` is used only by [`login`](Self::login);
    /// everything else resolves with [`RetryBudget::routine`].
    pub fn new(
        client: Arc<I>,
        sync: Arc<Synchronizer<I, P, V>>,
        sink: Arc<V>,
        store: Arc<SessionStore<B>>,
        sign_in_budget: RetryBudget,
        redirect: &str,
    ) -> Self {
        Self {
            client,
            sync,
            sink,
            store,
            resolver: SessionResolver::new(sign_in_budget),
            routine: SessionResolver::new(RetryBudget::routine()),
            redirect: redirect.to_string(),
        }
    }

    /// Signs in with email + password.
    ///
    /// The flow, in order:
    /// 1. fast-fail on empty fields, no network call;
    /// 2. provider rejection → surfaced verbatim, no state change, no
    ///    retry (retrying a rejected credential is never correct);
    /// 3. the grant already carries a session → render immediately (a
    ///    pure optimization over the retry path, never a substitute);
    /// 4. otherwise resolve with the long sign-in budget;
    /// 5. still nothing → explain *why*, distinguishing blocked storage
    ///    from a provider that hasn't converged, then render logged-out.
    pub async fn login(&self, email: &str, password: &str) {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            self.sink.notify(MSG_MISSING_FIELDS).await;
            return;
        }

        let grant = match self.client.sign_in_with_password(email, password).await {
            Ok(grant) => grant,
            Err(e) => {
                // Verbatim: the provider's message is the user's answer.
                info!(error = %e, "sign-in rejected");
                self.sink.notify(&e.to_string()).await;
                return;
            }
        };

        // Immediate-session optimization: nothing to resolve.
        if let Some(session) = grant.session {
            self.sync.apply_logged_in(session).await;
            return;
        }

        // The session usually trails the credential response by a
        // moment; this is the one call site with the long budget.
        match self.resolver.resolve(self.client.as_ref()).await {
            Some(session) => self.sync.apply_logged_in(session).await,
            None => {
                if self.store.is_durable() {
                    self.sink.notify(MSG_SESSION_MISSING).await;
                } else {
                    self.sink.notify(MSG_STORAGE_BLOCKED).await;
                }
                self.sync
                    .apply_logged_out("session missing after login")
                    .await;
            }
        }
    }

    /// Creates a new account.
    ///
    /// Success means "confirmation email sent", not "logged in" — no
    /// state transition happens here. The provider fires a `SignedIn`
    /// event later, once the user confirms.
    pub async fn register(&self, email: &str, password: &str) {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            self.sink.notify(MSG_MISSING_FIELDS).await;
            return;
        }

        match self
            .client
            .sign_up(email, password, &self.redirect)
            .await
        {
            Ok(_) => self.sink.notify(MSG_REGISTERED).await,
            Err(e) => {
                info!(error = %e, "sign-up rejected");
                self.sink.notify(&e.to_string()).await;
            }
        }
    }

    /// Signs out.
    ///
    /// The logged-out transition happens unconditionally: even if the
    /// provider call fails, the user asked to leave and the view honors
    /// that. The provider-side session, if any survives, gets cleaned up
    /// by its own expiry.
    pub async fn logout(&self) {
        if let Err(e) = self.client.sign_out().await {
            warn!(error = %e, "sign-out call failed");
        }
        self.sync.apply_logged_out("signed out").await;
    }

    /// Creates a project and refreshes the list.
    ///
    /// Resolves the current session with the routine budget first: a
    /// user whose session evaporated mid-visit gets the logged-out view,
    /// not a confusing API error.
    pub async fn create_project(&self, title: &str, meta: Value) {
        let title = title.trim();
        if title.is_empty() {
            self.sink.notify("A project title is required.").await;
            return;
        }

        let Some(session) = self.routine.resolve(self.client.as_ref()).await else {
            self.sink.notify("Not logged in.").await;
            self.sync
                .apply_logged_out("no session for project creation")
                .await;
            return;
        };

        // The synchronizer owns the projects handle; the flow reuses it
        // rather than carrying a second one.
        match self.sync.projects().create(&session, title, meta).await {
            Ok(project) => {
                info!(project_id = %project.id, "project created");
                self.sync.load_projects(&session).await;
            }
            Err(e) => self.sink.notify(&e.to_string()).await,
        }
    }
}
