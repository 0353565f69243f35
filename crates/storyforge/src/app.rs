//! `App` builder and run loop.
//!
//! This is the entry point for hosts embedding the engine. It ties
//! together all the layers: store → resolver → synchronizer →
//! dispatcher → credential flow, and owns the startup sequence.

use std::sync::Arc;

use storyforge_identity::{AuthEvent, IdentityClient};
use storyforge_resolver::RetryBudget;
use storyforge_store::{SessionStore, StorageBackend};
use storyforge_sync::{
    AuthEventDispatcher, CredentialFlow, ProjectsApi, Synchronizer, ViewSink, ViewState,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Default namespace prefix for session storage keys.
const DEFAULT_STORAGE_PREFIX: &str = "sf-auth-";

/// Builder for configuring and assembling a Storyforge [`App`].
///
/// The collaborators (identity client, projects API, view sink, storage
/// backend) are passed to [`build`](Self::build); the builder itself
/// only carries tuning knobs with sensible defaults.
///
/// # Example
///
/// ```rust,ignore
/// let app = AppBuilder::new()
///     .sign_in_budget(RetryBudget { max_attempts: 40, delay })
///     .redirect("https://studio.example/")
///     .build(my_client, my_api, my_view, my_backend);
/// app.run(events_rx).await;
/// ```
pub struct AppBuilder {
    routine_budget: RetryBudget,
    sign_in_budget: RetryBudget,
    storage_prefix: String,
    redirect: String,
}

impl AppBuilder {
    /// Creates a builder with default budgets and prefix.
    pub fn new() -> Self {
        Self {
            routine_budget: RetryBudget::routine(),
            sign_in_budget: RetryBudget::sign_in(),
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            redirect: String::new(),
        }
    }

    /// Overrides the budget used by routine synchronization passes.
    pub fn routine_budget(mut self, budget: RetryBudget) -> Self {
        self.routine_budget = budget;
        self
    }

    /// Overrides the budget used right after an explicit sign-in.
    pub fn sign_in_budget(mut self, budget: RetryBudget) -> Self {
        self.sign_in_budget = budget;
        self
    }

    /// Overrides the storage key namespace.
    pub fn storage_prefix(mut self, prefix: &str) -> Self {
        self.storage_prefix = prefix.to_string();
        self
    }

    /// Sets the URL confirmation emails send the user back to.
    pub fn redirect(mut self, redirect: &str) -> Self {
        self.redirect = redirect.to_string();
        self
    }

    /// Assembles the app around the four collaborators.
    ///
    /// Probes the storage backend (see
    /// [`SessionStore::new`](storyforge_store::SessionStore::new)) and
    /// logs the capability verdict — this is the moment to notice a
    /// storage-blocked host, not after the first mysterious logout.
    pub fn build<I, P, V, B>(self, identity: I, projects: P, sink: V, backend: B) -> App<I, P, V, B>
    where
        I: IdentityClient,
        P: ProjectsApi,
        V: ViewSink,
        B: StorageBackend,
    {
        let identity = Arc::new(identity);
        let projects = Arc::new(projects);
        let sink = Arc::new(sink);

        let store = Arc::new(SessionStore::new(backend, &self.storage_prefix));
        if store.is_durable() {
            info!("session storage is durable");
        } else {
            warn!("session storage unavailable — falling back to in-memory store");
        }

        let sync = Arc::new(Synchronizer::new(
            Arc::clone(&identity),
            Arc::clone(&projects),
            Arc::clone(&sink),
            self.routine_budget,
        ));

        let dispatcher = AuthEventDispatcher::new(Arc::clone(&sync));

        let flow = CredentialFlow::new(
            Arc::clone(&identity),
            Arc::clone(&sync),
            Arc::clone(&sink),
            Arc::clone(&store),
            self.sign_in_budget,
            &self.redirect,
        );

        App {
            store,
            sync,
            dispatcher,
            flow,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An assembled Storyforge engine.
///
/// Owns the synchronizer (and with it the single [`ViewState`]), the
/// auth-event dispatcher, and the credential flow. All methods take
/// `&self`; the app is designed to sit in an `Arc` (or simply be
/// borrowed) by whatever UI layer drives it.
pub struct App<I, P, V, B: StorageBackend> {
    store: Arc<SessionStore<B>>,
    sync: Arc<Synchronizer<I, P, V>>,
    dispatcher: AuthEventDispatcher<I, P, V>,
    flow: CredentialFlow<I, P, V, B>,
}

impl<I, P, V, B> App<I, P, V, B>
where
    I: IdentityClient,
    P: ProjectsApi,
    V: ViewSink,
    B: StorageBackend,
{
    /// Runs the startup sequence, then the event loop.
    ///
    /// Order matters and mirrors the one that works in practice: the
    /// initial synchronization pass first (so the user sees *something*
    /// consistent immediately), then the dispatcher consumes provider
    /// events until the stream closes.
    pub async fn run(&self, events: mpsc::Receiver<AuthEvent>) {
        info!("storyforge starting");
        self.sync.synchronize("startup").await;
        self.dispatcher.run(events).await;
    }

    /// Triggers a manual synchronization pass (no-op if one is running).
    pub async fn synchronize(&self, reason: &str) {
        self.sync.synchronize(reason).await;
    }

    /// Signs in. See [`CredentialFlow::login`].
    pub async fn login(&self, email: &str, password: &str) {
        self.flow.login(email, password).await;
    }

    /// Registers a new account. See [`CredentialFlow::register`].
    pub async fn register(&self, email: &str, password: &str) {
        self.flow.register(email, password).await;
    }

    /// Signs out. See [`CredentialFlow::logout`].
    pub async fn logout(&self) {
        self.flow.logout().await;
    }

    /// Creates a project. See [`CredentialFlow::create_project`].
    pub async fn create_project(&self, title: &str, meta: serde_json::Value) {
        self.flow.create_project(title, meta).await;
    }

    /// A snapshot of the current view state.
    pub async fn view_state(&self) -> ViewState {
        self.sync.view_state().await
    }

    /// The session store, including its capability flag.
    pub fn store(&self) -> &SessionStore<B> {
        &self.store
    }
}
