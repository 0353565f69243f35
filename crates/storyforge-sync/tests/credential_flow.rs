//! End-to-end tests for the credential actions (login, register,
//! logout, create-project) against scripted identity and storage stubs.
//!
//! These cover the diagnostic contract the whole subsystem exists to
//! deliver: after a sign-in that "succeeds" without a session, the user
//! must be told *why* — blocked storage vs. a provider that hasn't
//! converged — instead of a generic "try again".

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use storyforge_identity::{
    CredentialGrant, IdentityClient, IdentityError, Session, UserInfo,
};
use storyforge_resolver::RetryBudget;
use storyforge_store::{MemoryBackend, SessionStore, StorageBackend, StorageError};
use storyforge_sync::{
    CredentialFlow, Project, ProjectsApi, SyncError, Synchronizer, ViewSink, ViewState,
};

// =========================================================================
// Stubs
// =========================================================================

fn session(subject: &str) -> Session {
    Session {
        subject: subject.to_string(),
        user_id: "u-1".to_string(),
        issued_at_ms: 0,
    }
}

fn user(email: &str) -> UserInfo {
    UserInfo {
        id: "u-1".to_string(),
        email: email.to_string(),
    }
}

/// Scripted identity client: one fixed sign-in answer, a `get_session`
/// answer queue, and call counters.
struct FlowClient {
    sign_in: Result<CredentialGrant, IdentityError>,
    sign_up: Result<CredentialGrant, IdentityError>,
    sessions: Mutex<VecDeque<Option<Session>>>,
    poll_calls: AtomicUsize,
    sign_in_calls: AtomicUsize,
    sign_out_fails: bool,
}

impl FlowClient {
    fn new(sign_in: Result<CredentialGrant, IdentityError>) -> Self {
        Self {
            sign_in,
            sign_up: Ok(CredentialGrant {
                session: None,
                user: Some(user("a@b.com")),
            }),
            sessions: Mutex::new(VecDeque::new()),
            poll_calls: AtomicUsize::new(0),
            sign_in_calls: AtomicUsize::new(0),
            sign_out_fails: false,
        }
    }

    /// Sign-in accepted, but the grant carries no session yet.
    fn accepted_without_session() -> Self {
        Self::new(Ok(CredentialGrant {
            session: None,
            user: Some(user("a@b.com")),
        }))
    }

    fn with_session_script(self, script: Vec<Option<Session>>) -> Self {
        *self.sessions.lock().unwrap() = script.into();
        self
    }

    fn poll_count(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }
}

impl IdentityClient for FlowClient {
    async fn get_session(&self) -> Result<Option<Session>, IdentityError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.sessions.lock().unwrap().pop_front().flatten())
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<CredentialGrant, IdentityError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        self.sign_in.clone()
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _redirect: &str,
    ) -> Result<CredentialGrant, IdentityError> {
        self.sign_up.clone()
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        if self.sign_out_fails {
            Err(IdentityError::Provider("sign-out failed".into()))
        } else {
            Ok(())
        }
    }
}

/// In-memory projects API that records created titles.
#[derive(Default)]
struct MemoryProjects {
    created: Mutex<Vec<String>>,
    list_calls: AtomicUsize,
}

impl ProjectsApi for MemoryProjects {
    async fn list(&self, session: &Session) -> Result<Vec<Project>, SyncError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let created = self.created.lock().unwrap();
        Ok(created
            .iter()
            .enumerate()
            .map(|(i, title)| Project {
                id: format!("p-{i}"),
                title: title.clone(),
                owner_id: session.user_id.clone(),
                meta: serde_json::json!({}),
                created_at_ms: i as u64,
            })
            .collect())
    }

    async fn create(
        &self,
        session: &Session,
        title: &str,
        meta: serde_json::Value,
    ) -> Result<Project, SyncError> {
        let mut created = self.created.lock().unwrap();
        created.push(title.to_string());
        Ok(Project {
            id: format!("p-{}", created.len() - 1),
            title: title.to_string(),
            owner_id: session.user_id.clone(),
            meta,
            created_at_ms: 0,
        })
    }
}

/// Records renders and notifications.
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn notifications(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("notify:").map(str::to_string))
            .collect()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ViewSink for RecordingSink {
    async fn show_logged_in(&self, session: &Session) {
        self.push(format!("logged_in:{}", session.subject));
    }

    async fn show_logged_out(&self, reason: &str) {
        self.push(format!("logged_out:{reason}"));
    }

    async fn show_projects(&self, projects: &[Project]) {
        self.push(format!("projects:{}", projects.len()));
    }

    async fn notify(&self, message: &str) {
        self.push(format!("notify:{message}"));
    }
}

/// A backend whose writes always fail, for the non-durable store.
struct BlockedBackend;

impl StorageBackend for BlockedBackend {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::AccessDenied("storage disabled".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::AccessDenied("storage disabled".into()))
    }
}

// =========================================================================
// Fixture
// =========================================================================

type Flow<B> = CredentialFlow<FlowClient, MemoryProjects, RecordingSink, B>;

struct Fixture<B: StorageBackend> {
    client: Arc<FlowClient>,
    sink: Arc<RecordingSink>,
    sync: Arc<Synchronizer<FlowClient, MemoryProjects, RecordingSink>>,
    flow: Flow<B>,
}

/// Short budgets (3 × 10 ms) keep exhaustion scenarios cheap; the
/// sign-in budget is what `login` uses after an accepted credential.
fn fixture_with_store<B: StorageBackend>(
    client: FlowClient,
    store: SessionStore<B>,
) -> Fixture<B> {
    let client = Arc::new(client);
    let sink = Arc::new(RecordingSink::default());
    let sync = Arc::new(Synchronizer::new(
        Arc::clone(&client),
        Arc::new(MemoryProjects::default()),
        Arc::clone(&sink),
        RetryBudget {
            max_attempts: 3,
            delay: Duration::from_millis(10),
        },
    ));
    let flow = CredentialFlow::new(
        Arc::clone(&client),
        Arc::clone(&sync),
        Arc::clone(&sink),
        Arc::new(store),
        RetryBudget {
            max_attempts: 3,
            delay: Duration::from_millis(10),
        },
        "https://app.example/",
    );
    Fixture {
        client,
        sink,
        sync,
        flow,
    }
}

fn fixture(client: FlowClient) -> Fixture<MemoryBackend> {
    fixture_with_store(client, SessionStore::new(MemoryBackend::new(), "sf-auth-"))
}

// =========================================================================
// login(): validation and rejection
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_login_empty_fields_fails_fast_without_network() {
    let f = fixture(FlowClient::accepted_without_session());

    f.flow.login("", "pw").await;
    f.flow.login("a@b.com", "").await;
    f.flow.login("   ", "pw").await;

    assert_eq!(f.client.sign_in_calls.load(Ordering::SeqCst), 0);
    assert_eq!(f.sink.notifications().len(), 3);
    assert!(f.sink.notifications()[0].contains("email and password"));
}

#[tokio::test(start_paused = true)]
async fn test_login_rejection_surfaces_provider_message_verbatim() {
    let f = fixture(FlowClient::new(Err(IdentityError::CredentialsRejected(
        "Invalid login credentials".into(),
    ))));

    f.flow.login("a@b.com", "wrong").await;

    // Verbatim, no prefix, no rewording.
    assert_eq!(f.sink.notifications(), vec!["Invalid login credentials"]);
    // No state transition and no retry: a rejected credential is final.
    assert_eq!(f.client.poll_count(), 0);
    assert!(!f.sync.view_state().await.is_logged_in());
}

// =========================================================================
// login(): session resolution paths
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_login_with_immediate_session_skips_polling() {
    let f = fixture(FlowClient::new(Ok(CredentialGrant {
        session: Some(session("a@b.com")),
        user: Some(user("a@b.com")),
    })));

    f.flow.login("a@b.com", "pw").await;

    assert!(f.sync.view_state().await.is_logged_in());
    assert_eq!(f.client.poll_count(), 0, "immediate session needs no polls");
}

#[tokio::test(start_paused = true)]
async fn test_login_resolves_lagging_session_on_third_poll() {
    // Sign-in accepted with no session; the provider converges on the
    // third poll. Expect logged-in after exactly 3 polls.
    let f = fixture(
        FlowClient::accepted_without_session().with_session_script(vec![
            None,
            None,
            Some(session("a@b.com")),
        ]),
    );

    f.flow.login("a@b.com", "pw").await;

    assert!(f.sync.view_state().await.is_logged_in());
    assert_eq!(f.client.poll_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_login_exhaustion_with_blocked_storage_explains_storage() {
    // Storage probe fails → the diagnostic must point at the browser's
    // storage, not at the provider, and not a generic "try again".
    let f = fixture_with_store(
        FlowClient::accepted_without_session(),
        SessionStore::new(BlockedBackend, "sf-auth-"),
    );

    f.flow.login("a@b.com", "pw").await;

    let notes = f.sink.notifications();
    assert_eq!(notes.len(), 1);
    assert!(
        notes[0].contains("blocking local storage"),
        "diagnostic must name storage as the cause, got: {}",
        notes[0]
    );
    assert_eq!(
        f.sync.view_state().await,
        ViewState::logged_out("session missing after login")
    );
}

#[tokio::test(start_paused = true)]
async fn test_login_exhaustion_with_working_storage_advises_site_data() {
    let f = fixture(FlowClient::accepted_without_session());

    f.flow.login("a@b.com", "pw").await;

    let notes = f.sink.notifications();
    assert_eq!(notes.len(), 1);
    assert!(
        notes[0].contains("Clear this site's data"),
        "with durable storage the advice is provider-side, got: {}",
        notes[0]
    );
    assert_eq!(
        f.sync.view_state().await,
        ViewState::logged_out("session missing after login")
    );
}

// =========================================================================
// register()
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_register_success_notifies_confirmation_no_transition() {
    let f = fixture(FlowClient::accepted_without_session());

    f.flow.register("a@b.com", "pw").await;

    assert!(f.sink.notifications()[0].contains("confirm"));
    // Registration never transitions the view; the SignedIn event after
    // email confirmation does.
    assert_eq!(
        f.sync.view_state().await,
        ViewState::logged_out("not yet synchronized")
    );
}

#[tokio::test(start_paused = true)]
async fn test_register_empty_fields_fails_fast() {
    let f = fixture(FlowClient::accepted_without_session());

    f.flow.register("", "").await;

    assert!(f.sink.notifications()[0].contains("email and password"));
}

#[tokio::test(start_paused = true)]
async fn test_register_rejection_surfaces_message_verbatim() {
    let mut client = FlowClient::accepted_without_session();
    client.sign_up = Err(IdentityError::CredentialsRejected(
        "Password too short".into(),
    ));
    let f = fixture(client);

    f.flow.register("a@b.com", "x").await;

    assert_eq!(f.sink.notifications(), vec!["Password too short"]);
}

// =========================================================================
// logout()
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_logout_renders_logged_out() {
    let f = fixture(FlowClient::accepted_without_session());
    f.sync.apply_logged_in(session("a@b.com")).await;

    f.flow.logout().await;

    assert_eq!(
        f.sync.view_state().await,
        ViewState::logged_out("signed out")
    );
}

#[tokio::test(start_paused = true)]
async fn test_logout_renders_logged_out_even_when_provider_fails() {
    let mut client = FlowClient::accepted_without_session();
    client.sign_out_fails = true;
    let f = fixture(client);
    f.sync.apply_logged_in(session("a@b.com")).await;

    f.flow.logout().await;

    // The user asked to leave; the view honors it regardless.
    assert_eq!(
        f.sync.view_state().await,
        ViewState::logged_out("signed out")
    );
}

// =========================================================================
// create_project()
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_create_project_empty_title_fails_fast() {
    let f = fixture(FlowClient::accepted_without_session());

    f.flow.create_project("  ", serde_json::json!({})).await;

    assert!(f.sink.notifications()[0].contains("title"));
    assert_eq!(f.client.poll_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_create_project_without_session_renders_logged_out() {
    let f = fixture(FlowClient::accepted_without_session());

    f.flow.create_project("Pilot", serde_json::json!({})).await;

    assert!(f.sink.notifications()[0].contains("Not logged in"));
    assert_eq!(
        f.sync.view_state().await,
        ViewState::logged_out("no session for project creation")
    );
}

#[tokio::test(start_paused = true)]
async fn test_create_project_creates_and_refreshes_list() {
    let f = fixture(FlowClient::accepted_without_session().with_session_script(
        vec![Some(session("a@b.com"))],
    ));

    f.flow
        .create_project("Pilot", serde_json::json!({ "format": "16:9" }))
        .await;

    // The refreshed list contains the new project.
    assert!(f.sink.events().contains(&"projects:1".to_string()));
}
