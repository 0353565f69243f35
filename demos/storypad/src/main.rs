//! Storypad: a console walkthrough of the full Storyforge stack.
//!
//! Wires a scripted in-process identity provider, an in-memory projects
//! API, and a println view sink into an [`App`], then runs the same
//! sequence a user would: start logged out, sign in (with the provider
//! deliberately lagging, so the retry loop has to work for its answer),
//! create a couple of storyboards, sign out.
//!
//! Run it with `cargo run -p storypad` and watch the view transitions
//! scroll by.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use storyforge::prelude::*;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Scripted identity provider
// ---------------------------------------------------------------------------

const DEMO_EMAIL: &str = "ada@example.com";
const DEMO_PASSWORD: &str = "storyboards";

/// How many `get_session` calls after a sign-in return nothing before
/// the session becomes observable. Simulates the provider's internal
/// propagation delay so the demo exercises the retry loop.
const SESSION_LAG_POLLS: usize = 3;

/// An in-process provider that accepts exactly one account and makes
/// new sessions observable only after a few polls.
struct DemoIdentity {
    session: Mutex<Option<Session>>,
    lag: AtomicUsize,
    events: mpsc::Sender<AuthEvent>,
}

impl DemoIdentity {
    fn new(events: mpsc::Sender<AuthEvent>) -> Self {
        Self {
            session: Mutex::new(None),
            lag: AtomicUsize::new(0),
            events,
        }
    }

    fn make_session() -> Session {
        Session {
            subject: DEMO_EMAIL.to_string(),
            user_id: "user-ada".to_string(),
            issued_at_ms: 0,
        }
    }
}

impl IdentityClient for DemoIdentity {
    async fn get_session(&self) -> Result<Option<Session>, IdentityError> {
        if self.lag.load(Ordering::SeqCst) > 0 {
            self.lag.fetch_sub(1, Ordering::SeqCst);
            return Ok(None);
        }
        // Mutex is internal and never held across an await.
        Ok(self.session.lock().unwrap().clone())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CredentialGrant, IdentityError> {
        if email != DEMO_EMAIL || password != DEMO_PASSWORD {
            return Err(IdentityError::CredentialsRejected(
                "invalid email or password".to_string(),
            ));
        }
        let session = Self::make_session();
        *self.session.lock().unwrap() = Some(session.clone());
        self.lag.store(SESSION_LAG_POLLS, Ordering::SeqCst);
        let _ = self
            .events
            .send(AuthEvent::with_session(AuthEventKind::SignedIn, session))
            .await;
        // No session in the grant: the flow has to poll for it.
        Ok(CredentialGrant {
            session: None,
            user: Some(UserInfo {
                id: "user-ada".to_string(),
                email: DEMO_EMAIL.to_string(),
            }),
        })
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _redirect: &str,
    ) -> Result<CredentialGrant, IdentityError> {
        Err(IdentityError::Provider(
            "sign-ups are disabled in the demo".to_string(),
        ))
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        *self.session.lock().unwrap() = None;
        let _ = self.events.send(AuthEvent::bare(AuthEventKind::SignedOut)).await;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory projects API
// ---------------------------------------------------------------------------

struct MemoryProjects {
    items: Mutex<Vec<Project>>,
    next_id: AtomicUsize,
}

impl MemoryProjects {
    fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
        }
    }
}

impl ProjectsApi for MemoryProjects {
    async fn list(&self, session: &Session) -> Result<Vec<Project>, SyncError> {
        let items = self.items.lock().unwrap();
        let mut mine: Vec<Project> = items
            .iter()
            .filter(|p| p.owner_id == session.user_id)
            .cloned()
            .collect();
        mine.reverse(); // newest first
        Ok(mine)
    }

    async fn create(
        &self,
        session: &Session,
        title: &str,
        meta: serde_json::Value,
    ) -> Result<Project, SyncError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let project = Project {
            id: format!("p-{id}"),
            title: title.to_string(),
            owner_id: session.user_id.clone(),
            meta,
            created_at_ms: id as u64,
        };
        self.items.lock().unwrap().push(project.clone());
        Ok(project)
    }
}

// ---------------------------------------------------------------------------
// Console view sink
// ---------------------------------------------------------------------------

struct ConsoleSink;

impl ViewSink for ConsoleSink {
    async fn show_logged_in(&self, session: &Session) {
        println!("[view] dashboard for {session}");
    }

    async fn show_logged_out(&self, reason: &str) {
        println!("[view] login screen ({reason})");
    }

    async fn show_projects(&self, projects: &[Project]) {
        println!("[view] {} storyboard(s):", projects.len());
        for project in projects {
            println!("[view]   - {} ({})", project.title, project.id);
        }
    }

    async fn notify(&self, message: &str) {
        println!("[toast] {message}");
    }
}

// ---------------------------------------------------------------------------
// Walkthrough
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let (tx, rx) = mpsc::channel(16);

    let app = Arc::new(
        AppBuilder::new()
            .sign_in_budget(RetryBudget {
                max_attempts: 10,
                delay: Duration::from_millis(100),
            })
            .build(
                DemoIdentity::new(tx.clone()),
                MemoryProjects::new(),
                ConsoleSink,
                MemoryBackend::new(),
            ),
    );

    let runner = {
        let app = Arc::clone(&app);
        tokio::spawn(async move { app.run(rx).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    println!("--- wrong password first ---");
    app.login(DEMO_EMAIL, "letmein").await;

    println!("--- then the real one ---");
    app.login(DEMO_EMAIL, DEMO_PASSWORD).await;

    println!("--- two storyboards ---");
    app.create_project("Opening sequence", serde_json::json!({ "frames": 12 }))
        .await;
    app.create_project("Chase scene", serde_json::json!({ "frames": 30 }))
        .await;

    println!("--- sign out ---");
    app.logout().await;

    // Let the dispatcher drain the provider's events, then close the
    // stream so the run loop returns.
    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(tx);
    let _ = runner.await;

    println!("final state: {}", app.view_state().await);
}
