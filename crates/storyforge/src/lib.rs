//! # Storyforge
//!
//! A client-side session-synchronization engine: it keeps a rendered UI
//! in agreement with an asynchronous, eventually-consistent identity
//! session, across unreliable storage, racy auth events, and retry
//! timing.
//!
//! The host supplies four collaborators (all traits):
//!
//! - an [`IdentityClient`] — the identity provider,
//! - a [`StorageBackend`] — the durable key-value substrate,
//! - a [`ProjectsApi`] — the dependent-data CRUD boundary,
//! - a [`ViewSink`] — wherever the view state gets rendered.
//!
//! Storyforge wires them into a state machine with one owned
//! [`ViewState`], a single-flight synchronizer, a bounded-retry session
//! resolver, and a dispatcher for the provider's push events.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use storyforge::prelude::*;
//!
//! // Implement the four boundary traits for your host, then:
//! // let (events_tx, events_rx) = tokio::sync::mpsc::channel(16);
//! // let app = AppBuilder::new()
//! //     .redirect("https://studio.example/")
//! //     .build(my_client, my_api, my_view, my_backend);
//! // app.run(events_rx).await;
//! ```

mod app;
mod error;

pub use app::{App, AppBuilder};
pub use error::StoryforgeError;

pub use storyforge_identity::{
    AuthEvent, AuthEventKind, CredentialGrant, IdentityClient, IdentityError, Session, UserInfo,
};
pub use storyforge_resolver::{RetryBudget, SessionResolver};
pub use storyforge_store::{MemoryBackend, SessionStore, StorageBackend, StorageError};
pub use storyforge_sync::{
    AuthEventDispatcher, CredentialFlow, Project, ProjectsApi, SyncError, Synchronizer, ViewSink,
    ViewState,
};

/// The common imports for hosts embedding Storyforge.
pub mod prelude {
    pub use crate::app::{App, AppBuilder};
    pub use crate::error::StoryforgeError;
    pub use storyforge_identity::{
        AuthEvent, AuthEventKind, CredentialGrant, IdentityClient, IdentityError, Session,
        UserInfo,
    };
    pub use storyforge_resolver::RetryBudget;
    pub use storyforge_store::{MemoryBackend, StorageBackend, StorageError};
    pub use storyforge_sync::{Project, ProjectsApi, SyncError, ViewSink, ViewState};
}
