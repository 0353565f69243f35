//! View-state synchronization for Storyforge.
//!
//! This crate is the heart of the system: it converts an asynchronous,
//! eventually-consistent identity session into a consistent, debounced,
//! race-free answer to one question — *"am I logged in, and as whom?"* —
//! and keeps a rendered view in agreement with that answer.
//!
//! The moving parts:
//!
//! 1. **[`ViewState`]** — the single owned state value. Exactly one of
//!    `LoggedOut(reason)` or `LoggedIn(session)` is active; rendering is
//!    a pure function of it.
//! 2. **[`Synchronizer`]** — the only component allowed to write
//!    `ViewState`. Runs at most one resolution pass at a time
//!    (single-flight), so concurrent triggers collapse into one
//!    effective pass instead of interleaving partial renders.
//! 3. **[`AuthEventDispatcher`]** — classifies the provider's push
//!    notifications: events that carry a session render directly, the
//!    ambiguous ones trigger a synchronization pass.
//! 4. **[`CredentialFlow`]** — login/register/logout/create-project
//!    actions, including the post-login diagnostics that distinguish
//!    "your browser blocks storage" from "the provider hasn't converged".
//!
//! # Data flow
//!
//! ```text
//! IdentityClient events ──→ AuthEventDispatcher ──→ Synchronizer
//!                                                      │
//!                                     SessionResolver ─┤ (only when ambiguous)
//!                                                      ▼
//!                                                  ViewState ──→ ViewSink
//!                                                      │
//!                                        (on entering LoggedIn)
//!                                                      ▼
//!                                             ProjectsApi.list()
//! ```

#![allow(async_fn_in_trait)]

mod dispatcher;
mod error;
mod flow;
mod projects;
mod synchronizer;
mod view;

pub use dispatcher::AuthEventDispatcher;
pub use error::SyncError;
pub use flow::CredentialFlow;
pub use projects::{Project, ProjectsApi};
pub use synchronizer::Synchronizer;
pub use view::{ViewSink, ViewState};
