//! Identity types and the identity-provider boundary for Storyforge.
//!
//! This crate defines the vocabulary the rest of the stack speaks:
//!
//! 1. **Session values** — who is logged in ([`Session`], [`UserInfo`])
//! 2. **Auth events** — the provider's push notifications ([`AuthEvent`])
//! 3. **The provider boundary** — credential operations and the session
//!    query ([`IdentityClient`] trait)
//!
//! # How it fits in the stack
//!
//! ```text
//! Sync Layer (above)      ← turns sessions/events into view state
//!     ↕
//! Resolver Layer          ← polls get_session() with bounded retries
//!     ↕
//! Identity Layer (this crate)  ← types + the provider trait
//! ```
//!
//! Storyforge does not implement an identity provider. The host supplies
//! one by implementing [`IdentityClient`] — a hosted auth backend in
//! production, a scripted stub in tests.

#![allow(async_fn_in_trait)]

mod client;
mod error;
mod event;
mod session;

pub use client::{CredentialGrant, IdentityClient};
pub use error::IdentityError;
pub use event::{AuthEvent, AuthEventKind};
pub use session::{Session, UserInfo};
