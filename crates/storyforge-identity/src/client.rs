//! The identity-provider boundary trait.
//!
//! Storyforge doesn't implement authentication itself. That's the job of
//! a hosted identity backend (GoTrue, Firebase, Keycloak, a custom JWT
//! service). This module defines [`IdentityClient`]: the small set of
//! operations the sync stack needs from whatever provider the host wires
//! in.
//!
//! # Why a trait?
//!
//! The same reason the rest of the stack is generic over its boundaries:
//! production uses an HTTP-backed client, tests use a scripted stub that
//! can simulate session lag ("sign-in succeeded but get_session returns
//! nothing for the next 400 ms"), and no sync-layer code changes between
//! the two.
//!
//! # Error model
//!
//! Every method returns `Result`; none of them panic. Crucially,
//! `get_session` returning `Err` means "the query failed", NOT "the user
//! is logged out" — the resolver treats the two very differently, so the
//! distinction must survive this boundary intact.

use crate::{IdentityError, Session, UserInfo};

/// What a credential operation (sign-in, sign-up) hands back on success.
///
/// Both fields are optional because providers are eventually consistent
/// here: a sign-in can be accepted while the session takes another
/// moment to become observable, and a sign-up can create a user whose
/// session won't exist until email confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialGrant {
    /// The session, if the provider already resolved one. When present
    /// the caller can skip the retry loop entirely.
    pub session: Option<Session>,

    /// The user record, if the provider returned one.
    pub user: Option<UserInfo>,
}

/// Operations the identity provider must expose.
///
/// # Trait bounds
///
/// - `Send + Sync` → the client is shared behind an `Arc` between the
///   synchronizer and the credential flow.
/// - `'static` → it doesn't borrow temporary data; it lives as long as
///   the app.
///
/// # Example
///
/// ```rust
/// use storyforge_identity::{CredentialGrant, IdentityClient, IdentityError, Session};
///
/// /// A provider that is always logged out. Useful as a test baseline.
/// struct LoggedOutProvider;
///
/// impl IdentityClient for LoggedOutProvider {
///     async fn get_session(&self) -> Result<Option<Session>, IdentityError> {
///         Ok(None)
///     }
///
///     async fn sign_in_with_password(
///         &self,
///         _email: &str,
///         _password: &str,
///     ) -> Result<CredentialGrant, IdentityError> {
///         Err(IdentityError::CredentialsRejected("invalid login".into()))
///     }
///
///     async fn sign_up(
///         &self,
///         _email: &str,
///         _password: &str,
///         _redirect: &str,
///     ) -> Result<CredentialGrant, IdentityError> {
///         Err(IdentityError::Provider("sign-ups disabled".into()))
///     }
///
///     async fn sign_out(&self) -> Result<(), IdentityError> {
///         Ok(())
///     }
/// }
/// ```
pub trait IdentityClient: Send + Sync + 'static {
    /// Queries the provider's current session.
    ///
    /// # Returns
    /// - `Ok(Some(session))` — a session is observable right now
    /// - `Ok(None)` — the provider definitively has no session
    /// - `Err(_)` — the query itself failed (network, provider hiccup);
    ///   the caller must NOT conclude "logged out" from this
    async fn get_session(&self) -> Result<Option<Session>, IdentityError>;

    /// Signs in with email + password.
    ///
    /// `Err(IdentityError::CredentialsRejected)` means the provider
    /// rejected the credentials; retrying with the same values is never
    /// correct. `Ok` may still carry `session: None` (see
    /// [`CredentialGrant`]).
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CredentialGrant, IdentityError>;

    /// Creates a new account.
    ///
    /// `redirect` is the URL the confirmation email should send the user
    /// back to.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect: &str,
    ) -> Result<CredentialGrant, IdentityError>;

    /// Signs out, invalidating the provider's session.
    async fn sign_out(&self) -> Result<(), IdentityError>;
}
