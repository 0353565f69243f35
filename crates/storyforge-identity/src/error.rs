//! Error types for the identity boundary.

/// Errors that can cross the identity-provider boundary.
///
/// The split matters to callers: a rejected credential must be surfaced
/// verbatim and never retried, while a transient query failure inside a
/// retry loop is logged and absorbed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IdentityError {
    /// The provider explicitly rejected the credentials (bad password,
    /// unconfirmed email, disabled account). The message is the
    /// provider's own and is shown to the user as-is.
    #[error("{0}")]
    CredentialsRejected(String),

    /// A session query failed. Transient by assumption: a retry loop
    /// treats this as "no session this attempt", not as logged-out.
    #[error("session query failed: {0}")]
    QueryFailed(String),

    /// Any other provider-side failure (network, 5xx, malformed reply).
    #[error("identity provider error: {0}")]
    Provider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_rejected_displays_message_verbatim() {
        // The user sees exactly what the provider said, no prefix.
        let err = IdentityError::CredentialsRejected("Invalid login credentials".into());
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[test]
    fn test_query_failed_display_includes_cause() {
        let err = IdentityError::QueryFailed("connection reset".into());
        assert_eq!(err.to_string(), "session query failed: connection reset");
    }
}
