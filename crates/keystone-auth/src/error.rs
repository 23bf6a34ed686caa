//! Auth-specific error types.

use keystone_core::BadRequest;

/// Errors that can occur during authentication and account management.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The username/email does not resolve to a user.
    #[error("User not found.")]
    NotFound,

    /// Password verification failed for a resolved user.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// One or more validation or identity-operation failures.
    #[error("{0}")]
    BadRequest(#[from] BadRequest),

    /// The caller cancelled the operation before it completed.
    #[error("operation cancelled")]
    Cancelled,

    /// The identity provider itself failed (storage, hashing, transport).
    #[error("identity provider error: {0}")]
    Provider(String),
}

impl AuthError {
    /// Whether this error is the caller's fault (4xx) rather than ours (5xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::NotFound | AuthError::InvalidCredentials | AuthError::BadRequest(_)
        )
    }

    /// Whether this error should be reported as 401 Unauthorized.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AuthError::NotFound | AuthError::InvalidCredentials)
    }
}
