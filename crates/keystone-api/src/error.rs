//! Error types for keystone-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use keystone_auth::AuthError;
use thiserror::Error;

/// Result type alias for keystone-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while starting or running the server
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from keystone-core (configuration, files)
    #[error("Core error: {0}")]
    Core(#[from] keystone_core::Error),

    /// Error from keystone-auth (e.g. seeding users)
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Socket or listener failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    Logging(String),
}

/// A failure returned to an HTTP client.
///
/// This is the only place where auth failures are mapped to status codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 401: unknown user or wrong password.
    Unauthorized(String),
    /// 400: validation or identity-provider rejection.
    BadRequest(String),
    /// 503: the request was cancelled before it finished.
    Unavailable(String),
    /// 500: anything on our side.
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body.
    ///
    /// Internal details are never sent to the client.
    pub fn client_message(&self) -> &str {
        match self {
            ApiError::Unauthorized(msg) | ApiError::BadRequest(msg) | ApiError::Unavailable(msg) => {
                msg
            }
            ApiError::Internal(_) => "Internal server error.",
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotFound | AuthError::InvalidCredentials => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::BadRequest(bad) => ApiError::BadRequest(bad.message().to_string()),
            AuthError::Cancelled => ApiError::Unavailable("Request was cancelled.".to_string()),
            AuthError::Provider(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!("Request failed: {detail}");
        }
        let body = serde_json::json!({ "message": self.client_message() });
        (self.status_code(), Json(body)).into_response()
    }
}
