//! The login flow: lookup, verify, issue, collect roles.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use keystone_core::{Clock, SystemClock};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{until_cancelled, AuthError, IdentityGateway, TokenIssuer, UuidTokenIssuer};

/// How long an issued access token is valid (1 hour).
pub const ACCESS_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Credentials submitted by a client.
#[derive(Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    /// Login name; matched against the user's email.
    pub username: String,
    /// Plaintext password, handed straight to the identity provider.
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What a successful login returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Opaque access token.
    pub access_token: String,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// `issued_at` plus [`ACCESS_TOKEN_LIFETIME`].
    pub expiration_date: DateTime<Utc>,
    /// Role names, in the order the identity provider returned them.
    pub roles: Vec<String>,
}

/// Authenticates a user and issues an access token.
#[derive(Clone)]
pub struct LoginUseCase {
    gateway: Arc<dyn IdentityGateway>,
    tokens: Arc<dyn TokenIssuer>,
    clock: Arc<dyn Clock>,
}

impl LoginUseCase {
    /// Create a login use case with UUID tokens and the system clock.
    pub fn new(gateway: Arc<dyn IdentityGateway>) -> Self {
        Self {
            gateway,
            tokens: Arc::new(UuidTokenIssuer),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the token issuer.
    pub fn with_token_issuer(mut self, tokens: Arc<dyn TokenIssuer>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run one login attempt.
    ///
    /// Fails with [`AuthError::NotFound`] if no user has this email and
    /// [`AuthError::InvalidCredentials`] if the password is rejected. Each
    /// success issues a new token. If `cancel` fires while a gateway call is
    /// pending, returns [`AuthError::Cancelled`] and issues nothing.
    pub async fn execute(
        &self,
        request: &LoginRequest,
        cancel: &CancellationToken,
    ) -> Result<LoginResponse, AuthError> {
        log::debug!("Login attempt for {}", request.username);

        let user = until_cancelled(cancel, self.gateway.find_user_by_email(&request.username))
            .await?
            .ok_or_else(|| {
                log::warn!("Login rejected: no user for {}", request.username);
                AuthError::NotFound
            })?;

        let sign_in = until_cancelled(
            cancel,
            self.gateway.password_sign_in(&user, &request.password),
        )
        .await?;
        if !sign_in.succeeded {
            log::warn!("Login rejected: bad password for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(&user);
        let issued_at = self.clock.now();
        let expiration_date = issued_at + token_lifetime();

        let roles = until_cancelled(cancel, self.gateway.user_roles(&user)).await?;

        log::info!("User {} logged in with {} role(s)", user.id, roles.len());

        Ok(LoginResponse {
            access_token,
            issued_at,
            expiration_date,
            roles,
        })
    }
}

fn token_lifetime() -> TimeDelta {
    TimeDelta::seconds(ACCESS_TOKEN_LIFETIME.as_secs() as i64)
}
