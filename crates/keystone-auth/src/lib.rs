//! Authentication use cases for Keystone.
//!
//! Provides:
//! - [`IdentityGateway`]: Trait over the external identity provider (implement per provider)
//! - [`LoginUseCase`]: Verifies credentials and issues an access token
//! - [`CreateUserUseCase`]: Validates and registers a new account
//! - [`TokenIssuer`]: Pluggable access-token generation
//! - [`AuthError`]: Auth-specific error types

mod create_user;
mod error;
mod login;
mod token;
mod user;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

use async_trait::async_trait;
use std::future::Future;
use tokio_util::sync::CancellationToken;

pub use create_user::{CreateUserCommand, CreateUserResult, CreateUserUseCase};
pub use error::AuthError;
pub use login::{LoginRequest, LoginResponse, LoginUseCase, ACCESS_TOKEN_LIFETIME};
pub use token::{TokenIssuer, UuidTokenIssuer};
pub use user::{IdentityResult, SignInResult, User, UserRole};

/// Capability interface over the identity provider.
///
/// The provider owns user persistence and password verification; the use
/// cases in this crate only orchestrate calls to it. Infrastructure failures
/// are reported as [`AuthError::Provider`]; "no such user" and "wrong
/// password" are ordinary results, not errors.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Look up a user by email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Check `password` against the stored credentials of `user`.
    async fn password_sign_in(&self, user: &User, password: &str)
        -> Result<SignInResult, AuthError>;

    /// Role names assigned to `user`, in provider order.
    async fn user_roles(&self, user: &User) -> Result<Vec<String>, AuthError>;

    /// Register `user` with the given password.
    async fn create_user(&self, user: &User, password: &str) -> Result<IdentityResult, AuthError>;

    /// Assign `role` to an existing user.
    async fn add_to_role(&self, user: &User, role: UserRole) -> Result<IdentityResult, AuthError>;
}

/// Await `fut` unless `cancel` fires first.
async fn until_cancelled<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, AuthError>
where
    F: Future<Output = Result<T, AuthError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AuthError::Cancelled),
        result = fut => result,
    }
}
