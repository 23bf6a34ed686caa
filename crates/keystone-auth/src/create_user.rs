//! Account registration.

use std::fmt;
use std::sync::Arc;

use keystone_core::{BadRequest, ValidationFailure};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{until_cancelled, AuthError, IdentityGateway, User, UserRole};

/// Input for registering a new account.
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserCommand {
    /// Email address; becomes the login name.
    pub email: String,
    /// Display handle.
    pub user_name: String,
    /// Full name.
    pub name: String,
    /// Plaintext password.
    pub password: String,
    /// Must equal `password`.
    pub password_confirmation: String,
    /// Role to assign once the account exists.
    #[serde(default)]
    pub role: UserRole,
}

impl fmt::Debug for CreateUserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserCommand")
            .field("email", &self.email)
            .field("user_name", &self.user_name)
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl CreateUserCommand {
    /// Check the command's fields, returning every failure found.
    pub fn validate(&self) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        if self.email.trim().is_empty() {
            failures.push(ValidationFailure::new("email", "Email is required"));
        } else if !self.email.contains('@') {
            failures.push(ValidationFailure::new("email", "Email is not a valid address"));
        }
        if self.user_name.trim().is_empty() {
            failures.push(ValidationFailure::new("userName", "User name is required"));
        }
        if self.name.trim().is_empty() {
            failures.push(ValidationFailure::new("name", "Name is required"));
        }
        if self.password.is_empty() {
            failures.push(ValidationFailure::new("password", "Password is required"));
        }
        if self.password != self.password_confirmation {
            failures.push(ValidationFailure::new(
                "passwordConfirmation",
                "Password confirmation does not match password",
            ));
        }

        failures
    }
}

/// The account that was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResult {
    /// New user's identifier.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Display handle.
    pub user_name: String,
    /// Full name.
    pub name: String,
}

/// Validates a [`CreateUserCommand`] and registers the account.
#[derive(Clone)]
pub struct CreateUserUseCase {
    gateway: Arc<dyn IdentityGateway>,
}

impl CreateUserUseCase {
    /// Create the use case over `gateway`.
    pub fn new(gateway: Arc<dyn IdentityGateway>) -> Self {
        Self { gateway }
    }

    /// Register a new account.
    ///
    /// Validation failures and provider rejections are both reported as
    /// [`AuthError::BadRequest`] with one formatted line per problem.
    ///
    /// The two provider calls are not atomic. If role assignment fails or
    /// `cancel` fires after the account is created, the account stays
    /// stored without a role and a retry reports the email as taken.
    pub async fn execute(
        &self,
        command: &CreateUserCommand,
        cancel: &CancellationToken,
    ) -> Result<CreateUserResult, AuthError> {
        let failures = command.validate();
        if !failures.is_empty() {
            log::debug!("Create user rejected with {} validation failure(s)", failures.len());
            return Err(BadRequest::from_validation_failures(&failures).into());
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: command.email.trim().to_string(),
            user_name: command.user_name.trim().to_string(),
            name: command.name.trim().to_string(),
        };

        let created =
            until_cancelled(cancel, self.gateway.create_user(&user, &command.password)).await?;
        if !created.succeeded {
            return Err(BadRequest::from_identity_errors(&created.errors).into());
        }

        let assigned = until_cancelled(cancel, self.gateway.add_to_role(&user, command.role)).await?;
        if !assigned.succeeded {
            return Err(BadRequest::from_identity_errors(&assigned.errors).into());
        }

        log::info!("Created user {} with role {}", user.id, command.role);

        Ok(CreateUserResult {
            id: user.id,
            email: user.email,
            user_name: user.user_name,
            name: user.name,
        })
    }
}
