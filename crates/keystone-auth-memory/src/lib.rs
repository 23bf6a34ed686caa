//! In-process identity provider for Keystone.
//!
//! Implements [`keystone_auth::IdentityGateway`] over an in-memory store:
//! - Case-insensitive email lookup
//! - Argon2 password hashes, computed off the async runtime
//! - Ordered role assignment
//!
//! Suitable for local development, seeded test fixtures, and single-node
//! deployments where accounts come from configuration.

use std::fmt;
use std::sync::RwLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use keystone_auth::{AuthError, IdentityGateway, IdentityResult, SignInResult, User, UserRole};
use keystone_core::IdentityError;

/// Shortest password the provider accepts.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// An account to create at startup.
#[derive(Clone, Deserialize)]
pub struct SeedUser {
    /// Email address (login name).
    pub email: String,
    /// Display handle.
    pub user_name: String,
    /// Full name.
    #[serde(default)]
    pub name: String,
    /// Plaintext password; hashed on insert.
    pub password: String,
    /// Roles to assign, in order.
    #[serde(default)]
    pub roles: Vec<UserRole>,
}

impl fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedUser")
            .field("email", &self.email)
            .field("user_name", &self.user_name)
            .field("name", &self.name)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// A stored account.
struct Account {
    user: User,
    password_hash: String,
    roles: Vec<String>,
}

/// Identity provider that keeps accounts in memory.
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryIdentityProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> Result<usize, AuthError> {
        Ok(self.read()?.len())
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> Result<bool, AuthError> {
        Ok(self.read()?.is_empty())
    }

    /// Create a seed account and assign its roles.
    ///
    /// Provider rejections (duplicate email, short password) are returned
    /// as [`AuthError::BadRequest`].
    pub async fn seed(&self, seed: &SeedUser) -> Result<User, AuthError> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: seed.email.clone(),
            user_name: seed.user_name.clone(),
            name: seed.name.clone(),
        };

        let created = self.create_user(&user, &seed.password).await?;
        if !created.succeeded {
            return Err(keystone_core::BadRequest::from_identity_errors(&created.errors).into());
        }

        for role in &seed.roles {
            let assigned = self.add_to_role(&user, *role).await?;
            if !assigned.succeeded {
                return Err(keystone_core::BadRequest::from_identity_errors(&assigned.errors).into());
            }
        }

        log::info!("Seeded user {} with {} role(s)", user.email, seed.roles.len());
        Ok(user)
    }

    /// Problems that would prevent `user` from being stored.
    fn creation_errors(&self, user: &User, password: &str) -> Result<Vec<IdentityError>, AuthError> {
        let mut errors = duplicate_errors(&self.read()?, user);
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(IdentityError::new(
                "PasswordTooShort",
                format!("Passwords must be at least {MIN_PASSWORD_LENGTH} characters."),
            ));
        }
        Ok(errors)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Account>>, AuthError> {
        self.accounts
            .read()
            .map_err(|e| AuthError::Provider(format!("account store poisoned: {e}")))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Account>>, AuthError> {
        self.accounts
            .write()
            .map_err(|e| AuthError::Provider(format!("account store poisoned: {e}")))
    }
}

#[async_trait]
impl IdentityGateway for InMemoryIdentityProvider {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let accounts = self.read()?;
        Ok(accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email))
            .map(|a| a.user.clone()))
    }

    async fn password_sign_in(
        &self,
        user: &User,
        password: &str,
    ) -> Result<SignInResult, AuthError> {
        let stored = {
            let accounts = self.read()?;
            accounts
                .iter()
                .find(|a| a.user.id == user.id)
                .map(|a| a.password_hash.clone())
        };

        let Some(hash) = stored else {
            log::debug!("Sign-in for unknown user id {}", user.id);
            return Ok(SignInResult::failed());
        };

        let password = password.to_string();
        let succeeded = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Provider(format!("password verification task failed: {e}")))??;

        Ok(SignInResult { succeeded })
    }

    async fn user_roles(&self, user: &User) -> Result<Vec<String>, AuthError> {
        let accounts = self.read()?;
        Ok(accounts
            .iter()
            .find(|a| a.user.id == user.id)
            .map(|a| a.roles.clone())
            .unwrap_or_default())
    }

    async fn create_user(&self, user: &User, password: &str) -> Result<IdentityResult, AuthError> {
        let errors = self.creation_errors(user, password)?;
        if !errors.is_empty() {
            return Ok(IdentityResult::failed(errors));
        }

        let plain = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&plain))
            .await
            .map_err(|e| AuthError::Provider(format!("password hashing task failed: {e}")))??;

        let mut accounts = self.write()?;
        // The read lock was released while hashing; re-check under the write lock.
        let duplicates = duplicate_errors(&accounts, user);
        if !duplicates.is_empty() {
            return Ok(IdentityResult::failed(duplicates));
        }

        accounts.push(Account {
            user: user.clone(),
            password_hash,
            roles: Vec::new(),
        });
        log::debug!("Stored user {}", user.id);

        Ok(IdentityResult::success())
    }

    async fn add_to_role(&self, user: &User, role: UserRole) -> Result<IdentityResult, AuthError> {
        let mut accounts = self.write()?;
        let Some(account) = accounts.iter_mut().find(|a| a.user.id == user.id) else {
            return Ok(IdentityResult::failed(vec![IdentityError::new(
                "UserNotFound",
                format!("User '{}' does not exist.", user.email),
            )]));
        };

        let name = role.as_str();
        if !account.roles.iter().any(|r| r == name) {
            account.roles.push(name.to_string());
        }

        Ok(IdentityResult::success())
    }
}

/// Email and user-name collisions between `user` and the stored accounts.
fn duplicate_errors(accounts: &[Account], user: &User) -> Vec<IdentityError> {
    let mut errors = Vec::new();
    if accounts
        .iter()
        .any(|a| a.user.email.eq_ignore_ascii_case(&user.email))
    {
        errors.push(IdentityError::new(
            "DuplicateEmail",
            format!("Email '{}' is already taken.", user.email),
        ));
    }
    if accounts.iter().any(|a| a.user.user_name == user.user_name) {
        errors.push(IdentityError::new(
            "DuplicateUserName",
            format!("Username '{}' is already taken.", user.user_name),
        ));
    }
    errors
}

/// Hash `password` into an argon2 PHC string.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Provider(format!("password hashing failed: {e}")))
}

/// Check `password` against a stored PHC string.
fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthError::Provider(format!("stored password hash is invalid: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
