//! Test doubles for [`IdentityGateway`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use keystone_core::IdentityError;

use crate::{AuthError, IdentityGateway, IdentityResult, SignInResult, User, UserRole};

/// A gateway backed by a fixed list of users with plaintext passwords.
#[derive(Default)]
pub struct StubGateway {
    accounts: Mutex<Vec<StubAccount>>,
    fail_with: Option<String>,
}

struct StubAccount {
    user: User,
    password: String,
    roles: Vec<String>,
}

impl StubGateway {
    /// An empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose every call fails with [`AuthError::Provider`].
    pub fn failing(message: &str) -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    /// Add an account.
    pub fn with_user(self, user: User, password: &str, roles: &[&str]) -> Self {
        self.accounts.lock().unwrap().push(StubAccount {
            user,
            password: password.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        });
        self
    }

    fn check(&self) -> Result<(), AuthError> {
        match &self.fail_with {
            Some(message) => Err(AuthError::Provider(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityGateway for StubGateway {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        self.check()?;
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .find(|a| a.user.email == email)
            .map(|a| a.user.clone()))
    }

    async fn password_sign_in(
        &self,
        user: &User,
        password: &str,
    ) -> Result<SignInResult, AuthError> {
        self.check()?;
        let accounts = self.accounts.lock().unwrap();
        let ok = accounts
            .iter()
            .any(|a| a.user.id == user.id && a.password == password);
        Ok(SignInResult { succeeded: ok })
    }

    async fn user_roles(&self, user: &User) -> Result<Vec<String>, AuthError> {
        self.check()?;
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .find(|a| a.user.id == user.id)
            .map(|a| a.roles.clone())
            .unwrap_or_default())
    }

    async fn create_user(&self, user: &User, password: &str) -> Result<IdentityResult, AuthError> {
        self.check()?;
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.user.email == user.email) {
            return Ok(IdentityResult::failed(vec![IdentityError::new(
                "DuplicateEmail",
                format!("Email '{}' is already taken.", user.email),
            )]));
        }
        accounts.push(StubAccount {
            user: user.clone(),
            password: password.to_string(),
            roles: Vec::new(),
        });
        Ok(IdentityResult::success())
    }

    async fn add_to_role(&self, user: &User, role: UserRole) -> Result<IdentityResult, AuthError> {
        self.check()?;
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.iter_mut().find(|a| a.user.id == user.id) {
            Some(account) => {
                account.roles.push(role.to_string());
                Ok(IdentityResult::success())
            }
            None => Ok(IdentityResult::failed(vec![IdentityError::new(
                "UserNotFound",
                "User does not exist.",
            )])),
        }
    }
}

/// Wraps another gateway and records which operations were called.
pub struct RecordingGateway<G> {
    inner: G,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl<G: IdentityGateway> RecordingGateway<G> {
    /// Wrap `inner`.
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the call log, readable after the gateway is moved.
    pub fn call_log(&self) -> Arc<Mutex<Vec<&'static str>>> {
        self.calls.clone()
    }

    /// Operations called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str) {
        self.calls.lock().unwrap().push(op);
    }
}

#[async_trait]
impl<G: IdentityGateway> IdentityGateway for RecordingGateway<G> {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        self.record("find_user_by_email");
        self.inner.find_user_by_email(email).await
    }

    async fn password_sign_in(
        &self,
        user: &User,
        password: &str,
    ) -> Result<SignInResult, AuthError> {
        self.record("password_sign_in");
        self.inner.password_sign_in(user, password).await
    }

    async fn user_roles(&self, user: &User) -> Result<Vec<String>, AuthError> {
        self.record("user_roles");
        self.inner.user_roles(user).await
    }

    async fn create_user(&self, user: &User, password: &str) -> Result<IdentityResult, AuthError> {
        self.record("create_user");
        self.inner.create_user(user, password).await
    }

    async fn add_to_role(&self, user: &User, role: UserRole) -> Result<IdentityResult, AuthError> {
        self.record("add_to_role");
        self.inner.add_to_role(user, role).await
    }
}

/// Wraps another gateway and holds every password check for `delay`.
///
/// Counts the checks that ran to completion, so tests can tell an abandoned
/// call from a finished one.
pub struct SlowGateway<G> {
    inner: G,
    delay: Duration,
    finished: Arc<AtomicUsize>,
}

impl<G: IdentityGateway> SlowGateway<G> {
    /// Wrap `inner`, delaying `password_sign_in` by `delay`.
    pub fn new(inner: G, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            finished: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of password checks that completed.
    pub fn finished(&self) -> Arc<AtomicUsize> {
        self.finished.clone()
    }
}

#[async_trait]
impl<G: IdentityGateway> IdentityGateway for SlowGateway<G> {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        self.inner.find_user_by_email(email).await
    }

    async fn password_sign_in(
        &self,
        user: &User,
        password: &str,
    ) -> Result<SignInResult, AuthError> {
        tokio::time::sleep(self.delay).await;
        let result = self.inner.password_sign_in(user, password).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        result
    }

    async fn user_roles(&self, user: &User) -> Result<Vec<String>, AuthError> {
        self.inner.user_roles(user).await
    }

    async fn create_user(&self, user: &User, password: &str) -> Result<IdentityResult, AuthError> {
        self.inner.create_user(user, password).await
    }

    async fn add_to_role(&self, user: &User, role: UserRole) -> Result<IdentityResult, AuthError> {
        self.inner.add_to_role(user, role).await
    }
}
