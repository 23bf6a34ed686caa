//! User identity and the results the identity provider reports.

use std::fmt;
use std::str::FromStr;

use keystone_core::IdentityError;
use serde::{Deserialize, Serialize};

/// A user as known to the identity provider.
///
/// The auth flows only rely on `id` and `email`; the rest is carried along
/// for account creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Provider-assigned unique identifier.
    pub id: String,
    /// The user's email address, used as the login name.
    pub email: String,
    /// Display handle.
    pub user_name: String,
    /// Full name.
    pub name: String,
}

/// Roles a user can be assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// Back-office administrator.
    Admin,
    /// Regular customer account.
    #[default]
    Customer,
}

impl UserRole {
    /// The role name as stored by the identity provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Customer => "Customer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(UserRole::Admin),
            "Customer" => Ok(UserRole::Customer),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Outcome of a password check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignInResult {
    /// Whether the password matched.
    pub succeeded: bool,
}

impl SignInResult {
    /// A successful sign-in.
    pub fn success() -> Self {
        Self { succeeded: true }
    }

    /// A rejected sign-in.
    pub fn failed() -> Self {
        Self { succeeded: false }
    }
}

/// Outcome of an identity mutation (create user, add to role).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentityResult {
    /// Whether the mutation was applied.
    pub succeeded: bool,
    /// Why it was not, in provider order.
    pub errors: Vec<IdentityError>,
}

impl IdentityResult {
    /// A successful result with no errors.
    pub fn success() -> Self {
        Self {
            succeeded: true,
            errors: Vec::new(),
        }
    }

    /// A failed result carrying the given errors.
    pub fn failed(errors: Vec<IdentityError>) -> Self {
        Self {
            succeeded: false,
            errors,
        }
    }
}
