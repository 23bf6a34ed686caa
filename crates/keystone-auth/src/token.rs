//! Access-token issuance.

use uuid::Uuid;

use crate::User;

/// Issues opaque access tokens for authenticated users.
///
/// Swap in a signed-token implementation here without touching the login
/// flow; callers only see the token string.
pub trait TokenIssuer: Send + Sync {
    /// Issue a fresh token for `user`.
    fn issue(&self, user: &User) -> String;
}

/// Issues a random v4 UUID per call. No claims, no signature.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidTokenIssuer;

impl TokenIssuer for UuidTokenIssuer {
    fn issue(&self, _user: &User) -> String {
        Uuid::new_v4().to_string()
    }
}
