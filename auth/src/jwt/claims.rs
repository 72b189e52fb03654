use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Claim set carried by a bearer token.
///
/// Immutable once minted: a new token for the same user is a new claim set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Authenticated username
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Unique token identifier, so two logins in the same second differ
    pub jti: String,
}

impl TokenClaims {
    /// Create claims for a user issued now and valid for `ttl`.
    ///
    /// # Arguments
    /// * `username` - Username to embed
    /// * `ttl` - Validity window
    ///
    /// # Returns
    /// Claims with iat = now and exp = now + ttl
    pub fn for_user(username: impl Into<String>, ttl: Duration) -> Self {
        Self::issued_at(username, Utc::now().timestamp(), ttl)
    }

    /// Create claims with an explicit issue timestamp.
    pub fn issued_at(username: impl Into<String>, iat: i64, ttl: Duration) -> Self {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            username: username.into(),
            iat,
            exp: iat.saturating_add(ttl_secs),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
