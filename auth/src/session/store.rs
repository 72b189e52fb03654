use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Key prefix for per-user session records.
pub const SESSION_KEY_PREFIX: &str = "session:";

/// Build the session store key for a username.
pub fn session_key(username: &str) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, username)
}

/// Error reported by a session store backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionStoreError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Key/value store with per-key expiry.
///
/// Single-key reads and writes must be atomic; no cross-key transactions
/// are required.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Store `value` under `key`, replacing any previous value, for `ttl`.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), SessionStoreError>;

    /// Read the live value under `key`.
    ///
    /// # Returns
    /// `None` when the key is absent or its TTL has elapsed
    async fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;

    /// Remove `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), SessionStoreError>;
}
