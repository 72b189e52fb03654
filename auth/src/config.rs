use std::time::Duration;

use thiserror::Error;

/// Error raised when the process-wide auth configuration is unusable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Token sign key must not be empty")]
    EmptySignKey,
}

/// Process-wide secrets and token lifetime.
///
/// Built once at startup and moved into the [`SessionAuthority`](crate::SessionAuthority).
/// Every value is constant for the lifetime of the process.
#[derive(Clone)]
pub struct AuthConfig {
    /// Symmetric key used to sign bearer tokens.
    pub sign_key: String,
    /// Secret mixed into every password digest, never stored alongside hashes.
    pub hash_secret: String,
    /// Validity window of a token and TTL of the matching session record.
    pub token_ttl: Duration,
}

impl AuthConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    /// * `sign_key` - Token signing key
    /// * `hash_secret` - Password hashing secret
    /// * `token_ttl` - Token validity window
    pub fn new(
        sign_key: impl Into<String>,
        hash_secret: impl Into<String>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            sign_key: sign_key.into(),
            hash_secret: hash_secret.into(),
            token_ttl,
        }
    }

    /// Check the configuration is usable for signing.
    ///
    /// A zero TTL is accepted: every token it produces is born expired.
    ///
    /// # Errors
    /// * `EmptySignKey` - No signing key was supplied
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sign_key.is_empty() {
            return Err(ConfigError::EmptySignKey);
        }
        Ok(())
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("sign_key", &"<redacted>")
            .field("hash_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}
