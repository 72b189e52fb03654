use async_trait::async_trait;
use thiserror::Error;

/// Error reported by a credential store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialStoreError {
    #[error("Credential not found")]
    NotFound,

    #[error("Username already taken")]
    AlreadyExists,

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

/// Read/write access to stored credentials, keyed by username.
///
/// The session authority never mutates a credential directly; it reads
/// password hashes for verification and delegates renames and deletions.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Look up the stored password hash for a username.
    ///
    /// # Returns
    /// `Some(hash)` when the user exists, `None` otherwise
    ///
    /// # Errors
    /// * `Unavailable` - Backend could not be reached
    async fn lookup_credential(&self, username: &str)
        -> Result<Option<String>, CredentialStoreError>;

    /// Move a credential from `old` to `new` username.
    ///
    /// # Errors
    /// * `NotFound` - No credential under `old`
    /// * `AlreadyExists` - `new` is already taken
    /// * `Unavailable` - Backend could not be reached
    async fn persist_username_change(&self, old: &str, new: &str)
        -> Result<(), CredentialStoreError>;

    /// Remove the credential for a username.
    ///
    /// # Errors
    /// * `NotFound` - No credential under `username`
    /// * `Unavailable` - Backend could not be reached
    async fn delete_credential(&self, username: &str) -> Result<(), CredentialStoreError>;
}
