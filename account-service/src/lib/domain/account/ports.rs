use async_trait::async_trait;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::ChangeUsernameCommand;
use crate::domain::account::models::SignUpCommand;

/// Port for account and session operations exposed to inbound adapters.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn sign_up(&self, command: SignUpCommand) -> Result<Account, AccountError>;

    /// Verify credentials and open a session.
    ///
    /// # Returns
    /// Bearer token for the new session
    ///
    /// # Errors
    /// * `Auth(UserNotFound | IncorrectPassword)` - Credentials rejected
    /// * `Auth(CannotCreateToken)` - Session could not be recorded
    async fn sign_in(&self, username: &str, password: &str) -> Result<String, AccountError>;

    /// Replace a live token with a fresh one.
    ///
    /// # Errors
    /// * `Auth(CannotParseToken | ExpiredToken)` - Token is not live
    /// * `Auth(CannotCreateToken)` - Session could not be recorded
    async fn refresh_token(&self, token: &str) -> Result<String, AccountError>;

    /// Resolve a bearer token to the username it authenticates.
    ///
    /// # Errors
    /// * `Auth(CannotParseToken | ExpiredToken)` - Token is not live
    async fn authenticate(&self, token: &str) -> Result<String, AccountError>;

    /// Close the session of an authenticated user.
    ///
    /// # Errors
    /// * `Auth(CannotRevokeSession)` - Session store delete failed
    async fn sign_out(&self, username: &str) -> Result<(), AccountError>;

    /// Retrieve an account by username.
    ///
    /// # Errors
    /// * `NotFound` - No account with this username
    /// * `DatabaseError` - Database operation failed
    async fn get_account(&self, username: &str) -> Result<Account, AccountError>;

    /// Rename an account after verifying its password; the session is revoked.
    ///
    /// # Errors
    /// * `Auth(UserNotFound | IncorrectPassword)` - Credentials rejected
    /// * `Auth(CannotUpdateUser)` - Rename or revocation failed
    async fn change_username(&self, command: ChangeUsernameCommand) -> Result<(), AccountError>;

    /// Delete an account after verifying its password; the session is revoked.
    ///
    /// # Errors
    /// * `Auth(UserNotFound | IncorrectPassword)` - Credentials rejected
    /// * `Auth(CannotDeleteUser)` - Deletion or revocation failed
    async fn delete_account(&self, username: &str, password: &str) -> Result<(), AccountError>;
}

/// Persistence operations for the account aggregate.
///
/// Credential lookup, rename and deletion go through [`auth::CredentialStore`],
/// which every account repository also implements.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist new account to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve account by username.
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AccountError>;
}
