use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthConfig;
use auth::ConfigError;
use auth::CredentialStore;
use auth::SaltedSha256Hasher;
use auth::SessionAuthority;
use auth::SessionStore;
use chrono::Utc;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::ChangeUsernameCommand;
use crate::domain::account::models::SignUpCommand;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::AccountServicePort;

/// Domain service implementation for account operations.
///
/// Registration and profile reads go to the repository; everything touching
/// credentials or sessions is delegated to the session authority.
pub struct AccountService<R, S>
where
    R: AccountRepository + CredentialStore,
    S: SessionStore,
{
    repository: Arc<R>,
    authority: SessionAuthority<R, S, SaltedSha256Hasher>,
}

impl<R, S> AccountService<R, S>
where
    R: AccountRepository + CredentialStore,
    S: SessionStore,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `config` - Process-wide secrets and token TTL
    /// * `repository` - Account persistence and credential store
    /// * `sessions` - Session store
    ///
    /// # Errors
    /// * `EmptySignKey` - Configuration has no signing key
    pub fn new(
        config: AuthConfig,
        repository: Arc<R>,
        sessions: Arc<S>,
    ) -> Result<Self, ConfigError> {
        let authority =
            SessionAuthority::with_salted_hasher(config, Arc::clone(&repository), sessions)?;

        Ok(Self {
            repository,
            authority,
        })
    }
}

#[async_trait]
impl<R, S> AccountServicePort for AccountService<R, S>
where
    R: AccountRepository + CredentialStore,
    S: SessionStore,
{
    async fn sign_up(&self, command: SignUpCommand) -> Result<Account, AccountError> {
        let account = Account {
            id: AccountId::new(),
            username: command.username,
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            password_hash: self.authority.hash_password(&command.password),
            created_at: Utc::now(),
        };

        let created = self.repository.create(account).await?;
        tracing::info!(username = %created.username, account_id = %created.id, "Account created");

        Ok(created)
    }

    async fn sign_in(&self, username: &str, password: &str) -> Result<String, AccountError> {
        Ok(self.authority.issue_token(username, password).await?)
    }

    async fn refresh_token(&self, token: &str) -> Result<String, AccountError> {
        Ok(self.authority.refresh_token(token).await?)
    }

    async fn authenticate(&self, token: &str) -> Result<String, AccountError> {
        Ok(self.authority.validate_token(token).await?)
    }

    async fn sign_out(&self, username: &str) -> Result<(), AccountError> {
        Ok(self.authority.revoke_session(username).await?)
    }

    async fn get_account(&self, username: &str) -> Result<Account, AccountError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or(AccountError::NotFound(username.to_string()))
    }

    async fn change_username(&self, command: ChangeUsernameCommand) -> Result<(), AccountError> {
        Ok(self
            .authority
            .change_username(
                &command.username,
                command.new_username.as_str(),
                &command.password,
            )
            .await?)
    }

    async fn delete_account(&self, username: &str, password: &str) -> Result<(), AccountError> {
        Ok(self.authority.delete_account(username, password).await?)
    }
}
