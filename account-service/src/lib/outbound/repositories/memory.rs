use std::collections::HashMap;

use async_trait::async_trait;
use auth::CredentialStore;
use auth::CredentialStoreError;
use tokio::sync::RwLock;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;

/// Account repository held in process memory, keyed by username.
///
/// Used when no database is configured and by the integration tests.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(account.username.as_str()) {
            return Err(AccountError::UsernameAlreadyExists(
                account.username.as_str().to_string(),
            ));
        }
        if accounts
            .values()
            .any(|existing| existing.email == account.email)
        {
            return Err(AccountError::EmailAlreadyExists(
                account.email.as_str().to_string(),
            ));
        }

        accounts.insert(account.username.as_str().to_string(), account.clone());
        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.read().await.get(username).cloned())
    }
}

#[async_trait]
impl CredentialStore for InMemoryAccountRepository {
    async fn lookup_credential(
        &self,
        username: &str,
    ) -> Result<Option<String>, CredentialStoreError> {
        Ok(self
            .accounts
            .read()
            .await
            .get(username)
            .map(|account| account.password_hash.clone()))
    }

    async fn persist_username_change(
        &self,
        old: &str,
        new: &str,
    ) -> Result<(), CredentialStoreError> {
        let new_username = Username::new(new.to_string())
            .map_err(|e| CredentialStoreError::Unavailable(e.to_string()))?;
        let mut accounts = self.accounts.write().await;

        if old == new {
            return if accounts.contains_key(old) {
                Ok(())
            } else {
                Err(CredentialStoreError::NotFound)
            };
        }
        if accounts.contains_key(new) {
            return Err(CredentialStoreError::AlreadyExists);
        }
        let mut account = accounts.remove(old).ok_or(CredentialStoreError::NotFound)?;
        account.username = new_username;
        accounts.insert(new.to_string(), account);

        Ok(())
    }

    async fn delete_credential(&self, username: &str) -> Result<(), CredentialStoreError> {
        self.accounts
            .write()
            .await
            .remove(username)
            .map(|_| ())
            .ok_or(CredentialStoreError::NotFound)
    }
}
