use std::sync::Arc;
use std::time::Duration;

use super::errors::AuthError;
use super::store::session_key;
use super::store::SessionStore;
use super::store::SessionStoreError;
use crate::config::AuthConfig;
use crate::config::ConfigError;
use crate::credentials::CredentialStore;
use crate::credentials::CredentialStoreError;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::password::PasswordHasher;
use crate::password::SaltedSha256Hasher;

/// Issues, validates and revokes bearer tokens backed by a session store.
///
/// Tokens are self-contained signed claim sets, but a token is only accepted
/// while the session store still holds the identical string under its
/// username. At most one session is live per username: issuing a new token
/// overwrites the previous record, and revoking deletes it.
///
/// The authority keeps no mutable state of its own; all coordination lives
/// in the session store, so operations may run concurrently. Concurrent
/// logins for one user race on the store write and the last writer wins.
pub struct SessionAuthority<C, S, H>
where
    C: CredentialStore,
    S: SessionStore,
    H: PasswordHasher,
{
    credentials: Arc<C>,
    sessions: Arc<S>,
    hasher: H,
    codec: TokenCodec,
    token_ttl: Duration,
}

impl<C, S> SessionAuthority<C, S, SaltedSha256Hasher>
where
    C: CredentialStore,
    S: SessionStore,
{
    /// Create an authority using the salted SHA-256 hasher keyed by `config.hash_secret`.
    ///
    /// # Errors
    /// * `EmptySignKey` - Configuration has no signing key
    pub fn with_salted_hasher(
        config: AuthConfig,
        credentials: Arc<C>,
        sessions: Arc<S>,
    ) -> Result<Self, ConfigError> {
        let hasher = SaltedSha256Hasher::new(config.hash_secret.clone());
        Self::new(config, credentials, sessions, hasher)
    }
}

impl<C, S, H> SessionAuthority<C, S, H>
where
    C: CredentialStore,
    S: SessionStore,
    H: PasswordHasher,
{
    /// Create a new session authority with injected dependencies.
    ///
    /// # Arguments
    /// * `config` - Process-wide secrets and token TTL
    /// * `credentials` - Credential lookup and mutation
    /// * `sessions` - Key/value store with expiry
    /// * `hasher` - Password hasher
    ///
    /// # Errors
    /// * `EmptySignKey` - Configuration has no signing key
    pub fn new(
        config: AuthConfig,
        credentials: Arc<C>,
        sessions: Arc<S>,
        hasher: H,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            credentials,
            sessions,
            hasher,
            codec: TokenCodec::new(config.sign_key.as_bytes()),
            token_ttl: config.token_ttl,
        })
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> String {
        self.hasher.hash(password)
    }

    /// Verify credentials, mint a token and record it as the user's session.
    ///
    /// Any previous session for the user is superseded.
    ///
    /// # Errors
    /// * `UserNotFound` - No credential for `username`
    /// * `IncorrectPassword` - Password mismatch or credential lookup failure
    /// * `CannotCreateToken` - Signing or session store write failed
    pub async fn issue_token(&self, username: &str, password: &str) -> Result<String, AuthError> {
        self.verify_password(username, password).await?;
        self.start_session(username).await
    }

    /// Authenticate a presented token.
    ///
    /// # Returns
    /// Username the token was issued to
    ///
    /// # Errors
    /// * `CannotParseToken` - Token is malformed or its signature is invalid
    /// * `ExpiredToken` - Token expired, was superseded or revoked, or the
    ///   session store could not be read
    pub async fn validate_token(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.codec.decode(token).map_err(|e| match e {
            TokenError::Expired => AuthError::ExpiredToken,
            other => {
                tracing::warn!(error = %other, "Rejected unparseable token");
                AuthError::CannotParseToken
            }
        })?;

        let stored = self
            .sessions
            .get(&session_key(&claims.username))
            .await
            .unwrap_or_else(|e| {
                tracing::error!(
                    username = %claims.username,
                    error = %e,
                    "Failed to read session, treating token as expired"
                );
                None
            });

        match stored {
            Some(current) if current == token => Ok(claims.username),
            Some(_) => {
                tracing::debug!(username = %claims.username, "Token superseded by a newer session");
                Err(AuthError::ExpiredToken)
            }
            None => Err(AuthError::ExpiredToken),
        }
    }

    /// Exchange a live token for a fresh one, superseding the presented token.
    ///
    /// # Errors
    /// * `CannotParseToken` / `ExpiredToken` - Presented token is not live
    /// * `CannotCreateToken` - Signing or session store write failed
    pub async fn refresh_token(&self, token: &str) -> Result<String, AuthError> {
        let username = self.validate_token(token).await?;
        self.start_session(&username).await
    }

    /// Log a user out server-side. Revoking an absent session succeeds.
    ///
    /// # Errors
    /// * `CannotRevokeSession` - Session store delete failed
    pub async fn revoke_session(&self, username: &str) -> Result<(), AuthError> {
        self.end_session(username).await.map_err(|_| AuthError::CannotRevokeSession)?;
        tracing::info!(username, "Session revoked");
        Ok(())
    }

    /// Rename a user after verifying their password, then drop their session.
    ///
    /// The renamed user has no session and must sign in again.
    ///
    /// # Errors
    /// * `UserNotFound` / `IncorrectPassword` - Verification failed
    /// * `CannotUpdateUser` - Rename or session revocation failed
    pub async fn change_username(
        &self,
        username: &str,
        new_username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        self.verify_password(username, password).await?;

        self.credentials
            .persist_username_change(username, new_username)
            .await
            .map_err(|e| {
                tracing::error!(username, new_username, error = %e, "Failed to rename user");
                AuthError::CannotUpdateUser
            })?;

        self.end_session(username)
            .await
            .map_err(|_| AuthError::CannotUpdateUser)?;

        tracing::info!(username, new_username, "Username changed, session revoked");
        Ok(())
    }

    /// Delete a user after verifying their password, then drop their session.
    ///
    /// # Errors
    /// * `UserNotFound` / `IncorrectPassword` - Verification failed
    /// * `CannotDeleteUser` - Deletion or session revocation failed
    pub async fn delete_account(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.verify_password(username, password).await?;

        self.credentials
            .delete_credential(username)
            .await
            .map_err(|e| {
                tracing::error!(username, error = %e, "Failed to delete user");
                AuthError::CannotDeleteUser
            })?;

        self.end_session(username)
            .await
            .map_err(|_| AuthError::CannotDeleteUser)?;

        tracing::info!(username, "User deleted, session revoked");
        Ok(())
    }

    async fn verify_password(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let stored_hash = match self.credentials.lookup_credential(username).await {
            Ok(Some(hash)) => hash,
            Ok(None) | Err(CredentialStoreError::NotFound) => {
                tracing::warn!(username, "Authentication failed: user not found");
                return Err(AuthError::UserNotFound);
            }
            Err(e) => {
                tracing::error!(username, error = %e, "Failed to look up credential");
                return Err(AuthError::IncorrectPassword);
            }
        };

        if !self.hasher.verify(password, &stored_hash) {
            tracing::warn!(username, "Authentication failed: incorrect password");
            return Err(AuthError::IncorrectPassword);
        }

        Ok(())
    }

    async fn start_session(&self, username: &str) -> Result<String, AuthError> {
        let token = self.codec.sign(username, self.token_ttl).map_err(|e| {
            tracing::error!(username, error = %e, "Failed to sign token");
            AuthError::CannotCreateToken
        })?;

        self.sessions
            .put(&session_key(username), &token, self.token_ttl)
            .await
            .map_err(|e| {
                tracing::error!(username, error = %e, "Failed to store session");
                AuthError::CannotCreateToken
            })?;

        tracing::info!(username, "Session issued");
        Ok(token)
    }

    async fn end_session(&self, username: &str) -> Result<(), SessionStoreError> {
        self.sessions
            .delete(&session_key(username))
            .await
            .inspect_err(|e| {
                tracing::error!(username, error = %e, "Failed to delete session");
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use mockall::mock;

    use super::*;
    use crate::jwt::TokenClaims;
    use crate::session::InMemorySessionStore;

    const SIGN_KEY: &str = "test_secret_key_at_least_32_bytes!";
    const HASH_SECRET: &str = "pepper";

    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn lookup_credential(&self, username: &str) -> Result<Option<String>, CredentialStoreError>;
            async fn persist_username_change(&self, old: &str, new: &str) -> Result<(), CredentialStoreError>;
            async fn delete_credential(&self, username: &str) -> Result<(), CredentialStoreError>;
        }
    }

    mock! {
        pub TestSessionStore {}

        #[async_trait]
        impl SessionStore for TestSessionStore {
            async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), SessionStoreError>;
            async fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;
            async fn delete(&self, key: &str) -> Result<(), SessionStoreError>;
        }
    }

    /// Credential store double keeping username -> hash in memory.
    #[derive(Default)]
    struct Credentials {
        users: Mutex<HashMap<String, String>>,
    }

    impl Credentials {
        fn with_user(username: &str, password: &str) -> Self {
            let hasher = SaltedSha256Hasher::new(HASH_SECRET);
            let credentials = Self::default();
            credentials
                .users
                .lock()
                .unwrap()
                .insert(username.to_string(), hasher.hash(password));
            credentials
        }

        fn contains(&self, username: &str) -> bool {
            self.users.lock().unwrap().contains_key(username)
        }
    }

    #[async_trait]
    impl CredentialStore for Credentials {
        async fn lookup_credential(
            &self,
            username: &str,
        ) -> Result<Option<String>, CredentialStoreError> {
            Ok(self.users.lock().unwrap().get(username).cloned())
        }

        async fn persist_username_change(
            &self,
            old: &str,
            new: &str,
        ) -> Result<(), CredentialStoreError> {
            let mut users = self.users.lock().unwrap();
            if old == new {
                return if users.contains_key(old) {
                    Ok(())
                } else {
                    Err(CredentialStoreError::NotFound)
                };
            }
            if users.contains_key(new) {
                return Err(CredentialStoreError::AlreadyExists);
            }
            let hash = users.remove(old).ok_or(CredentialStoreError::NotFound)?;
            users.insert(new.to_string(), hash);
            Ok(())
        }

        async fn delete_credential(&self, username: &str) -> Result<(), CredentialStoreError> {
            self.users
                .lock()
                .unwrap()
                .remove(username)
                .map(|_| ())
                .ok_or(CredentialStoreError::NotFound)
        }
    }

    fn config(ttl: Duration) -> AuthConfig {
        AuthConfig::new(SIGN_KEY, HASH_SECRET, ttl)
    }

    fn authority_with_ttl(
        ttl: Duration,
    ) -> (
        SessionAuthority<Credentials, InMemorySessionStore, SaltedSha256Hasher>,
        Arc<Credentials>,
        Arc<InMemorySessionStore>,
    ) {
        let credentials = Arc::new(Credentials::with_user("vasek", "1234"));
        let sessions = Arc::new(InMemorySessionStore::new());
        let authority = SessionAuthority::with_salted_hasher(
            config(ttl),
            Arc::clone(&credentials),
            Arc::clone(&sessions),
        )
        .expect("valid config");
        (authority, credentials, sessions)
    }

    fn authority() -> (
        SessionAuthority<Credentials, InMemorySessionStore, SaltedSha256Hasher>,
        Arc<Credentials>,
        Arc<InMemorySessionStore>,
    ) {
        authority_with_ttl(Duration::from_secs(3600))
    }

    #[test]
    fn test_new_rejects_empty_sign_key() {
        let result = SessionAuthority::with_salted_hasher(
            AuthConfig::new("", HASH_SECRET, Duration::from_secs(60)),
            Arc::new(Credentials::default()),
            Arc::new(InMemorySessionStore::new()),
        );
        assert!(matches!(result, Err(ConfigError::EmptySignKey)));
    }

    #[tokio::test]
    async fn test_issue_then_validate() {
        let (authority, _, sessions) = authority();

        let token = authority.issue_token("vasek", "1234").await.unwrap();
        assert!(!token.is_empty());

        assert_eq!(authority.validate_token(&token).await, Ok("vasek".to_string()));
        assert_eq!(
            sessions.get("session:vasek").await.unwrap(),
            Some(token.clone())
        );
    }

    #[tokio::test]
    async fn test_issue_with_wrong_password() {
        let (authority, _, sessions) = authority();

        let result = authority.issue_token("vasek", "wrong").await;

        assert_eq!(result, Err(AuthError::IncorrectPassword));
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_issue_for_unknown_user() {
        let (authority, _, sessions) = authority();

        let result = authority.issue_token("ghost", "x").await;

        assert_eq!(result, Err(AuthError::UserNotFound));
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_new_login_supersedes_previous_token() {
        let (authority, _, _) = authority();

        let first = authority.issue_token("vasek", "1234").await.unwrap();
        let second = authority.issue_token("vasek", "1234").await.unwrap();
        assert_ne!(first, second);

        assert_eq!(
            authority.validate_token(&first).await,
            Err(AuthError::ExpiredToken)
        );
        assert_eq!(
            authority.validate_token(&second).await,
            Ok("vasek".to_string())
        );
    }

    #[tokio::test]
    async fn test_revoke_session() {
        let (authority, _, _) = authority();

        let token = authority.issue_token("vasek", "1234").await.unwrap();
        authority.revoke_session("vasek").await.unwrap();

        assert_eq!(
            authority.validate_token(&token).await,
            Err(AuthError::ExpiredToken)
        );
    }

    #[tokio::test]
    async fn test_revoke_absent_session_is_ok() {
        let (authority, _, _) = authority();

        assert!(authority.revoke_session("vasek").await.is_ok());
        assert!(authority.revoke_session("ghost").await.is_ok());
    }

    #[tokio::test]
    async fn test_zero_ttl_token_is_expired() {
        let (authority, _, _) = authority_with_ttl(Duration::ZERO);

        let token = authority.issue_token("vasek", "1234").await.unwrap();

        assert_eq!(
            authority.validate_token(&token).await,
            Err(AuthError::ExpiredToken)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_token_expires_with_session_ttl() {
        let (authority, _, _) = authority_with_ttl(Duration::from_secs(60));

        let token = authority.issue_token("vasek", "1234").await.unwrap();
        assert!(authority.validate_token(&token).await.is_ok());

        tokio::time::advance(Duration::from_secs(61)).await;

        assert_eq!(
            authority.validate_token(&token).await,
            Err(AuthError::ExpiredToken)
        );
    }

    #[tokio::test]
    async fn test_expired_signature_is_expired_token() {
        let (authority, _, sessions) = authority();
        let issued_long_ago = TokenClaims::issued_at(
            "vasek",
            chrono::Utc::now().timestamp() - 120,
            Duration::from_secs(60),
        );
        let stale = TokenCodec::new(SIGN_KEY.as_bytes())
            .encode(&issued_long_ago)
            .unwrap();
        // The session record still matches, so only the claims reject it.
        sessions
            .put("session:vasek", &stale, Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            authority.validate_token(&stale).await,
            Err(AuthError::ExpiredToken)
        );
    }

    #[tokio::test]
    async fn test_validate_garbage_token() {
        let (authority, _, _) = authority();

        assert_eq!(
            authority.validate_token("not-a-token").await,
            Err(AuthError::CannotParseToken)
        );
    }

    #[tokio::test]
    async fn test_validate_token_signed_with_other_key() {
        let (authority, _, sessions) = authority();
        let foreign = TokenCodec::new(b"another_key_that_is_long_enough_!!")
            .sign("vasek", Duration::from_secs(60))
            .unwrap();
        // Even a matching session record does not rescue a bad signature.
        sessions
            .put("session:vasek", &foreign, Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            authority.validate_token(&foreign).await,
            Err(AuthError::CannotParseToken)
        );
    }

    #[tokio::test]
    async fn test_rename_invalidates_session() {
        let (authority, credentials, _) = authority();

        let token = authority.issue_token("vasek", "1234").await.unwrap();
        authority
            .change_username("vasek", "vasya", "1234")
            .await
            .unwrap();

        assert_eq!(
            authority.validate_token(&token).await,
            Err(AuthError::ExpiredToken)
        );
        assert!(credentials.contains("vasya"));
        assert!(!credentials.contains("vasek"));

        // The renamed user signs in under the new name.
        let fresh = authority.issue_token("vasya", "1234").await.unwrap();
        assert_eq!(authority.validate_token(&fresh).await, Ok("vasya".to_string()));
    }

    #[tokio::test]
    async fn test_rename_to_same_username_revokes_session() {
        let (authority, credentials, _) = authority();

        let token = authority.issue_token("vasek", "1234").await.unwrap();
        authority
            .change_username("vasek", "vasek", "1234")
            .await
            .unwrap();

        assert!(credentials.contains("vasek"));
        assert_eq!(
            authority.validate_token(&token).await,
            Err(AuthError::ExpiredToken)
        );
    }

    #[tokio::test]
    async fn test_rename_with_wrong_password() {
        let (authority, credentials, _) = authority();

        let result = authority.change_username("vasek", "vasya", "wrong").await;

        assert_eq!(result, Err(AuthError::IncorrectPassword));
        assert!(credentials.contains("vasek"));
    }

    #[tokio::test]
    async fn test_rename_to_taken_username() {
        let (authority, credentials, _) = authority();
        credentials
            .users
            .lock()
            .unwrap()
            .insert("vasya".to_string(), "irrelevant".to_string());

        let result = authority.change_username("vasek", "vasya", "1234").await;

        assert_eq!(result, Err(AuthError::CannotUpdateUser));
    }

    #[tokio::test]
    async fn test_delete_account_revokes_session() {
        let (authority, credentials, _) = authority();

        let token = authority.issue_token("vasek", "1234").await.unwrap();
        authority.delete_account("vasek", "1234").await.unwrap();

        assert!(!credentials.contains("vasek"));
        assert_eq!(
            authority.validate_token(&token).await,
            Err(AuthError::ExpiredToken)
        );
        assert_eq!(
            authority.issue_token("vasek", "1234").await,
            Err(AuthError::UserNotFound)
        );
    }

    #[tokio::test]
    async fn test_refresh_supersedes_presented_token() {
        let (authority, _, _) = authority();

        let token = authority.issue_token("vasek", "1234").await.unwrap();
        let refreshed = authority.refresh_token(&token).await.unwrap();

        assert_eq!(
            authority.validate_token(&refreshed).await,
            Ok("vasek".to_string())
        );
        assert_eq!(
            authority.validate_token(&token).await,
            Err(AuthError::ExpiredToken)
        );
    }

    #[tokio::test]
    async fn test_refresh_revoked_token_fails() {
        let (authority, _, _) = authority();

        let token = authority.issue_token("vasek", "1234").await.unwrap();
        authority.revoke_session("vasek").await.unwrap();

        assert_eq!(
            authority.refresh_token(&token).await,
            Err(AuthError::ExpiredToken)
        );
    }

    #[tokio::test]
    async fn test_hash_password_verifies() {
        let (authority, _, _) = authority();
        let hash = authority.hash_password("secret");

        assert!(SaltedSha256Hasher::new(HASH_SECRET).verify("secret", &hash));
    }

    #[tokio::test]
    async fn test_session_write_failure_is_cannot_create_token() {
        let mut credentials = MockTestCredentialStore::new();
        let mut sessions = MockTestSessionStore::new();
        let hash = SaltedSha256Hasher::new(HASH_SECRET).hash("1234");

        credentials
            .expect_lookup_credential()
            .withf(|username| username == "vasek")
            .times(1)
            .returning(move |_| Ok(Some(hash.clone())));
        sessions
            .expect_put()
            .times(1)
            .returning(|_, _, _| Err(SessionStoreError::Unavailable("down".to_string())));

        let authority = SessionAuthority::with_salted_hasher(
            config(Duration::from_secs(60)),
            Arc::new(credentials),
            Arc::new(sessions),
        )
        .unwrap();

        assert_eq!(
            authority.issue_token("vasek", "1234").await,
            Err(AuthError::CannotCreateToken)
        );
    }

    #[tokio::test]
    async fn test_wrong_password_never_writes_session() {
        let mut credentials = MockTestCredentialStore::new();
        let mut sessions = MockTestSessionStore::new();
        let hash = SaltedSha256Hasher::new(HASH_SECRET).hash("1234");

        credentials
            .expect_lookup_credential()
            .times(1)
            .returning(move |_| Ok(Some(hash.clone())));
        sessions.expect_put().times(0);

        let authority = SessionAuthority::with_salted_hasher(
            config(Duration::from_secs(60)),
            Arc::new(credentials),
            Arc::new(sessions),
        )
        .unwrap();

        assert_eq!(
            authority.issue_token("vasek", "wrong").await,
            Err(AuthError::IncorrectPassword)
        );
    }

    #[tokio::test]
    async fn test_credential_lookup_failure_fails_closed() {
        let mut credentials = MockTestCredentialStore::new();
        let mut sessions = MockTestSessionStore::new();

        credentials
            .expect_lookup_credential()
            .times(1)
            .returning(|_| Err(CredentialStoreError::Unavailable("timeout".to_string())));
        sessions.expect_put().times(0);

        let authority = SessionAuthority::with_salted_hasher(
            config(Duration::from_secs(60)),
            Arc::new(credentials),
            Arc::new(sessions),
        )
        .unwrap();

        assert_eq!(
            authority.issue_token("vasek", "1234").await,
            Err(AuthError::IncorrectPassword)
        );
    }

    #[tokio::test]
    async fn test_session_read_failure_is_expired() {
        let credentials = MockTestCredentialStore::new();
        let mut sessions = MockTestSessionStore::new();

        sessions
            .expect_get()
            .withf(|key| key == "session:vasek")
            .times(1)
            .returning(|_| Err(SessionStoreError::Unavailable("down".to_string())));

        let authority = SessionAuthority::with_salted_hasher(
            config(Duration::from_secs(60)),
            Arc::new(credentials),
            Arc::new(sessions),
        )
        .unwrap();
        let token = TokenCodec::new(SIGN_KEY.as_bytes())
            .sign("vasek", Duration::from_secs(60))
            .unwrap();

        assert_eq!(
            authority.validate_token(&token).await,
            Err(AuthError::ExpiredToken)
        );
    }

    #[tokio::test]
    async fn test_revoke_failure() {
        let credentials = MockTestCredentialStore::new();
        let mut sessions = MockTestSessionStore::new();

        sessions
            .expect_delete()
            .times(1)
            .returning(|_| Err(SessionStoreError::Unavailable("down".to_string())));

        let authority = SessionAuthority::with_salted_hasher(
            config(Duration::from_secs(60)),
            Arc::new(credentials),
            Arc::new(sessions),
        )
        .unwrap();

        assert_eq!(
            authority.revoke_session("vasek").await,
            Err(AuthError::CannotRevokeSession)
        );
    }

    #[tokio::test]
    async fn test_delete_persistence_failure() {
        let mut credentials = MockTestCredentialStore::new();
        let mut sessions = MockTestSessionStore::new();
        let hash = SaltedSha256Hasher::new(HASH_SECRET).hash("1234");

        credentials
            .expect_lookup_credential()
            .times(1)
            .returning(move |_| Ok(Some(hash.clone())));
        credentials
            .expect_delete_credential()
            .times(1)
            .returning(|_| Err(CredentialStoreError::Unavailable("down".to_string())));
        sessions.expect_delete().times(0);

        let authority = SessionAuthority::with_salted_hasher(
            config(Duration::from_secs(60)),
            Arc::new(credentials),
            Arc::new(sessions),
        )
        .unwrap();

        assert_eq!(
            authority.delete_account("vasek", "1234").await,
            Err(AuthError::CannotDeleteUser)
        );
    }

    #[tokio::test]
    async fn test_rename_revoke_failure() {
        let mut credentials = MockTestCredentialStore::new();
        let mut sessions = MockTestSessionStore::new();
        let hash = SaltedSha256Hasher::new(HASH_SECRET).hash("1234");

        credentials
            .expect_lookup_credential()
            .times(1)
            .returning(move |_| Ok(Some(hash.clone())));
        credentials
            .expect_persist_username_change()
            .withf(|old, new| old == "vasek" && new == "vasya")
            .times(1)
            .returning(|_, _| Ok(()));
        sessions
            .expect_delete()
            .withf(|key| key == "session:vasek")
            .times(1)
            .returning(|_| Err(SessionStoreError::Unavailable("down".to_string())));

        let authority = SessionAuthority::with_salted_hasher(
            config(Duration::from_secs(60)),
            Arc::new(credentials),
            Arc::new(sessions),
        )
        .unwrap();

        assert_eq!(
            authority.change_username("vasek", "vasya", "1234").await,
            Err(AuthError::CannotUpdateUser)
        );
    }
}
