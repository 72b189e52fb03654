use thiserror::Error;

/// Closed set of outcomes a session authority operation can fail with.
///
/// `UserNotFound` and `IncorrectPassword` are kept apart for logging only;
/// callers should present both to clients as one credential failure.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("user not found")]
    UserNotFound,

    #[error("incorrect user password")]
    IncorrectPassword,

    #[error("cannot create token")]
    CannotCreateToken,

    #[error("cannot parse token")]
    CannotParseToken,

    /// True expiry, session store miss, and superseded sessions alike.
    #[error("expired token")]
    ExpiredToken,

    #[error("cannot update user info")]
    CannotUpdateUser,

    #[error("cannot delete user")]
    CannotDeleteUser,

    #[error("cannot revoke session")]
    CannotRevokeSession,
}

impl AuthError {
    /// Infrastructure failures a caller may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AuthError::CannotCreateToken
                | AuthError::CannotUpdateUser
                | AuthError::CannotDeleteUser
                | AuthError::CannotRevokeSession
        )
    }

    /// Failures caused by the presented username/password pair.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, AuthError::UserNotFound | AuthError::IncorrectPassword)
    }
}
