use thiserror::Error;

/// Error type for token signing and decoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// Token cannot be parsed or its signature does not verify.
    #[error("Token is malformed: {0}")]
    Malformed(String),

    /// Signature is valid but the token is past its expiry.
    #[error("Token is expired")]
    Expired,
}
