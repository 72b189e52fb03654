//! Authentication and session revocation.
//!
//! Provides the building blocks for bearer-token authentication backed by a
//! server-side session store:
//! - Password hashing (salted, peppered SHA-256)
//! - Signed, time-boxed tokens (HS256 JWT)
//! - A session authority enforcing one live session per user
//!
//! Credential and session storage are capabilities supplied by the caller
//! through the [`CredentialStore`] and [`SessionStore`] traits.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{PasswordHasher, SaltedSha256Hasher};
//!
//! let hasher = SaltedSha256Hasher::new("pepper");
//! let hash = hasher.hash("my_password");
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use std::time::Duration;
//! use auth::TokenCodec;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let token = codec.sign("vasek", Duration::from_secs(60)).unwrap();
//! let claims = codec.decode(&token).unwrap();
//! assert_eq!(claims.username, "vasek");
//! ```

pub mod config;
pub mod credentials;
pub mod jwt;
pub mod password;
pub mod session;

// Re-export commonly used items
pub use config::AuthConfig;
pub use config::ConfigError;
pub use credentials::CredentialStore;
pub use credentials::CredentialStoreError;
pub use jwt::TokenClaims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use password::PasswordHasher;
pub use password::SaltedSha256Hasher;
pub use session::session_key;
pub use session::AuthError;
pub use session::InMemorySessionStore;
pub use session::SessionAuthority;
pub use session::SessionStore;
pub use session::SessionStoreError;
