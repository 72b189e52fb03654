pub mod salted;

pub use salted::SaltedSha256Hasher;

/// Capability to hash and verify user passwords.
///
/// Implementations must never fail on hashing and must fail closed on
/// verification: a malformed stored hash yields `false`, not an error.
pub trait PasswordHasher: Send + Sync + 'static {
    /// Hash a plaintext password with a fresh salt.
    fn hash(&self, plaintext: &str) -> String;

    /// Check a plaintext password against a stored hash.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}
