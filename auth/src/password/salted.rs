// Only the OS RNG is taken from argon2; digests are SHA-256.
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use sha2::Digest;
use sha2::Sha256;

use super::PasswordHasher;

/// Number of random salt bytes (128 bits).
const SALT_LENGTH: usize = 16;

/// Separator between digest and salt in the stored form.
const SEPARATOR: char = ':';

/// Salted and peppered SHA-256 password hasher.
///
/// Stored hashes have the form `<digest_hex>:<salt_hex>` where
/// `digest = SHA-256(salt_hex || secret || plaintext)`. The secret is
/// supplied by the operator and never written next to the hash.
pub struct SaltedSha256Hasher {
    secret: String,
}

impl SaltedSha256Hasher {
    /// Create a new hasher bound to the process hash secret.
    ///
    /// # Arguments
    /// * `secret` - Operator-supplied secret mixed into every digest
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn digest(&self, salt: &str, plaintext: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(self.secret.as_bytes());
        hasher.update(plaintext.as_bytes());
        hasher.finalize().into()
    }

    fn generate_salt() -> String {
        let mut salt = [0u8; SALT_LENGTH];
        OsRng.fill_bytes(&mut salt);
        hex::encode(salt)
    }
}

impl PasswordHasher for SaltedSha256Hasher {
    fn hash(&self, plaintext: &str) -> String {
        let salt = Self::generate_salt();
        let digest = self.digest(&salt, plaintext);
        format!("{}{}{}", hex::encode(digest), SEPARATOR, salt)
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let Some((digest_hex, salt)) = hash.split_once(SEPARATOR) else {
            return false;
        };
        if salt.is_empty() {
            return false;
        }
        let Ok(expected) = hex::decode(digest_hex) else {
            return false;
        };

        constant_time_eq(&expected, &self.digest(salt, plaintext))
    }
}

/// Compare two byte slices without short-circuiting on the first difference.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
