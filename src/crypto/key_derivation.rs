//! Key derivation using PBKDF2-HMAC-SHA256
//!
//! Derives a 256-bit AES key from a backup password and a random salt.
//! The iteration count is part of the backup wire format: changing it makes
//! every existing backup unreadable.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// PBKDF2 iteration count
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Size of the random salt in bytes
pub const SALT_SIZE: usize = 16;

/// Size of the derived key in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// A derived encryption key, wiped from memory on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Generate a fresh random salt
pub fn generate_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive an encryption key from a password and salt
pub fn derive_key(password: &str, salt: &[u8]) -> DerivedKey {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    let derived = DerivedKey { key };
    key.zeroize();
    derived
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_length() {
        let key = derive_key("test_password", &generate_salt());
        assert_eq!(key.as_bytes().len(), 32);
    }

    #[test]
    fn test_same_password_same_salt_same_key() {
        let salt = generate_salt();
        let key1 = derive_key("test_password", &salt);
        let key2 = derive_key("test_password", &salt);
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let salt = generate_salt();
        let key1 = derive_key("password1", &salt);
        let key2 = derive_key("password2", &salt);
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("same_password", &generate_salt());
        let key2 = derive_key("same_password", &generate_salt());
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_known_vector() {
        // PBKDF2-HMAC-SHA256("password", "salt", 100000, 32)
        let salt = b"salt";
        let key = derive_key("password", salt);
        let expected: [u8; 32] = [
            0x03, 0x94, 0xa2, 0xed, 0xe3, 0x32, 0xc9, 0xa1, 0x3e, 0xb8, 0x2e, 0x9b, 0x24, 0x63,
            0x16, 0x04, 0xc3, 0x1d, 0xf9, 0x78, 0xb4, 0xe2, 0xf0, 0xfb, 0xd2, 0xc5, 0x49, 0x94,
            0x4f, 0x9d, 0x79, 0xa5,
        ];
        assert_eq!(key.as_bytes(), &expected);
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = derive_key("secret", &generate_salt());
        assert_eq!(format!("{:?}", key), "DerivedKey([REDACTED])");
    }
}
