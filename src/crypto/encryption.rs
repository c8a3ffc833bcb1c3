//! AES-256-GCM encryption/decryption of backup blobs
//!
//! Every call derives a fresh key from the password and a new random salt,
//! and encrypts under a new random nonce. The output is a single byte
//! buffer laid out as:
//!
//! ```text
//! salt (16 bytes) || nonce (12 bytes) || ciphertext || tag (16 bytes)
//! ```
//!
//! No associated data is bound. The layout and sizes are a wire-format
//! contract shared with every other client that reads these backups.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::error::{BimilError, BimilResult};

use super::key_derivation::{derive_key, generate_salt, SALT_SIZE};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Bytes preceding the ciphertext: salt followed by nonce
pub const HEADER_SIZE: usize = SALT_SIZE + NONCE_SIZE;

/// Encrypt plaintext with a key derived from `password`
pub fn encrypt(plaintext: &[u8], password: &str) -> BimilResult<Vec<u8>> {
    let salt = generate_salt();
    let key = derive_key(password, &salt);

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| BimilError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| BimilError::Encryption(format!("Encryption failed: {}", e)))?;

    let mut blob = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt a blob produced by [`encrypt`]
///
/// Fails when the blob is shorter than the header, when the password is
/// wrong, or when any byte has been altered.
pub fn decrypt(blob: &[u8], password: &str) -> BimilResult<Vec<u8>> {
    if blob.len() < HEADER_SIZE {
        return Err(BimilError::Encryption(format!(
            "Backup data too short: expected at least {} bytes, got {}",
            HEADER_SIZE,
            blob.len()
        )));
    }

    let (salt, rest) = blob.split_at(SALT_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

    let key = derive_key(password, salt);
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| BimilError::Encryption(format!("Failed to create cipher: {}", e)))?;

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| {
            BimilError::Encryption(
                "Decryption failed: wrong password or corrupted data".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn test_encrypt_decrypt() {
        let plaintext = b"Hello, World!";

        let blob = encrypt(plaintext, "secret123").unwrap();
        let decrypted = decrypt(&blob, "secret123").unwrap();

        assert_eq!(plaintext, decrypted.as_slice());
    }

    #[test]
    fn test_layout_sizes() {
        let plaintext = b"twelve bytes";
        let blob = encrypt(plaintext, "pw").unwrap();
        assert_eq!(blob.len(), HEADER_SIZE + plaintext.len() + TAG_SIZE);
    }

    #[test]
    fn test_fresh_salt_and_nonce_per_call() {
        let plaintext = b"Hello, World!";

        let blob1 = encrypt(plaintext, "pw").unwrap();
        let blob2 = encrypt(plaintext, "pw").unwrap();

        assert_ne!(blob1[..SALT_SIZE], blob2[..SALT_SIZE]);
        assert_ne!(blob1[SALT_SIZE..HEADER_SIZE], blob2[SALT_SIZE..HEADER_SIZE]);
        assert_ne!(blob1[HEADER_SIZE..], blob2[HEADER_SIZE..]);
    }

    #[test]
    fn test_wrong_password_fails() {
        let blob = encrypt(b"Hello, World!", "pw1").unwrap();
        let result = decrypt(&blob, "pw2");
        assert!(matches!(result, Err(BimilError::Encryption(_))));
    }

    #[test]
    fn test_any_flipped_byte_fails() {
        let blob = encrypt(b"tamper", "pw").unwrap();

        // One position in each region: salt, nonce, ciphertext, tag
        for index in [0, SALT_SIZE, HEADER_SIZE, blob.len() - 1] {
            let mut tampered = blob.clone();
            tampered[index] ^= 0x01;
            assert!(decrypt(&tampered, "pw").is_err(), "byte {} not detected", index);
        }
    }

    #[test]
    fn test_truncated_blob_fails() {
        let result = decrypt(&[0u8; HEADER_SIZE - 1], "pw");
        assert!(result.unwrap_err().to_string().contains("too short"));

        // Header present but no tag
        assert!(decrypt(&[0u8; HEADER_SIZE], "pw").is_err());
    }

    #[test]
    fn test_empty_plaintext() {
        let blob = encrypt(b"", "pw").unwrap();
        assert_eq!(blob.len(), HEADER_SIZE + TAG_SIZE);
        assert!(decrypt(&blob, "pw").unwrap().is_empty());
    }

    #[test]
    fn test_decrypts_blob_from_other_client() {
        // salt = 00..0f, nonce = 64..6f, password "secret123"
        let blob = from_hex(
            "000102030405060708090a0b0c0d0e0f6465666768696a6b6c6d6e6f\
             5fb31cb5e3a3c184f59302e8d062f965e4a85da3d506f07f959859a5a259d65b53",
        );
        let plaintext = decrypt(&blob, "secret123").unwrap();
        assert_eq!(plaintext, br#"{"hello":"bimil"}"#);
    }
}
