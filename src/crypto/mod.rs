//! Cryptographic functions for Bimil backups
//!
//! Provides AES-256-GCM authenticated encryption with PBKDF2-HMAC-SHA256
//! key derivation for password-protected backup files.

pub mod encryption;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::{decrypt, encrypt, HEADER_SIZE, NONCE_SIZE, TAG_SIZE};
pub use key_derivation::{derive_key, DerivedKey, PBKDF2_ITERATIONS, SALT_SIZE};
pub use secure_memory::SecureString;
