//! Cryptographic primitives for Credvault.
//!
//! This module provides:
//! - Argon2id master passphrase hashing and verification (`password`)
//! - PBKDF2-HMAC-SHA256 working key derivation (`kdf`)
//! - AES-256-GCM passphrase-keyed encryption and decryption (`cipher`)

pub mod cipher;
pub mod kdf;
pub mod password;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, hash_password, ...};
pub use cipher::{decrypt, encrypt, EncryptedPayload};
pub use kdf::{derive_key, generate_salt, DerivedKey};
pub use password::{hash_password, verify_password, Argon2Params};
