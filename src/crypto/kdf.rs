//! Passphrase-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The working key that encrypts the secret bundle is derived from the
//! master passphrase and a per-write random salt.  The round count is
//! fixed so every vault file can be re-opened with the same cost.

use std::fmt;

use hmac::Hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Result, VaultError};

/// PBKDF2 iteration count.
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// Length of a freshly generated salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A derived 32-byte working key that zeroes its memory when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive the 32-byte working key from a passphrase and salt.
///
/// Deterministic for identical inputs; any change to either input
/// produces an unrelated key.
pub fn derive_key(passphrase: &[u8], salt: &[u8]) -> Result<DerivedKey> {
    if salt.is_empty() {
        return Err(VaultError::KeyDerivationFailed(
            "salt must not be empty".into(),
        ));
    }

    let mut bytes = [0u8; KEY_LEN];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(passphrase, salt, PBKDF2_ROUNDS, &mut bytes)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("PBKDF2 failed: {e}")))?;

    let key = DerivedKey::new(bytes);
    bytes.zeroize();
    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
