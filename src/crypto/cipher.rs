//! AES-256-GCM authenticated encryption keyed by a passphrase.
//!
//! Each call to `encrypt` generates a fresh random salt (for the KDF) and
//! a fresh random 12-byte IV, so no two writes share a key/nonce pair.
//! The GCM tag is split off the ciphertext and stored on its own.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::kdf::{derive_key, generate_salt, DerivedKey};
use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce (IV) in bytes.
pub const IV_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Output of [`encrypt`]; every field is stored as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedPayload {
    #[serde(with = "hex")]
    pub iv: Vec<u8>,

    /// Ciphertext without the tag.
    #[serde(rename = "content", with = "hex")]
    pub ciphertext: Vec<u8>,

    #[serde(with = "hex")]
    pub auth_tag: Vec<u8>,

    /// KDF salt for this write.
    #[serde(with = "hex")]
    pub salt: Vec<u8>,
}

/// Encrypt `plaintext` under a key derived from `passphrase`.
pub fn encrypt(plaintext: &[u8], passphrase: &[u8]) -> Result<EncryptedPayload> {
    let salt = generate_salt();
    let key = derive_key(passphrase, &salt)?;

    let (iv, mut ciphertext) = seal(&key, plaintext)?;

    // aes-gcm appends the tag; keep it as its own field.
    debug_assert!(ciphertext.len() >= TAG_LEN);
    let auth_tag = ciphertext.split_off(ciphertext.len() - TAG_LEN);

    Ok(EncryptedPayload {
        iv,
        ciphertext,
        auth_tag,
        salt: salt.to_vec(),
    })
}

/// Decrypt a payload produced by [`encrypt`].
///
/// A wrong passphrase and a modified ciphertext or tag both surface as
/// [`VaultError::Integrity`].  Fields with impossible lengths are
/// [`VaultError::Corruption`].
pub fn decrypt(payload: &EncryptedPayload, passphrase: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if payload.iv.len() != IV_LEN {
        return Err(VaultError::Corruption(format!(
            "iv must be {IV_LEN} bytes, got {}",
            payload.iv.len()
        )));
    }
    if payload.auth_tag.len() != TAG_LEN {
        return Err(VaultError::Corruption(format!(
            "auth tag must be {TAG_LEN} bytes, got {}",
            payload.auth_tag.len()
        )));
    }
    if payload.salt.is_empty() {
        return Err(VaultError::Corruption("salt is empty".into()));
    }

    let key = derive_key(passphrase, &payload.salt)?;

    let mut sealed = Vec::with_capacity(payload.ciphertext.len() + TAG_LEN);
    sealed.extend_from_slice(&payload.ciphertext);
    sealed.extend_from_slice(&payload.auth_tag);

    open(&key, &payload.iv, &sealed)
}

/// Encrypt with an already-derived key; returns `(iv, ciphertext || tag)`.
fn seal(key: &DerivedKey, plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    Ok((nonce.to_vec(), ciphertext))
}

/// Decrypt and verify `ciphertext || tag` with an already-derived key.
fn open(key: &DerivedKey, iv: &[u8], sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::Integrity)?;
    let nonce = Nonce::from_slice(iv);

    let plaintext = cipher
        .decrypt(nonce, sealed)
        .map_err(|_| VaultError::Integrity)?;

    Ok(Zeroizing::new(plaintext))
}
