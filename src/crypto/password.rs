//! Master passphrase hashing and verification using Argon2id.
//!
//! The stored hash is a PHC string (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`)
//! so the exact cost parameters and salt travel with it.  It is used only
//! to authenticate the operator; the encryption key comes from `kdf`.

use aes_gcm::aead::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::errors::{Result, VaultError};

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Configurable Argon2id cost parameters for new hashes.
///
/// Verification always uses the parameters recorded in the stored hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// Reject parameters below the safety floor.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(VaultError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.iterations < 1 {
            return Err(VaultError::KeyDerivationFailed(
                "Argon2 iterations must be at least 1".into(),
            ));
        }
        if self.parallelism < 1 {
            return Err(VaultError::KeyDerivationFailed(
                "Argon2 parallelism must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn hasher(&self) -> Result<Argon2<'static>> {
        self.validate()?;
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| {
                VaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}"))
            })?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash a passphrase into an Argon2id PHC string with a fresh random salt.
pub fn hash_password(passphrase: &[u8], params: &Argon2Params) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = params
        .hasher()?
        .hash_password(passphrase, &salt)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Check a candidate passphrase against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch.  A stored value that is not a usable
/// Argon2 hash is reported as corruption rather than as a mismatch.
pub fn verify_password(passphrase: &[u8], stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| VaultError::Corruption(format!("stored password hash: {e}")))?;

    if parsed.salt.is_none() || parsed.hash.is_none() {
        return Err(VaultError::Corruption(
            "stored password hash is missing its salt or digest".into(),
        ));
    }

    // Params, algorithm and version are taken from the PHC string itself.
    match Argon2::default().verify_password(passphrase, &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(VaultError::Corruption(format!("stored password hash: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Params {
        Argon2Params {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn verify_accepts_original_passphrase() {
        let hash = hash_password(b"correct horse battery staple", &cheap()).unwrap();
        assert!(verify_password(b"correct horse battery staple", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_other_passphrase() {
        let hash = hash_password(b"correct horse battery staple", &cheap()).unwrap();
        assert!(!verify_password(b"correct horse battery stapl", &hash).unwrap());
        assert!(!verify_password(b"", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let h1 = hash_password(b"same input", &cheap()).unwrap();
        let h2 = hash_password(b"same input", &cheap()).unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn hash_never_contains_passphrase() {
        let hash = hash_password(b"plaintext-marker", &cheap()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("plaintext-marker"));
    }

    #[test]
    fn hash_records_cost_parameters() {
        let hash = hash_password(b"params", &cheap()).unwrap();
        assert!(hash.contains("m=8192,t=1,p=1"), "got {hash}");
    }

    #[test]
    fn malformed_hash_is_corruption() {
        let err = verify_password(b"anything", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, VaultError::Corruption(_)));
    }

    #[test]
    fn hash_without_digest_is_corruption() {
        let err = verify_password(b"anything", "$argon2id$v=19$m=8192,t=1,p=1$c29tZXNhbHQ")
            .unwrap_err();
        assert!(matches!(err, VaultError::Corruption(_)));
    }

    #[test]
    fn weak_params_are_rejected() {
        let params = Argon2Params {
            memory_kib: 1024,
            ..cheap()
        };
        assert!(hash_password(b"x", &params).is_err());
    }
}
