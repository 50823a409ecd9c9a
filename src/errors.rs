use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in Credvault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Integrity check failed: ciphertext was tampered with or the passphrase is wrong")]
    Integrity,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault state errors ---
    #[error("Vault already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Vault not initialized: no vault file at {0}")]
    NotInitialized(PathBuf),

    #[error("Invalid passphrase")]
    Authentication,

    #[error("Vault is locked: unlock it first")]
    Locked,

    #[error("Vault file is corrupted: {0}")]
    Corruption(String),

    #[error("Passphrase must be at least {0} characters")]
    WeakPassphrase(usize),

    #[error("Invalid credential name '{0}'")]
    InvalidKeyName(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Background task failed: {0}")]
    Task(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Coarse grouping of errors by how a caller should react to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Deterministic given the current state; fix the call, don't retry.
    Misuse,
    /// Wrong passphrase.
    Authentication,
    /// The vault file is damaged or was tampered with.
    Corruption,
    /// Storage trouble; retrying later may help.
    Io,
    Other,
}

impl VaultError {
    /// Which [`ErrorClass`] this error belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Locked
            | Self::NotInitialized(_)
            | Self::AlreadyInitialized(_)
            | Self::WeakPassphrase(_)
            | Self::InvalidKeyName(_) => ErrorClass::Misuse,
            Self::Authentication => ErrorClass::Authentication,
            Self::Corruption(_) | Self::Integrity => ErrorClass::Corruption,
            Self::Io(_) => ErrorClass::Io,
            _ => ErrorClass::Other,
        }
    }

    /// Message that is safe to show outside the process.
    ///
    /// Authentication and corruption failures collapse into the same
    /// "invalid passphrase" text so a caller cannot tell them apart.
    pub fn public_message(&self) -> String {
        match self.class() {
            ErrorClass::Authentication | ErrorClass::Corruption => "Invalid passphrase".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Convenience type alias for Credvault results.
pub type Result<T> = std::result::Result<T, VaultError>;
