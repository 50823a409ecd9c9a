//! Vault module: encrypted credential storage.
//!
//! This module provides:
//! - The decrypted `SecretBundle` and masking helpers (`bundle`)
//! - The JSON vault file format with atomic writes (`format`)
//! - The lock/unlock state machine, `VaultStore` (`store`)
//! - An async `SharedVault` handle for tokio callers (`shared`)
//! - The `CredentialSource` seam for secret consumers (`source`)

pub mod bundle;
pub mod format;
pub mod shared;
pub mod source;
pub mod store;

// Re-export the most commonly used items.
pub use bundle::{mask_secret, SecretBundle, DEFAULT_KNOWN_KEYS, EMPTY_MARKER};
pub use format::{VaultFile, VaultMeta};
pub use shared::SharedVault;
pub use source::CredentialSource;
pub use store::{VaultOptions, VaultStatus, VaultStore};
