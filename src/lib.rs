//! Credvault: a passphrase-protected, encrypted store for API credentials.
//!
//! [`vault::VaultStore`] owns the lock/unlock lifecycle, [`vault::SharedVault`]
//! wraps it for async callers, and [`vault::CredentialSource`] is the seam
//! consumers read credentials through.

#[cfg(feature = "audit-log")]
pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod vault;

pub use errors::{ErrorClass, Result, VaultError};
pub use vault::{CredentialSource, SharedVault, VaultStore};
