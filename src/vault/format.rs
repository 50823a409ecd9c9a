//! On-disk vault file format.
//!
//! A vault file is a single JSON document:
//!
//! ```text
//! {
//!   "meta": { "hash": "$argon2id$...", "version": 1,
//!             "createdAt": "...", "updatedAt": "..." },
//!   "data": { "iv": "<hex>", "content": "<hex>",
//!             "authTag": "<hex>", "salt": "<hex>" }
//! }
//! ```
//!
//! - **meta.hash**: Argon2id PHC string of the master passphrase.
//! - **meta.version**: format version (currently `1`).
//! - **data**: the AES-256-GCM encrypted `SecretBundle`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::EncryptedPayload;
use crate::errors::{Result, VaultError};

/// Current vault file format version.
pub const CURRENT_VERSION: u32 = 1;

/// Unencrypted metadata stored alongside the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultMeta {
    /// PHC string produced by the password authenticator.
    #[serde(rename = "hash", alias = "passwordHash")]
    pub password_hash: String,

    /// Format version.
    pub version: u32,

    /// When this vault was first created.
    pub created_at: DateTime<Utc>,

    /// When the payload was last rewritten by a key update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The complete persisted artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultFile {
    pub meta: VaultMeta,
    pub data: EncryptedPayload,
}

/// Read and structurally validate a vault file.
///
/// Missing file -> `NotInitialized`; anything that does not parse as a
/// version-1 vault -> `Corruption`.
pub fn read_vault(path: &Path) -> Result<VaultFile> {
    if !path.exists() {
        return Err(VaultError::NotInitialized(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;

    let file: VaultFile = serde_json::from_slice(&bytes)
        .map_err(|e| VaultError::Corruption(format!("vault JSON: {e}")))?;

    if file.meta.version == 0 || file.meta.version > CURRENT_VERSION {
        return Err(VaultError::Corruption(format!(
            "unsupported version {}, expected {CURRENT_VERSION}",
            file.meta.version
        )));
    }

    if file.meta.password_hash.is_empty() {
        return Err(VaultError::Corruption("password hash is empty".into()));
    }

    Ok(file)
}

/// Write a vault file to disk **atomically**.
///
/// 1. Serialize to pretty JSON.
/// 2. Write to a uniquely named temp file in the same directory, then fsync it.
/// 3. Rename the temp file over the target path.
///
/// Readers and crashes therefore never see a half-written vault.
pub fn write_vault(path: &Path, file: &VaultFile) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(file)
        .map_err(|e| VaultError::SerializationError(format!("vault file: {e}")))?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !parent.exists() {
        fs::create_dir_all(&parent)?;
    }

    // Unique name per write; dropped (and deleted) on any early return.
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(&parent)?;

    restrict_permissions(tmp.path())?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|e| VaultError::Io(e.error))?;

    Ok(())
}

/// On Unix, restrict permissions to owner-only read/write.
fn restrict_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
