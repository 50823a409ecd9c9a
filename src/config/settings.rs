use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::Argon2Params;
use crate::errors::{Result, VaultError};
use crate::vault::store::MIN_PASSPHRASE_LEN;
use crate::vault::{VaultOptions, DEFAULT_KNOWN_KEYS};

/// Project-level configuration, loaded from `.credvault.toml`.
///
/// Every field has a sensible default so Credvault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) holding the vault and audit log.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// File name of the vault inside `vault_dir`.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Argon2 memory cost in KiB for the passphrase hash (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// Shortest master passphrase `init` will accept.
    #[serde(default = "default_min_passphrase_len")]
    pub min_passphrase_len: usize,

    /// Credential names always shown by `list`, even when unset.
    #[serde(default = "default_known_keys")]
    pub known_keys: Vec<String>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".credvault".to_string()
}

fn default_vault_file() -> String {
    "vault.json".to_string()
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_min_passphrase_len() -> usize {
    MIN_PASSPHRASE_LEN
}

fn default_known_keys() -> Vec<String> {
    DEFAULT_KNOWN_KEYS.iter().map(|k| k.to_string()).collect()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            vault_file: default_vault_file(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            min_passphrase_len: default_min_passphrase_len(),
            known_keys: default_known_keys(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".credvault.toml";

    /// Load settings from `<project_dir>/.credvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        Self::load_file(&project_dir.join(Self::FILE_NAME))
    }

    /// Load settings from an explicit config path.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load_file(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.min_passphrase_len == 0 {
            return Err(VaultError::ConfigError(
                "min_passphrase_len must be at least 1".into(),
            ));
        }

        Ok(settings)
    }

    /// Directory holding the vault file and audit log.
    pub fn vault_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir)
    }

    /// Build the full path to the vault file.
    ///
    /// Example: `project_dir/.credvault/vault.json`
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        self.vault_dir(project_dir).join(&self.vault_file)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    /// Options for constructing a `VaultStore`.
    pub fn vault_options(&self) -> VaultOptions {
        VaultOptions {
            argon2: self.argon2_params(),
            min_passphrase_len: self.min_passphrase_len,
            known_keys: self.known_keys.clone(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
