//! The decrypted secret bundle and its display helpers.
//!
//! A `SecretBundle` only ever exists in memory while the vault is
//! unlocked.  It is serialized to JSON, encrypted as a whole, and the
//! ciphertext is what lands in the vault file's `data` section.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Result, VaultError};

/// Marker shown for credential names without a value.
pub const EMPTY_MARKER: &str = "(empty)";

/// Number of characters revealed at each end of a masked value.
const MASK_VISIBLE: usize = 4;

/// Credential names the platform knows how to use.
pub const DEFAULT_KNOWN_KEYS: &[&str] = &[
    "GEMINI_API_KEY",
    "OPENAI_API_KEY",
    "ANTHROPIC_API_KEY",
    "FACEBOOK_ACCESS_TOKEN",
    "FACEBOOK_PAGE_ID",
    "INSTAGRAM_ACCESS_TOKEN",
    "TWITTER_API_KEY",
    "TWITTER_API_SECRET",
    "LINKEDIN_ACCESS_TOKEN",
];

/// All credentials held by one vault.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretBundle {
    /// Credential name -> secret value.
    #[serde(default)]
    pub api_keys: BTreeMap<String, String>,

    /// When the bundle was last mutated.  Defaults to now when absent.
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl SecretBundle {
    /// A bundle with no credentials.
    pub fn empty() -> Self {
        Self {
            api_keys: BTreeMap::new(),
            last_updated: Utc::now(),
        }
    }

    /// Parse a decrypted bundle.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| VaultError::Corruption(format!("secret bundle JSON: {e}")))
    }

    /// Serialize into a buffer that is wiped on drop.
    pub fn to_json(&self) -> Result<Zeroizing<Vec<u8>>> {
        serde_json::to_vec(self)
            .map(Zeroizing::new)
            .map_err(|e| VaultError::SerializationError(format!("secret bundle: {e}")))
    }

    /// Masked view of every known name plus every stored name.
    pub fn masked(&self, known_keys: &[String]) -> BTreeMap<String, String> {
        let mut out: BTreeMap<String, String> = known_keys
            .iter()
            .map(|name| (name.clone(), EMPTY_MARKER.to_string()))
            .collect();

        for (name, value) in &self.api_keys {
            out.insert(name.clone(), mask_secret(value));
        }
        out
    }
}

impl Drop for SecretBundle {
    fn drop(&mut self) {
        for value in self.api_keys.values_mut() {
            value.zeroize();
        }
    }
}

impl std::fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretBundle")
            .field("api_keys", &self.api_keys.keys().collect::<Vec<_>>())
            .field("last_updated", &self.last_updated)
            .finish()
    }
}

/// Display-safe form of a secret: first and last four characters.
///
/// Values too short to hide anything are fully redacted; empty values
/// show [`EMPTY_MARKER`].
pub fn mask_secret(value: &str) -> String {
    let len = value.chars().count();
    if len == 0 {
        return EMPTY_MARKER.to_string();
    }
    if len <= MASK_VISIBLE * 2 {
        return "****".to_string();
    }
    let prefix: String = value.chars().take(MASK_VISIBLE).collect();
    let suffix: String = value.chars().skip(len - MASK_VISIBLE).collect();
    format!("{prefix}...{suffix}")
}

/// Validate that a credential name is safe to store.
///
/// Allowed: ASCII letters, digits and underscores, not starting with a
/// digit, at most 128 characters.
pub fn validate_key_name(name: &str) -> Result<()> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,127}$").expect("credential name pattern is valid")
    });

    if pattern.is_match(name) {
        Ok(())
    } else {
        Err(VaultError::InvalidKeyName(name.to_string()))
    }
}
