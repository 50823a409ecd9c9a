//! The vault state machine.
//!
//! `VaultStore` owns one vault file and the in-memory `SecretBundle`
//! decrypted from it.  Every state transition, and the whole
//! read-modify-write cycle of a key update, runs under one mutex, so two
//! concurrent updates can never both start from the same stale bundle.
//!
//! ```text
//! (no file) --init--> UNLOCKED <--unlock-- LOCKED
//!                        |                   ^
//!                        +------lock---------+
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::crypto::{decrypt, encrypt, hash_password, verify_password, Argon2Params};
use crate::errors::{Result, VaultError};

use super::bundle::{validate_key_name, SecretBundle, DEFAULT_KNOWN_KEYS};
use super::format::{self, VaultFile, VaultMeta, CURRENT_VERSION};

/// Minimum master passphrase length, in characters.
pub const MIN_PASSPHRASE_LEN: usize = 8;

/// Tunables for a `VaultStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultOptions {
    /// Argon2id cost for the stored passphrase hash.
    pub argon2: Argon2Params,
    /// `init` rejects shorter passphrases.
    pub min_passphrase_len: usize,
    /// Names always listed by `get_masked_keys`, set or not.
    pub known_keys: Vec<String>,
}

impl Default for VaultOptions {
    fn default() -> Self {
        Self {
            argon2: Argon2Params::default(),
            min_passphrase_len: MIN_PASSPHRASE_LEN,
            known_keys: DEFAULT_KNOWN_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Result of [`VaultStore::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VaultStatus {
    pub initialized: bool,
    pub unlocked: bool,
}

/// Decrypted state held while unlocked.
struct Session {
    meta: VaultMeta,
    bundle: SecretBundle,
}

enum State {
    Locked,
    Unlocked(Session),
}

impl State {
    fn session(&self) -> Result<&Session> {
        match self {
            State::Unlocked(session) => Ok(session),
            State::Locked => Err(VaultError::Locked),
        }
    }
}

/// Handle to one vault file.  Starts LOCKED.
pub struct VaultStore {
    /// Path to the vault file on disk.
    path: PathBuf,

    options: VaultOptions,

    state: Mutex<State>,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a locked handle for the vault file at `path`.
    ///
    /// Nothing is read or written until `init` or `unlock`.
    pub fn new(path: impl Into<PathBuf>, options: VaultOptions) -> Self {
        Self {
            path: path.into(),
            options,
            state: Mutex::new(State::Locked),
        }
    }

    /// Same as [`VaultStore::new`] with default options.
    pub fn with_defaults(path: impl Into<PathBuf>) -> Self {
        Self::new(path, VaultOptions::default())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Whether a vault file exists and whether this handle is unlocked.
    pub fn status(&self) -> VaultStatus {
        let state = self.state();
        VaultStatus {
            initialized: self.path.exists(),
            unlocked: matches!(*state, State::Unlocked(_)),
        }
    }

    /// Create a new vault protected by `passphrase` and leave it unlocked.
    ///
    /// Refuses to touch an existing file, whatever its contents.
    pub fn init(&self, passphrase: &str) -> Result<()> {
        let mut state = self.state();

        if self.path.exists() {
            warn!(path = %self.path.display(), "init refused: vault file already present");
            return Err(VaultError::AlreadyInitialized(self.path.clone()));
        }

        if passphrase.chars().count() < self.options.min_passphrase_len {
            return Err(VaultError::WeakPassphrase(self.options.min_passphrase_len));
        }

        let password_hash = hash_password(passphrase.as_bytes(), &self.options.argon2)?;

        let bundle = SecretBundle::empty();
        let data = encrypt(&bundle.to_json()?, passphrase.as_bytes())?;

        let file = VaultFile {
            meta: VaultMeta {
                password_hash,
                version: CURRENT_VERSION,
                created_at: Utc::now(),
                updated_at: None,
            },
            data,
        };
        format::write_vault(&self.path, &file)?;

        *state = State::Unlocked(Session {
            meta: file.meta,
            bundle,
        });

        info!(path = %self.path.display(), "vault initialized");
        Ok(())
    }

    /// Verify `passphrase` and decrypt the vault into memory.
    ///
    /// A failure leaves the current state as it was: a locked handle stays
    /// locked, and an unlocked one keeps its session, so a wrong guess from
    /// one holder of a shared handle cannot lock out the others.  Call
    /// [`lock`](Self::lock) to end a session explicitly.
    pub fn unlock(&self, passphrase: &str) -> Result<()> {
        let mut state = self.state();
        let session = self.load_session(passphrase)?;

        info!(
            path = %self.path.display(),
            credentials = session.bundle.api_keys.len(),
            "vault unlocked"
        );
        *state = State::Unlocked(session);
        Ok(())
    }

    /// Discard the decrypted bundle.  Idempotent.
    pub fn lock(&self) {
        let mut state = self.state();
        if matches!(*state, State::Unlocked(_)) {
            debug!(path = %self.path.display(), "vault locked");
        }
        *state = State::Locked;
    }

    // ------------------------------------------------------------------
    // Credential access
    // ------------------------------------------------------------------

    /// The raw value stored under `name`, or `None` if it was never set.
    pub fn get_key(&self, name: &str) -> Result<Option<String>> {
        let state = self.state();
        let session = state.session()?;
        Ok(session.bundle.api_keys.get(name).cloned())
    }

    /// Display-safe view of every known and every stored credential.
    pub fn get_masked_keys(&self) -> Result<BTreeMap<String, String>> {
        let state = self.state();
        let session = state.session()?;
        Ok(session.bundle.masked(&self.options.known_keys))
    }

    /// Set `name` to `value`, re-encrypt the whole bundle and persist it.
    ///
    /// `passphrase` is checked against the stored hash again; the unlock
    /// that opened this session is not trusted on its own.
    pub fn update_key(&self, name: &str, value: &str, passphrase: &str) -> Result<()> {
        validate_key_name(name)?;
        self.commit(passphrase, |bundle| {
            bundle.api_keys.insert(name.to_string(), value.to_string());
            true
        })?;
        info!(key = %name, "credential updated");
        Ok(())
    }

    /// Remove `name` from the vault.  Returns whether it was present.
    pub fn remove_key(&self, name: &str, passphrase: &str) -> Result<bool> {
        let removed = self.commit(passphrase, |bundle| bundle.api_keys.remove(name).is_some())?;
        if removed {
            info!(key = %name, "credential removed");
        }
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the options this handle was built with.
    pub fn options(&self) -> &VaultOptions {
        &self.options
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Lock the state mutex.
    ///
    /// The session is only replaced after a successful write, so the
    /// state behind a poisoned lock is still consistent.
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the vault file, check `passphrase` and decrypt the bundle.
    fn load_session(&self, passphrase: &str) -> Result<Session> {
        let file = format::read_vault(&self.path)?;

        if !verify_password(passphrase.as_bytes(), &file.meta.password_hash)? {
            warn!(path = %self.path.display(), "unlock rejected: passphrase mismatch");
            return Err(VaultError::Authentication);
        }

        let plaintext = decrypt(&file.data, passphrase.as_bytes()).map_err(|e| match e {
            VaultError::Integrity => {
                warn!(path = %self.path.display(), "unlock rejected: payload failed integrity check");
                VaultError::Authentication
            }
            other => other,
        })?;
        let bundle = SecretBundle::from_json(&plaintext)?;

        Ok(Session {
            meta: file.meta,
            bundle,
        })
    }

    /// Re-authenticate, apply `change` to a copy of the bundle, write the
    /// copy to disk, and only then swap it in.
    ///
    /// `change` returns `false` when it did nothing; no write happens then.
    fn commit<F>(&self, passphrase: &str, change: F) -> Result<bool>
    where
        F: FnOnce(&mut SecretBundle) -> bool,
    {
        let mut state = self.state();
        let session = state.session()?;

        if !verify_password(passphrase.as_bytes(), &session.meta.password_hash)? {
            warn!(path = %self.path.display(), "write rejected: passphrase mismatch");
            return Err(VaultError::Authentication);
        }

        let mut next = session.bundle.clone();
        if !change(&mut next) {
            return Ok(false);
        }
        next.last_updated = Utc::now();

        let file = VaultFile {
            meta: VaultMeta {
                updated_at: Some(next.last_updated),
                ..session.meta.clone()
            },
            data: encrypt(&next.to_json()?, passphrase.as_bytes())?,
        };
        format::write_vault(&self.path, &file)?;
        debug!(path = %self.path.display(), "vault rewritten");

        *state = State::Unlocked(Session {
            meta: file.meta,
            bundle: next,
        });
        Ok(true)
    }
}

impl fmt::Debug for VaultStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.status();
        f.debug_struct("VaultStore")
            .field("path", &self.path)
            .field("initialized", &status.initialized)
            .field("unlocked", &status.unlocked)
            .finish()
    }
}
