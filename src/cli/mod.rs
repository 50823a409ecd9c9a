//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::VaultStore;

/// Environment variable checked for the master passphrase before prompting.
pub const PASSPHRASE_ENV: &str = "CREDVAULT_PASSPHRASE";

/// Credvault CLI: encrypted API credential vault.
#[derive(Parser)]
#[command(
    name = "credvault",
    about = "Encrypted vault for API credentials",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file to use (default: <vault_dir>/<vault_file> from settings)
    #[arg(long, global = true, env = "CREDVAULT_VAULT")]
    pub vault: Option<String>,

    /// Settings file to load (default: ./.credvault.toml)
    #[arg(long, global = true, env = "CREDVAULT_CONFIG")]
    pub config: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault protected by a master passphrase
    Init,

    /// Show whether a vault exists at the configured path
    Status {
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every known and stored credential, masked
    List,

    /// Print the raw value of a credential
    Get {
        /// Credential name (e.g. GEMINI_API_KEY)
        key: String,
    },

    /// Set a credential (add or update)
    Set {
        /// Credential name (e.g. GEMINI_API_KEY)
        key: String,
        /// Credential value (omit for interactive prompt or piped stdin)
        value: Option<String>,
    },

    /// Remove a credential
    Unset {
        /// Credential name
        key: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Where the vault lives and how it is configured for this invocation.
pub struct Context {
    pub settings: Settings,
    pub vault_path: PathBuf,
    pub vault_dir: PathBuf,
}

impl Context {
    /// Resolve settings and vault paths from the CLI arguments.
    ///
    /// `--config` overrides `./.credvault.toml`; `--vault` overrides the
    /// path built from the settings.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;

        let settings = match &cli.config {
            Some(path) => Settings::load_file(Path::new(path))?,
            None => Settings::load(&cwd)?,
        };

        let vault_path = match &cli.vault {
            Some(path) => cwd.join(path),
            None => settings.vault_path(&cwd),
        };
        let vault_dir = vault_path
            .parent()
            .map_or_else(|| cwd.clone(), Path::to_path_buf);

        debug!(vault = %vault_path.display(), "resolved vault path");

        Ok(Self {
            settings,
            vault_path,
            vault_dir,
        })
    }

    /// A fresh, locked store handle for the resolved vault.
    pub fn store(&self) -> VaultStore {
        VaultStore::new(self.vault_path.clone(), self.settings.vault_options())
    }

    /// Open the store and unlock it with the master passphrase.
    ///
    /// Fails with `NotInitialized` before prompting when there is no vault.
    /// The passphrase is returned so writes can present it again.
    pub fn unlock(&self) -> Result<(VaultStore, Zeroizing<String>)> {
        let store = self.store();
        if !store.status().initialized {
            output::tip("Run `credvault init` to create a vault first.");
            return Err(VaultError::NotInitialized(self.vault_path.clone()));
        }

        let passphrase = prompt_passphrase()?;
        match store.unlock(&passphrase) {
            Ok(()) => {
                self.audit("unlock", None, "ok");
                Ok((store, passphrase))
            }
            Err(e) => {
                self.audit("unlock", None, "denied");
                Err(e)
            }
        }
    }

    /// Append to the audit log next to the vault, if the feature is enabled.
    pub fn audit(&self, op: &str, key: Option<&str>, outcome: &str) {
        #[cfg(feature = "audit-log")]
        crate::audit::log_audit(&self.vault_dir, op, key, outcome);

        #[cfg(not(feature = "audit-log"))]
        let _ = (op, key, outcome);
    }
}

/// Get the master passphrase, trying in order:
/// 1. `CREDVAULT_PASSPHRASE` env var (CI/CD)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_passphrase() -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault passphrase")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new passphrase with confirmation (used during `init`).
///
/// Also respects `CREDVAULT_PASSPHRASE` for scripted/CI usage.
/// Enforces `min_len` characters.
pub fn prompt_new_passphrase(min_len: usize) -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_env() {
        if pw.chars().count() < min_len {
            return Err(VaultError::WeakPassphrase(min_len));
        }
        return Ok(pw);
    }

    loop {
        let passphrase = dialoguer::Password::new()
            .with_prompt("Choose vault passphrase")
            .with_confirmation(
                "Confirm vault passphrase",
                "Passphrases do not match, try again",
            )
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("passphrase prompt: {e}")))?;

        if passphrase.chars().count() < min_len {
            output::warning(&format!(
                "Passphrase must be at least {min_len} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(passphrase));
    }
}

fn passphrase_from_env() -> Option<Zeroizing<String>> {
    match std::env::var(PASSPHRASE_ENV) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}
