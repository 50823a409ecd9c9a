//! `credvault init`: create a new, empty vault.

use crate::cli::output;
use crate::cli::{prompt_new_passphrase, Cli, Context};
use crate::errors::{Result, VaultError};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    let store = ctx.store();

    // Refuse before prompting so an existing vault is never at risk.
    if store.status().initialized {
        output::tip("Use `credvault set` to add credentials to the existing vault.");
        return Err(VaultError::AlreadyInitialized(ctx.vault_path.clone()));
    }

    let passphrase = prompt_new_passphrase(ctx.settings.min_passphrase_len)?;
    store.init(&passphrase)?;
    store.lock();

    ctx.audit("init", None, "ok");

    output::success(&format!("Vault created at {}", ctx.vault_path.display()));
    output::tip("Run `credvault set GEMINI_API_KEY` to add your first credential.");
    output::warning("There is no passphrase recovery. Losing it means losing the vault.");
    Ok(())
}
