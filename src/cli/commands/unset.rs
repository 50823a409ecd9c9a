//! `credvault unset`: remove a credential from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{Result, VaultError};

/// Execute the `unset` command.
pub fn execute(cli: &Cli, key: &str, force: bool) -> Result<()> {
    let ctx = Context::from_cli(cli)?;

    // Unless --force is set, ask for confirmation before removing.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove credential '{key}'?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let (store, passphrase) = ctx.unlock()?;
    let result = store.remove_key(key, &passphrase);
    store.lock();

    match result {
        Ok(true) => {
            ctx.audit("unset", Some(key), "ok");
            output::success(&format!("Removed credential '{key}'"));
        }
        Ok(false) => output::info(&format!("Credential '{key}' was not set")),
        Err(e) => {
            ctx.audit("unset", Some(key), "denied");
            return Err(e);
        }
    }

    Ok(())
}
