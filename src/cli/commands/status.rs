//! `credvault status`: report whether a vault exists.

use console::style;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{Result, VaultError};

/// Execute the `status` command.
pub fn execute(cli: &Cli, json: bool) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    let status = ctx.store().status();

    if json {
        let out = serde_json::to_string_pretty(&status)
            .map_err(|e| VaultError::SerializationError(e.to_string()))?;
        println!("{out}");
        return Ok(());
    }

    println!("{} {}", style("Vault:").bold(), ctx.vault_path.display());
    if status.initialized {
        output::success("Initialized (locked)");
    } else {
        output::info("Not initialized");
        output::tip("Run `credvault init` to create a vault.");
    }
    Ok(())
}
