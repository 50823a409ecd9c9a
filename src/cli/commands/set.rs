//! `credvault set`: add or update a credential in the vault.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{Result, VaultError};
use crate::vault::bundle::validate_key_name;

/// Execute the `set` command.
pub fn execute(cli: &Cli, key: &str, value: Option<&str>) -> Result<()> {
    // Reject bad names before asking for anything.
    validate_key_name(key)?;

    let ctx = Context::from_cli(cli)?;

    // Determine the value from one of three sources.
    let secret_value = if let Some(v) = value {
        // Source 1: Inline value on the command line.
        output::warning("Value provided on command line; it may appear in shell history.");
        Zeroizing::new(v.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end().to_string())
    } else {
        // Source 3: Interactive secure prompt (default).
        let v = dialoguer::Password::new()
            .with_prompt(format!("Enter value for {key}"))
            .allow_empty_password(true)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
        Zeroizing::new(v)
    };

    let (store, passphrase) = ctx.unlock()?;
    let existed = store.get_key(key)?.is_some();

    let result = store.update_key(key, &secret_value, &passphrase);
    store.lock();
    if let Err(e) = result {
        ctx.audit("set", Some(key), "denied");
        return Err(e);
    }

    let op_detail = if existed { "updated" } else { "added" };
    ctx.audit("set", Some(key), op_detail);
    output::success(&format!("Credential '{key}' {op_detail}"));

    Ok(())
}
