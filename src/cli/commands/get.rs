//! `credvault get`: print the raw value of one credential.

use crate::cli::{Cli, Context};
use crate::errors::{Result, VaultError};

/// Execute the `get` command.
///
/// Only the value goes to stdout, so `$(credvault get KEY)` works.
pub fn execute(cli: &Cli, key: &str) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    let (store, _passphrase) = ctx.unlock()?;

    let value = store.get_key(key)?;
    store.lock();

    match value {
        Some(value) if !value.is_empty() => {
            ctx.audit("get", Some(key), "ok");
            println!("{value}");
            Ok(())
        }
        _ => Err(VaultError::CommandFailed(format!(
            "credential '{key}' is not set"
        ))),
    }
}
