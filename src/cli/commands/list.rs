//! `credvault list`: show every credential with its value masked.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    let (store, _passphrase) = ctx.unlock()?;

    let masked = store.get_masked_keys()?;
    store.lock();

    output::print_masked_table(&masked);
    Ok(())
}
