//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use std::collections::BTreeMap;

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::EMPTY_MARKER;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print masked credentials (Name, Value).  Unset entries are dimmed.
pub fn print_masked_table(masked: &BTreeMap<String, String>) {
    if masked.is_empty() {
        info("No credentials in this vault yet.");
        tip("Run `credvault set <KEY>` to add your first credential.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Value"]);

    for (name, value) in masked {
        let shown = if value == EMPTY_MARKER {
            style(value).dim().to_string()
        } else {
            value.clone()
        };
        table.add_row(vec![name.clone(), shown]);
    }

    println!("{table}");
}
