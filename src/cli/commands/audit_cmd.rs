//! `credvault audit`: display the audit log.
//!
//! Usage:
//!   credvault audit               # show last 50 entries
//!   credvault audit --last 20     # show last 20
//!   credvault audit --since 7d    # entries from last 7 days

use chrono::{DateTime, Duration, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{Result, VaultError};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let ctx = Context::from_cli(cli)?;

    let since_dt = since.map(parse_duration).transpose()?;

    if !ctx.vault_dir.is_dir() {
        output::info("No audit entries found.");
        return Ok(());
    }

    let audit = AuditLog::open(&ctx.vault_dir)
        .ok_or_else(|| VaultError::AuditError("failed to open audit database".into()))?;

    let entries = audit.query(last, since_dt)?;
    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);
    Ok(())
}

/// Parse a relative window like "7d", "24h" or "30m" into its start time.
fn parse_duration(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = || {
        VaultError::CommandFailed(format!(
            "invalid duration '{input}': use a format like 7d, 24h, or 30m"
        ))
    };

    let (split, _) = input.char_indices().last().ok_or_else(invalid)?;
    let (num_str, unit) = input.split_at(split);
    let num: i64 = num_str.parse().map_err(|_| invalid())?;

    let window = match unit {
        "d" => Duration::days(num),
        "h" => Duration::hours(num),
        "m" => Duration::minutes(num),
        _ => return Err(invalid()),
    };

    Ok(Utc::now() - window)
}

/// Print audit entries in a formatted table.
pub fn print_audit_table(entries: &[AuditEntry]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Credential", "Outcome"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.key_name.clone().unwrap_or_else(|| "-".to_string()),
            colorize_outcome(&entry.outcome),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

fn colorize_operation(op: &str) -> String {
    match op {
        "init" => style(op).green().to_string(),
        "set" => style(op).blue().to_string(),
        "unset" => style(op).red().to_string(),
        "unlock" | "get" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}

fn colorize_outcome(outcome: &str) -> String {
    match outcome {
        "denied" => style(outcome).red().bold().to_string(),
        _ => outcome.to_string(),
    }
}
