use clap::Parser;
use credvault::cli::{commands, output, Cli, Commands};
use tracing::debug;

/// Environment variable holding the log filter (e.g. `credvault=debug`).
const LOG_ENV: &str = "CREDVAULT_LOG";

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli),
        Commands::Status { json } => commands::status::execute(&cli, json),
        Commands::List => commands::list::execute(&cli),
        Commands::Get { ref key } => commands::get::execute(&cli, key),
        Commands::Set { ref key, ref value } => {
            commands::set::execute(&cli, key, value.as_deref())
        }
        Commands::Unset { ref key, force } => commands::unset::execute(&cli, key, force),
        #[cfg(feature = "audit-log")]
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        #[cfg(not(feature = "audit-log"))]
        Commands::Audit { .. } => Err(credvault::VaultError::CommandFailed(
            "this build has no audit log (enable the `audit-log` feature)".into(),
        )),
        Commands::Completions { ref shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        debug!(error = %e, class = ?e.class(), "command failed");
        output::error(&e.public_message());
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for `get` and `completions`.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("credvault=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
