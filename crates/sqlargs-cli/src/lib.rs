mod check;
mod cli;
mod config;
mod facts;
mod placeholders;
mod report;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `sqlargs=debug`).
const LOG_ENV: &str = "SQLARGS_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded (tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    init_logging();

    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Check(args) => check::run(args),
        cli::Command::Placeholders(args) => placeholders::run(args),
    }
}
