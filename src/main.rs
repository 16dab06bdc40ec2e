mod cli;
mod output;
mod runner;

use crate::cli::Cli;
use crate::runner::run_command;
use clap::Parser;
use faq_resolver::{CLIENT_ERROR_BODY, ResolverError};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    match real_main() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) if err.is_client_error() => {
            println!("{CLIENT_ERROR_BODY}");
            eprintln!("error: {err}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn real_main() -> Result<bool, ResolverError> {
    let cli = Cli::parse();
    let report = run_command(&cli)?;
    output::print_report(&cli.output, &report)?;
    Ok(report.succeeded())
}
