//! `i2p-manager`: launch and supervise a local I2P router and its
//! Firefox profile, from the command line or a terminal dashboard.

mod cli;
mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, GlobalOpts};
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // The dashboard owns the terminal, so it logs to a file instead
    let log_guard = if cli.command.is_none() {
        Some(i2pm_tui::init_file_logging(
            &dashboard_log_file(&cli.global),
            cli.global.verbose,
        ))
    } else {
        init_tracing(cli.global.verbose);
        None
    };

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        drop(log_guard);
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn dashboard_log_file(global: &GlobalOpts) -> PathBuf {
    global
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("i2p-manager.log"))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        None => commands::dashboard::handle().await,
        Some(cmd) => commands::dispatch(cmd, &cli.global).await,
    }
}
