//! usrgrp-reader binary entry point.
//!
//! Parses arguments, installs the stderr log subscriber, runs one query
//! against a fresh snapshot and maps failures to the exit status.
//!
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use usrgrp_reader::AccountsError;
use usrgrp_reader::app::cli::{self, Cli};

/// Log to stderr so query output on stdout stays pipeable. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Program entry point: exit 2 for a lookup miss, 1 for any other error.
fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let stdout = std::io::stdout();
    match cli::run(&args, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("usrgrp-reader: {err:#}");
            match err.downcast_ref::<AccountsError>() {
                Some(AccountsError::NotFound { .. }) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
