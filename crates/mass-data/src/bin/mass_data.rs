//! Bulk test data generator.
//!
//! This binary delegates to `mass_data::cli` for parsing and generation,
//! keeping the CLI behaviour testable without spawning a process.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use mass_data::TracingErrorReporter;
use mass_data::cli::{CliError, ParseOutcome, parse_args, run, success_message, usage};
use mockable::DefaultClock;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut stderr = io::stderr().lock();
            if let Err(write_err) = writeln!(stderr, "{err}") {
                drop(write_err);
            }
            if err.shows_usage() {
                write_text(&mut stderr, &usage());
            }
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> Result<(), CliError> {
    match parse_args(env::args().skip(1))? {
        ParseOutcome::Help(text) => {
            write_text(&mut io::stdout().lock(), &text);
            Ok(())
        }
        ParseOutcome::Options(options) => {
            let summary = run(&options, Arc::new(DefaultClock), &TracingErrorReporter)?;
            let message = success_message(&summary);
            if let Err(err) = writeln!(io::stdout().lock(), "{message}") {
                drop(err);
            }
            Ok(())
        }
    }
}

fn write_text(out: &mut impl Write, text: &str) {
    if let Err(err) = out.write_all(text.as_bytes()) {
        drop(err);
    }
}
