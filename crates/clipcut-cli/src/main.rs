//! clipcut — CLI wrapper around the pipeline scheduler.
//!
//! Mirrors the control protocol 1:1 (§6): `run-step` is `POST
//! /pipeline/step`, `reset` is `POST /pipeline/reset-steps`, `status` is
//! `GET /pipeline/status`, `result` is `GET /pipeline/result`. `run-until`
//! adds `executeUntil` (§4.I) as a convenience the HTTP shell the spec
//! excludes would otherwise have to compose client-side.

mod cli;
mod config;
mod input;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::Cli;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: logging already initialized");
    }

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(cli::run(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            match err.downcast_ref::<clipcut_core::ClipcutError>() {
                Some(clipcut_err) => ExitCode::from(clipcut_err.exit_code() as u8),
                None => ExitCode::FAILURE,
            }
        }
    }
}
