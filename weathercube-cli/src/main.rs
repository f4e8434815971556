//! Binary crate for the `weathercube` daemon.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and environment
//! - Logging setup
//! - Interactive configuration
//! - Hooking the update loop up to Ctrl+C

use std::process::ExitCode;

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let cmd = cli::Cli::parse();
    if let Err(e) = cmd.run().await {
        log::error!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}
