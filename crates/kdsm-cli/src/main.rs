#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;
mod telemetry;

use std::process;

use anyhow::Context;
use kdsm_client::KdsmClient;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "kdsm_cli::startup";
pub const TRACING_TARGET_COMMAND: &str = "kdsm_cli::command";
pub const TRACING_TARGET_CONFIG: &str = "kdsm_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    let error = format!("{error:#}");
    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_COMMAND,
            error = %error,
            "command failed"
        );
    } else {
        eprintln!("Error: {error}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing()?;
    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        pid = process::id(),
        "starting kdsm"
    );
    cli.log();

    let client = KdsmClient::new(cli.client).context("invalid client configuration")?;
    command::execute(&client, cli.command).await
}
