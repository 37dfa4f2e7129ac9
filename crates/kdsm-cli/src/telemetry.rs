//! Tracing initialization and configuration.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes the tracing subscriber for structured logging.
///
/// Logs are written to stderr so that command output on stdout stays
/// machine-readable. The log level can be configured via the `RUST_LOG`
/// environment variable and defaults to `info`.
///
/// ```bash
/// RUST_LOG=debug kdsm encrypt "hello"
/// RUST_LOG=kdsm_client=trace kdsm roundtrip "hello"
/// ```
///
/// # Errors
///
/// Returns an error if the tracing subscriber fails to initialize.
pub(crate) fn init_tracing() -> anyhow::Result<()> {
    let env_filter = create_env_filter()?;
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    Ok(())
}

/// Creates an environment filter for tracing.
fn create_env_filter() -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}"))
}
