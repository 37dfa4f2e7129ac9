//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── client: KdsmConfig   # API key, base URL, user agent
//! └── command: Command     # encrypt | decrypt | roundtrip
//! ```
//!
//! Client options can be provided via CLI arguments or environment variables.

use clap::{Parser, Subcommand};
use kdsm_client::KdsmConfig;

use crate::TRACING_TARGET_CONFIG;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "kdsm")]
#[command(about = "Encrypt and decrypt messages with the KDSM service")]
#[command(version)]
pub struct Cli {
    /// Service connection configuration.
    #[clap(flatten)]
    pub client: KdsmConfig,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Operations exposed on the command line.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Encrypt a message.
    Encrypt {
        /// Plaintext to encrypt.
        message: String,
        /// Key to encrypt with; the service generates one when omitted.
        #[arg(long)]
        key: Option<String>,
    },
    /// Decrypt a message.
    Decrypt {
        /// Ciphertext returned by a previous encrypt.
        encrypted_message: String,
        /// Key the message was encrypted with.
        #[arg(long)]
        key: String,
    },
    /// Encrypt a message, then decrypt the result.
    Roundtrip {
        /// Plaintext to encrypt.
        message: String,
    },
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            base_url = %self.client.base_url,
            user_agent = %self.client.effective_user_agent(),
            features = ?Self::enabled_features(),
            "Client configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
