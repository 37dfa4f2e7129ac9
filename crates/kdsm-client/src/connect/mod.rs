//! KDSM client module.
//!
//! This module provides the main client interface for the service. It wraps
//! the `reqwest` crate and owns the configuration and header set shared by
//! every request.

mod client;
mod config;

pub use client::{API_KEY_HEADER, KdsmClient, TRACING_TARGET};
pub use config::{DEFAULT_BASE_URL, KdsmConfig};
