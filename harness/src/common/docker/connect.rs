//! # Docker Connection Helper
//!
//! File: harness/src/common/docker/connect.rs
//!
//! ## Overview
//!
//! This internal utility module provides a single, standardized function,
//! `connect_docker`, responsible for establishing a connection to the local
//! Docker daemon using default settings provided by the `bollard` crate.
//! It centralizes connection logic and error handling for use by the other
//! modules within `common::docker`.
//!
//! ## Architecture
//!
//! - Defines the asynchronous function `connect_docker`.
//! - Calls `bollard::Docker::connect_with_local_defaults()` to initiate the connection.
//! - Wraps potential connection errors from `bollard` into the harness's
//!   standard `Result` type, mapping them to `HarnessError::DockerApi` and
//!   adding context. A failed connection is a setup failure and aborts the
//!   calling scenario.
//!
use crate::core::error::{HarnessError, Result};
use anyhow::{anyhow, Context};
use bollard::Docker;
use tracing::instrument;

/// Establishes a connection to the local Docker daemon using default settings.
///
/// Connects to the daemon at its standard location (e.g.
/// `/var/run/docker.sock` on Unix) via
/// `bollard::Docker::connect_with_local_defaults`.
///
/// # Returns
///
/// * `Result<Docker>` - A `bollard::Docker` client instance on successful
///   connection.
///
/// # Errors
///
/// Returns an `Err` wrapping `HarnessError::DockerApi` if the connection
/// fails, with context suggesting the daemon may not be running.
#[instrument]
pub async fn connect_docker() -> Result<Docker> {
    Docker::connect_with_local_defaults()
        .map_err(|e| anyhow!(HarnessError::DockerApi { source: e }))
        .context("Failed to connect to Docker daemon. Is it running and accessible?")
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    /// Test successful connection to a running Docker daemon.
    /// Marked `#[ignore]` because it requires an external dependency (a
    /// running and accessible Docker daemon) which is not present in all
    /// environments. Run locally with `cargo test -- --ignored`.
    #[tokio::test]
    #[ignore = "requires a running Docker daemon"]
    async fn test_connect_docker_success() {
        let result = connect_docker().await;
        assert!(
            result.is_ok(),
            "Should connect successfully if Docker is running"
        );
    }
}
