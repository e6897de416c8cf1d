//! # Harness Error Types
//!
//! File: harness/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the harness. It
//! provides a consistent approach to error management with detailed error
//! information and context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `HarnessError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The variants map directly onto the failure taxonomy of the test suite:
//! - Setup failures (daemon connection, container/image/volume creation)
//! - Timeout failures (readiness or termination not observed within bound)
//! - Archive failures (copied-out files that don't unpack as expected)
//!
//! Assertion failures are *not* errors; scenarios express those with the
//! standard assertion macros so that expected/actual values end up in the
//! test report, while deferred cleanup still runs.
//!
//! ## Examples
//!
//! ```rust
//! use mqharness::core::error::{HarnessError, Result};
//!
//! // Return a specific error type
//! # fn check(files: &[(&str, &str)]) -> Result<()> {
//! if files.iter().all(|(name, _)| *name != "Dockerfile") {
//!     return Err(HarnessError::Config("build context has no Dockerfile".into()))?;
//! }
//! # Ok(())
//! # }
//!
//! // Add context to errors using anyhow
//! use anyhow::Context;
//! use mqharness::common::docker::inspect_logs;
//! # async fn logs_of(id: &str) -> Result<String> {
//! let logs = inspect_logs(id)
//!     .await
//!     .with_context(|| format!("Failed to read logs for container '{}'", id))?;
//! # Ok(logs)
//! # }
//! ```
//!
use thiserror::Error;

/// Custom error type for the harness.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Docker API interaction failed: {source}")]
    DockerApi {
        #[from]
        source: bollard::errors::Error,
    },

    #[error("Docker operation failed: {0}")]
    Docker(String),

    #[error("Container '{name}' not found.")]
    ContainerNotFound { name: String },

    #[error("Image '{name}' not found.")]
    ImageNotFound { name: String },

    #[error("Timed out after {secs}s waiting for {what}.")]
    Timeout { what: String, secs: u64 },

    #[error("Archive error: {0}")]
    Archive(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = HarnessError::Config("build context has no Dockerfile".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: build context has no Dockerfile"
        );

        let container_not_found = HarnessError::ContainerNotFound {
            name: "qm-test".into(),
        };
        assert_eq!(
            container_not_found.to_string(),
            "Container 'qm-test' not found."
        );

        let timeout = HarnessError::Timeout {
            what: "container 'qm-test' to become ready".into(),
            secs: 120,
        };
        assert_eq!(
            timeout.to_string(),
            "Timed out after 120s waiting for container 'qm-test' to become ready."
        );
    }
}
