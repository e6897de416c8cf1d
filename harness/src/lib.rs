//! # mqharness
//!
//! File: harness/src/lib.rs
//!
//! ## Overview
//!
//! Black-box integration-test harness for the MQ queue-manager container
//! image. The library holds the shared helper layers; the behaviors under
//! test live in the `tests/` suite as independent scenarios, each of which
//! builds a container configuration, drives the subject through the Docker
//! Engine API, polls for readiness or termination, and asserts on exit
//! codes, log content, and files copied out of the container filesystem.
//!
//! The subject image is an external artifact. Nothing in this crate
//! implements messaging behavior; it only sets the subject's documented
//! environment variables and observes their effects.
//!
//! ## Architecture
//!
//! - [`core`]: configuration, error types, logging setup.
//! - [`common`]: Docker interactions, archive handling, log inspection.
//!
//! ## Usage
//!
//! The scenario suite requires a running Docker daemon and the subject
//! image (`TEST_IMAGE`), so it is `#[ignore]`d by default:
//!
//! ```bash
//! # Helper-level unit tests only
//! cargo test
//!
//! # Full scenario suite against an image
//! TEST_IMAGE=ibmcom/mq:latest cargo test -- --ignored
//! ```
//!

/// Shared utility layers: Docker, archives, log inspection.
pub mod common;
/// Core infrastructure: config, errors, logging.
pub mod core;

// The error vocabulary is used in every signature; surface it at the root.
pub use crate::core::error::{HarnessError, Result};
