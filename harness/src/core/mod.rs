//! # Harness Core Infrastructure
//!
//! File: harness/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure components that provide
//! foundational functionality for the harness: configuration, error
//! management, and logging setup.
//!
//! ## Architecture
//!
//! - `config`: Subject image reference and polling policy from the environment
//! - `error`: Error types and the shared `Result` alias
//! - `logging`: Once-guarded tracing subscriber setup for test processes
//!
//! ## Usage
//!
//! ```rust
//! use mqharness::core::config::image_name;
//! use mqharness::core::error::{HarnessError, Result};
//! use mqharness::core::logging;
//! ```
//!
pub mod config;
pub mod error;
pub mod logging;
