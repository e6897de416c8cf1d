//! # Docker Module Interface
//!
//! File: harness/src/common/docker/mod.rs
//!
//! ## Overview
//!
//! This module is the harness's interface to the container runtime. It
//! organizes the Docker Engine API interactions into logical submodules and
//! re-exports the functions scenarios compose, abstracting the underlying
//! `bollard` calls.
//!
//! ## Architecture
//!
//! - **`connect`**: Establishing the connection to the Docker daemon.
//! - **`spec`**: The immutable per-scenario container configuration value.
//! - **`lifecycle`**: Creating, starting, stopping, and cleaning containers,
//!   plus the one-shot convenience runner.
//! - **`wait`**: Bounded readiness and termination polling.
//! - **`interaction`**: Exec, log capture, and file copy-out against a
//!   running or exited container.
//! - **`images`**: Ephemeral image build/remove and entrypoint inspection.
//! - **`volumes`**: Named volume create/remove.
//! - **`guard`**: Drop guards giving every scenario
//!   release-on-every-exit-path semantics for the resources it creates.
//!
//! ## Usage
//!
//! A typical scenario composes the re-exports directly:
//!
//! ```rust
//! use mqharness::common::docker::{
//!     run_container, unique_name, wait_for_ready, ContainerGuard, ContainerSpec,
//! };
//! use mqharness::core::config::image_name;
//! use mqharness::core::error::Result;
//!
//! # async fn scenario() -> Result<()> {
//! let spec = ContainerSpec::new(image_name())
//!     .with_env("LICENSE=accept")
//!     .with_env("MQ_QMGR_NAME=qm1");
//! let ctr = ContainerGuard::new(run_container(&unique_name("golden-path"), &spec).await?);
//! wait_for_ready(ctr.id()).await?;
//! # Ok(())
//! # }
//! ```
//!

/// Handles establishing a connection to the local Docker daemon.
pub mod connect;
/// Scoped guards that release containers, volumes and images on scope exit.
pub mod guard;
/// Ephemeral image building, removal, and entrypoint inspection.
pub mod images;
/// Exec, log capture and file copy-out against containers.
pub mod interaction;
/// Container lifecycle: create/start/stop/clean and the one-shot runner.
pub mod lifecycle;
/// The immutable container configuration value scenarios build.
pub mod spec;
/// Named volume lifecycle.
pub mod volumes;
/// Bounded readiness and termination polling.
pub mod wait;

// --- Re-exports: the vocabulary scenarios are written in ---

pub use guard::{ContainerGuard, ImageGuard, VolumeGuard};
pub use images::{build_image, delete_image, image_entrypoint};
pub use interaction::{copy_from_container, exec_in_container, inspect_logs, termination_message};
pub use lifecycle::{
    clean_container, run_container, run_container_one_shot, start_container, stop_container,
    unique_name,
};
pub use spec::ContainerSpec;
pub use volumes::{create_volume, remove_volume};
pub use wait::{wait_for_container, wait_for_ready};
