//! # Container Lifecycle Operations
//!
//! File: harness/src/common/docker/lifecycle.rs
//!
//! ## Overview
//!
//! This module provides the functions that manage the **lifecycle** of the
//! containers a scenario creates: creating and starting them from a
//! [`ContainerSpec`](super::spec::ContainerSpec), stopping them, and tearing
//! them down again. Teardown (`clean_container`) is written to be safe on
//! every exit path of a scenario, including repeated calls against a handle
//! that has already been removed.
//!
//! ## Architecture
//!
//! Key functions implemented:
//! - **`run_container`**: Creates and starts a container from a spec, returning
//!   its ID. Any failure here is a setup failure and aborts the scenario.
//! - **`start_container`** / **`stop_container`**: State transitions. The Docker
//!   API's 304 (Not Modified) response means "already in that state" and is
//!   treated as success; 404 maps to `HarnessError::ContainerNotFound`.
//! - **`clean_container`**: Stops (best effort) and force-removes the container
//!   together with its anonymous volumes. Both steps tolerate 404, so calling
//!   it twice on the same handle is not an error.
//! - **`run_container_one_shot`**: Creates a throwaway container whose
//!   entrypoint is the given command, waits (bounded) for it to exit, and
//!   returns its exit code and captured output before cleaning it up. Used
//!   where the subject image is only a convenient filesystem to run a probe in.
//! - **`unique_name`**: Per-invocation container names, so scenarios can run in
//!   parallel against one daemon and re-run after an unclean failure.
//!
//! All functions use the shared `connect::connect_docker` helper and map
//! Docker API errors to the harness's `HarnessError` types.
//!
use crate::core::error::{HarnessError, Result};
use anyhow::{anyhow, Context};
use bollard::container::{
    CreateContainerOptions, RemoveContainerOptions, StartContainerOptions, StopContainerOptions,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::connect::connect_docker;
use super::interaction::inspect_logs;
use super::spec::ContainerSpec;
use super::wait::wait_for_container;

/// Bound on how long a one-shot container may run before the helper gives up.
const ONE_SHOT_TIMEOUT_SECS: u64 = 60;

/// Generates a container name that is unique per invocation.
///
/// The prefix keeps daemon-side listings readable when a run leaks a
/// container; the UUID keeps parallel scenarios and re-runs from colliding.
pub fn unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Creates and starts a container from the given spec.
///
/// # Arguments
///
/// * `name` - The name for the new container; use [`unique_name`].
/// * `spec` - The container configuration. Not modified or retained.
///
/// # Returns
///
/// * `Result<String>` - The ID of the started container.
///
/// # Errors
///
/// * `HarnessError::ImageNotFound` - If the spec's image is not present locally (Docker 404 on create).
/// * `HarnessError::DockerApi` - For other errors creating or starting the container.
#[instrument(skip(name, spec), fields(container = %name, image = %spec.image))]
pub async fn run_container(name: &str, spec: &ContainerSpec) -> Result<String> {
    let docker = connect_docker().await?;

    info!("Creating container '{}' from image '{}'", name, spec.image);
    let options = Some(CreateContainerOptions {
        name: name.to_string(),
        platform: None,
    });
    let created = docker
        .create_container(options, spec.to_config())
        .await
        .map_err(|e| match e {
            // Create reports 404 when the image reference cannot be resolved.
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            } => anyhow!(HarnessError::ImageNotFound {
                name: spec.image.clone()
            }),
            _ => anyhow!(HarnessError::DockerApi { source: e }),
        })
        .with_context(|| format!("Failed to create container '{}'", name))?;

    for warning in &created.warnings {
        warn!("Daemon warning creating '{}': {}", name, warning);
    }

    info!("Starting container '{}' (ID: {})", name, created.id);
    docker
        .start_container(&created.id, None::<StartContainerOptions<String>>)
        .await
        .map_err(|e| anyhow!(HarnessError::DockerApi { source: e }))
        .with_context(|| format!("Failed to start container '{}'", name))?;

    Ok(created.id)
}

/// Starts a stopped container identified by name or ID.
///
/// If the container is already running this is a success (Docker 304).
///
/// # Errors
///
/// * `HarnessError::ContainerNotFound` - If the container does not exist (Docker 404).
/// * `HarnessError::DockerApi` - For other daemon errors.
#[instrument(skip(name_or_id), fields(container = %name_or_id))]
pub async fn start_container(name_or_id: &str) -> Result<()> {
    let docker = connect_docker().await?;
    info!("Attempting to start container '{}'...", name_or_id);

    match docker
        .start_container(name_or_id, None::<StartContainerOptions<String>>)
        .await
    {
        Ok(()) => {
            info!("Container '{}' started.", name_or_id);
            Ok(())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 304, .. // already running
        }) => {
            info!("Container '{}' was already started.", name_or_id);
            Ok(())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => Err(anyhow!(HarnessError::ContainerNotFound {
            name: name_or_id.to_string()
        })),
        Err(e) => Err(anyhow!(HarnessError::DockerApi { source: e })
            .context(format!("Failed to start container '{}'", name_or_id))),
    }
}

/// Stops a running container, waiting for a graceful shutdown.
///
/// The daemon sends the termination signal and escalates to a kill after the
/// timeout. An already-stopped container is a success (Docker 304). The
/// subject's clean-shutdown behavior is itself under test in several
/// scenarios, so a stop failure is fatal rather than papered over.
///
/// # Errors
///
/// * `HarnessError::ContainerNotFound` - If the container does not exist (Docker 404).
/// * `HarnessError::DockerApi` - For other daemon errors.
#[instrument(skip(name_or_id), fields(container = %name_or_id))]
pub async fn stop_container(name_or_id: &str) -> Result<()> {
    let docker = connect_docker().await?;
    info!("Attempting to stop container '{}'...", name_or_id);

    match docker
        .stop_container(name_or_id, Some(StopContainerOptions { t: 20 }))
        .await
    {
        Ok(()) => {
            info!("Container '{}' stopped.", name_or_id);
            Ok(())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 304, .. // already stopped
        }) => {
            info!("Container '{}' was already stopped.", name_or_id);
            Ok(())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => Err(anyhow!(HarnessError::ContainerNotFound {
            name: name_or_id.to_string()
        })),
        Err(e) => Err(anyhow!(HarnessError::DockerApi { source: e })
            .context(format!("Failed to stop container '{}'", name_or_id))),
    }
}

/// Stops (if necessary) and removes a container and its anonymous volumes.
///
/// Intended as the deferred teardown step for every container a scenario
/// creates. Idempotent: a handle that is already stopped, already removed,
/// or never finished starting is cleaned without error.
///
/// # Errors
///
/// * `HarnessError::DockerApi` - Only for daemon errors other than "not found".
#[instrument(skip(name_or_id), fields(container = %name_or_id))]
pub async fn clean_container(name_or_id: &str) -> Result<()> {
    let docker = connect_docker().await?;

    // Best-effort stop first so removal doesn't race a live process. 304 and
    // 404 both mean there is nothing left to stop.
    match docker
        .stop_container(name_or_id, Some(StopContainerOptions { t: 10 }))
        .await
    {
        Ok(())
        | Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 304 | 404,
            ..
        }) => {}
        Err(e) => {
            // Removal below is forced, so a failed stop is worth logging but
            // not worth failing cleanup over.
            warn!("Ignoring stop failure for '{}': {}", name_or_id, e);
        }
    }

    debug!("Removing container '{}'", name_or_id);
    let options = Some(RemoveContainerOptions {
        force: true,
        v: true, // also remove anonymous volumes owned by the container
        link: false,
    });
    match docker.remove_container(name_or_id, options).await {
        Ok(()) => {
            info!("Container '{}' removed.", name_or_id);
            Ok(())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            // Already gone; cleanup's goal is absence.
            debug!("Container '{}' already removed.", name_or_id);
            Ok(())
        }
        Err(e) => Err(anyhow!(HarnessError::DockerApi { source: e })
            .context(format!("Failed to remove container '{}'", name_or_id))),
    }
}

/// Runs a throwaway container whose entrypoint is the given command and
/// returns its exit code and captured output.
///
/// The container is created from the given image with the entrypoint
/// overridden to `argv`, waited on for up to [`ONE_SHOT_TIMEOUT_SECS`], and
/// cleaned up before this function returns, on success and failure alike.
///
/// # Arguments
///
/// * `image` - Image to run, normally the subject image.
/// * `argv` - The command to run as the container's entrypoint.
///
/// # Returns
///
/// * `Result<(i64, String)>` - Exit code and combined output with trailing
///   whitespace trimmed.
#[instrument(skip(image, argv), fields(image = %image))]
pub async fn run_container_one_shot(image: &str, argv: &[&str]) -> Result<(i64, String)> {
    let spec = ContainerSpec::new(image).with_entrypoint(argv);
    let name = unique_name("one-shot");
    let id = run_container(&name, &spec).await?;

    // Wait and collect logs before cleanup; hold the first error until the
    // container has been removed either way.
    let outcome = async {
        let rc = wait_for_container(&id, ONE_SHOT_TIMEOUT_SECS).await?;
        let output = inspect_logs(&id).await?;
        Ok::<_, anyhow::Error>((rc, output.trim_end().to_string()))
    }
    .await;

    let cleaned = clean_container(&id).await;
    let (rc, output) = outcome?;
    cleaned?;
    Ok((rc, output))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_name_has_prefix_and_is_unique() {
        let a = unique_name("golden-path");
        let b = unique_name("golden-path");
        assert!(a.starts_with("golden-path-"));
        assert_ne!(a, b);
    }

    /// Container names must be valid for the daemon: the UUID is rendered in
    /// its simple form, without hyphens or braces.
    #[test]
    fn test_unique_name_suffix_is_alphanumeric() {
        let name = unique_name("x");
        let suffix = name.strip_prefix("x-").expect("prefix present");
        assert_eq!(suffix.len(), 32);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
