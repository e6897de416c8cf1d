//! # Volume Operations
//!
//! File: harness/src/common/docker/volumes.rs
//!
//! ## Overview
//!
//! Named-volume lifecycle for the scenarios that exercise storage
//! durability: a volume outlives any one container, can be bound into
//! several in sequence, and is removed explicitly by the owning scenario.
//!
use crate::core::error::{HarnessError, Result};
use anyhow::{anyhow, Context};
use bollard::volume::{CreateVolumeOptions, RemoveVolumeOptions};
use tracing::{debug, info, instrument};

use super::connect::connect_docker;

/// Creates a named volume and returns its name as reported by the daemon.
///
/// # Errors
///
/// * `HarnessError::DockerApi` - For daemon errors; volume creation failing
///   is a setup failure for the scenario.
#[instrument(skip(name), fields(volume = %name))]
pub async fn create_volume(name: &str) -> Result<String> {
    let docker = connect_docker().await?;

    let options = CreateVolumeOptions::<String> {
        name: name.to_string(),
        ..Default::default()
    };
    let volume = docker
        .create_volume(options)
        .await
        .map_err(|e| anyhow!(HarnessError::DockerApi { source: e }))
        .with_context(|| format!("Failed to create volume '{}'", name))?;

    info!("Volume '{}' created.", volume.name);
    Ok(volume.name)
}

/// Removes a named volume.
///
/// Force-removes so that a volume left behind by a failed scenario does not
/// poison the next run. A volume that is already gone counts as removed.
///
/// # Errors
///
/// * `HarnessError::DockerApi` - For daemon errors other than "not found",
///   e.g. the volume is still attached to a container.
#[instrument(skip(name), fields(volume = %name))]
pub async fn remove_volume(name: &str) -> Result<()> {
    let docker = connect_docker().await?;

    match docker
        .remove_volume(name, Some(RemoveVolumeOptions { force: true }))
        .await
    {
        Ok(()) => {
            info!("Volume '{}' removed.", name);
            Ok(())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            debug!("Volume '{}' already removed.", name);
            Ok(())
        }
        Err(e) => Err(anyhow!(HarnessError::DockerApi { source: e })
            .context(format!("Failed to remove volume '{}'", name))),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    // Volume create/remove needs a live daemon; the volume-durability and
    // forced-unmount scenarios in `tests/docker_api.rs` cover both calls.
}
