//! # Ephemeral Image Operations
//!
//! File: harness/src/common/docker/images.rs
//!
//! ## Overview
//!
//! This module builds and removes the **ephemeral images** some scenarios
//! need: derived images that layer a generated configuration payload (an
//! MQSC script) on top of the subject image, built from an in-memory file
//! set, tagged uniquely, and discarded when the scenario ends. It also
//! exposes the one piece of image metadata scenarios read back, the
//! subject's entrypoint, which the failure-injection scenarios wrap in a
//! shell prefix.
//!
//! ## Architecture
//!
//! Key functions implemented:
//! - **`build_image`**: Validates that the file set carries a `Dockerfile`,
//!   turns the set into a gzipped tar build context (`common::archive`),
//!   submits it to the daemon, streams the build events, and surfaces any
//!   daemon-reported build error. Returns a freshly generated `mqtest-*`
//!   tag on success.
//! - **`delete_image`**: Force-removes a built image. Safe to call once per
//!   successful build; an image that is already gone is treated as removed.
//! - **`image_entrypoint`**: The entrypoint of an image joined into a shell
//!   string.
//!
//! Tags embed a UUID so concurrent scenarios building from identical file
//! sets never collide in the daemon's image store.
//!
use crate::core::error::{HarnessError, Result};
use anyhow::{anyhow, Context};
use bollard::image::{BuildImageOptions, RemoveImageOptions};
use bollard::models::BuildInfo;
use futures_util::StreamExt;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::connect::connect_docker;
use crate::common::archive::tar::create_fileset_tar;

/// Builds an image from an in-memory file set and returns its unique tag.
///
/// # Arguments
///
/// * `files` - `(name, content)` pairs forming the build context. Must
///   include a `Dockerfile` entry; everything else is payload referenced by
///   it.
///
/// # Returns
///
/// * `Result<String>` - The generated tag (`mqtest-<uuid>`).
///
/// # Errors
///
/// * `HarnessError::Config` - If the file set has no `Dockerfile`.
/// * `HarnessError::Docker` - If the daemon reports a build failure.
/// * `HarnessError::DockerApi` - For stream or connection errors.
#[instrument(skip(files))]
pub async fn build_image(files: &[(&str, &str)]) -> Result<String> {
    ensure_dockerfile(files)?;

    let docker = connect_docker().await?;
    let context = create_fileset_tar(files).context("Failed to create build context tarball")?;
    let tag = format!("mqtest-{}", Uuid::new_v4().simple());

    info!("Building ephemeral image '{}'", tag);
    let options = BuildImageOptions {
        dockerfile: "Dockerfile".to_string(),
        t: tag.clone(),
        rm: true,
        ..Default::default()
    };

    let mut stream = docker.build_image(options, None, Some(context.into()));
    while let Some(event) = stream.next().await {
        match event {
            Ok(BuildInfo {
                error: Some(err),
                error_detail,
                ..
            }) => {
                let detail = error_detail.and_then(|d| d.message).unwrap_or_default();
                return Err(anyhow!(HarnessError::Docker(format!(
                    "Build of '{}' failed: {}. {}",
                    tag, err, detail
                ))));
            }
            Ok(BuildInfo {
                stream: Some(s), ..
            }) => {
                // Build output is diagnostics, not test output.
                debug!("build: {}", s.trim_end());
            }
            Ok(info) => debug!("build event: {:?}", info),
            Err(e) => {
                return Err(anyhow!(HarnessError::DockerApi { source: e })
                    .context(format!("Failed to process build stream for '{}'", tag)));
            }
        }
    }

    info!("Ephemeral image '{}' built.", tag);
    Ok(tag)
}

/// Removes a built ephemeral image.
///
/// An image that is already gone counts as removed, so guarded cleanup can
/// run after an explicit delete without erroring.
///
/// # Errors
///
/// * `HarnessError::Docker` - If the daemon refuses removal (Docker 409,
///   e.g. a container still references the image).
/// * `HarnessError::DockerApi` - For other daemon errors.
#[instrument(skip(tag), fields(image = %tag))]
pub async fn delete_image(tag: &str) -> Result<()> {
    let docker = connect_docker().await?;
    let options = Some(RemoveImageOptions {
        force: true,
        noprune: false,
    });

    match docker.remove_image(tag, options, None).await {
        Ok(responses) => {
            for r in responses {
                if let Some(deleted) = r.deleted {
                    debug!("Deleted layer {}", deleted);
                }
            }
            info!("Image '{}' removed.", tag);
            Ok(())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            debug!("Image '{}' already removed.", tag);
            Ok(())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 409,
            message,
        }) => {
            warn!("Conflict removing image '{}': {}", tag, message);
            Err(anyhow!(HarnessError::Docker(format!(
                "Conflict removing image '{}': {}",
                tag, message
            ))))
        }
        Err(e) => Err(anyhow!(HarnessError::DockerApi { source: e })
            .context(format!("Failed to remove image '{}'", tag))),
    }
}

/// Returns an image's entrypoint joined into a single shell string.
///
/// The failure-injection scenarios wrap the subject's entrypoint in a
/// `bash -c '...; exec <entrypoint>'` prefix, which needs the original argv
/// flattened to text.
///
/// # Errors
///
/// * `HarnessError::ImageNotFound` - If the image does not exist locally.
/// * `HarnessError::DockerApi` - For other daemon errors.
#[instrument(skip(name_or_id), fields(image = %name_or_id))]
pub async fn image_entrypoint(name_or_id: &str) -> Result<String> {
    let docker = connect_docker().await?;

    let inspected = docker
        .inspect_image(name_or_id)
        .await
        .map_err(|e| match e {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            } => anyhow!(HarnessError::ImageNotFound {
                name: name_or_id.to_string()
            }),
            _ => anyhow!(HarnessError::DockerApi { source: e })
                .context(format!("Failed to inspect image '{}'", name_or_id)),
        })?;

    let entrypoint = inspected
        .config
        .and_then(|c| c.entrypoint)
        .unwrap_or_default()
        .join(" ");
    Ok(entrypoint)
}

/// Rejects file sets that cannot possibly build: the daemon requires the
/// build instructions to be present in the context.
fn ensure_dockerfile(files: &[(&str, &str)]) -> Result<()> {
    if files.iter().any(|(name, _)| *name == "Dockerfile") {
        Ok(())
    } else {
        Err(anyhow!(HarnessError::Config(
            "build context has no Dockerfile".to_string()
        )))
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dockerfile_accepts_context_with_dockerfile() {
        let files = [
            ("Dockerfile", "FROM scratch\n"),
            ("test.mqsc", "DEFINE QLOCAL(test)\n"),
        ];
        assert!(ensure_dockerfile(&files).is_ok());
    }

    #[test]
    fn test_ensure_dockerfile_rejects_payload_only_context() {
        let files = [("test.mqsc", "DEFINE QLOCAL(test)\n")];
        let err = ensure_dockerfile(&files).expect_err("must reject");
        assert!(err.to_string().contains("no Dockerfile"));
    }
}
