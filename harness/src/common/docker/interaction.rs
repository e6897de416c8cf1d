//! # Container Interaction
//!
//! File: harness/src/common/docker/interaction.rs
//!
//! ## Overview
//!
//! This module provides the functions through which scenarios observe a
//! running (or exited) container: executing one-off diagnostic commands
//! inside it, retrieving its combined output stream, and copying files out
//! of its filesystem. Nothing here changes container state; the lifecycle
//! module owns that.
//!
//! ## Architecture
//!
//! Key functions implemented:
//! - **`exec_in_container`**: Runs a command as a specified in-container user
//!   via a Docker exec instance, captures combined stdout/stderr, and returns
//!   the exit code together with the trimmed output. The subject's probes
//!   (`chkmqready`, `chkmqhealthy`) and admin tools (`dspmq`, `runmqsc`) are
//!   all driven through this one function.
//! - **`inspect_logs`**: Returns the container's full stdout/stderr stream
//!   from start of life to the time of the call, as one string. Callable
//!   before or after termination; never follows.
//! - **`copy_from_container`**: Retrieves a path from the container
//!   filesystem as the tar archive stream the daemon produces. Callers
//!   unpack entries themselves (see `common::archive` and `common::logs`).
//! - **`termination_message`**: Copies the subject's termination-log file
//!   out and returns its contents, for scenarios asserting on startup
//!   failures.
//!
//! Exec output arrives as a multiplexed stream because the harness never
//! allocates a TTY; stdout and stderr chunks are concatenated in arrival
//! order, which is the same combined view `docker exec` would print.
//!
use crate::core::error::{HarnessError, Result};
use anyhow::{anyhow, Context};
use bollard::container::{DownloadFromContainerOptions, LogOutput, LogsOptions};
use bollard::exec::{CreateExecOptions, StartExecResults};
use futures_util::StreamExt;
use tracing::{debug, instrument};

use super::connect::connect_docker;
use crate::common::archive::tar::unpack_single_file;

/// Path inside the subject container where the entrypoint records why it
/// terminated.
const TERMINATION_LOG: &str = "/run/termination-log";

/// Executes a command inside a container as the given user and captures its
/// output.
///
/// # Arguments
///
/// * `name_or_id` - The target container.
/// * `user` - The in-container user to run as (e.g. `mqm`, `root`).
/// * `argv` - The command and its arguments.
///
/// # Returns
///
/// * `Result<(i64, String)>` - The command's exit code (-1 if the daemon did
///   not report one) and its combined stdout/stderr with trailing whitespace
///   trimmed.
///
/// # Errors
///
/// * `HarnessError::ContainerNotFound` - If the container does not exist (Docker 404).
/// * `HarnessError::DockerApi` - For other daemon errors, including exec
///   against a container that is no longer running (Docker 409).
#[instrument(skip(name_or_id, user, argv), fields(container = %name_or_id, user = %user))]
pub async fn exec_in_container(
    name_or_id: &str,
    user: &str,
    argv: &[&str],
) -> Result<(i64, String)> {
    let docker = connect_docker().await?;

    debug!("Exec {:?} in container '{}'", argv, name_or_id);
    let options = CreateExecOptions::<String> {
        attach_stdout: Some(true),
        attach_stderr: Some(true),
        user: Some(user.to_string()),
        cmd: Some(argv.iter().map(|s| (*s).to_string()).collect()),
        ..Default::default()
    };

    let exec = docker
        .create_exec(name_or_id, options)
        .await
        .map_err(|e| match e {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            } => anyhow!(HarnessError::ContainerNotFound {
                name: name_or_id.to_string()
            }),
            _ => anyhow!(HarnessError::DockerApi { source: e }).context(format!(
                "Failed to create exec instance in container '{}'",
                name_or_id
            )),
        })?;

    let started = docker
        .start_exec(&exec.id, None)
        .await
        .map_err(|e| anyhow!(HarnessError::DockerApi { source: e }))
        .context("Failed to start exec instance")?;

    let mut combined = Vec::new();
    match started {
        StartExecResults::Attached { mut output, .. } => {
            while let Some(chunk) = output.next().await {
                match chunk {
                    Ok(LogOutput::StdOut { message })
                    | Ok(LogOutput::StdErr { message })
                    | Ok(LogOutput::Console { message }) => {
                        combined.extend_from_slice(&message);
                    }
                    Ok(LogOutput::StdIn { .. }) => {}
                    Err(e) => {
                        return Err(anyhow!(HarnessError::DockerApi { source: e })
                            .context("Error receiving output from exec stream"));
                    }
                }
            }
        }
        StartExecResults::Detached => {
            // Streams were requested, so this arm should not be reached; if
            // it is, there is simply no output to capture.
            debug!("Exec instance '{}' started detached.", exec.id);
        }
    }

    // The exit code only becomes available once the streams have drained.
    let inspected = docker
        .inspect_exec(&exec.id)
        .await
        .map_err(|e| anyhow!(HarnessError::DockerApi { source: e }))
        .with_context(|| format!("Failed to inspect exec instance '{}'", exec.id))?;
    let exit_code = inspected.exit_code.unwrap_or(-1);

    let output = String::from_utf8_lossy(&combined).trim_end().to_string();
    debug!(
        "Exec in '{}' finished with exit code {}",
        name_or_id, exit_code
    );
    Ok((exit_code, output))
}

/// Returns the full captured stdout/stderr stream for a container.
///
/// Fetches everything from the start of the container's life to the time of
/// the call, without following. Works on running and exited containers
/// alike, which is what lets scenarios stop the subject first and then
/// assert on its complete output.
///
/// # Errors
///
/// * `HarnessError::ContainerNotFound` - If the container does not exist.
/// * `HarnessError::DockerApi` - For other daemon or stream errors.
#[instrument(skip(name_or_id), fields(container = %name_or_id))]
pub async fn inspect_logs(name_or_id: &str) -> Result<String> {
    let docker = connect_docker().await?;

    let options = LogsOptions::<String> {
        stdout: true,
        stderr: true,
        follow: false,
        tail: "all".to_string(),
        timestamps: false,
        ..Default::default()
    };

    let mut stream = docker.logs(name_or_id, Some(options));
    let mut bytes = Vec::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(log_output) => bytes.extend_from_slice(&log_output.into_bytes()),
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => {
                return Err(anyhow!(HarnessError::ContainerNotFound {
                    name: name_or_id.to_string()
                }));
            }
            Err(e) => {
                return Err(anyhow!(HarnessError::DockerApi { source: e })
                    .context(format!("Error reading logs for container '{}'", name_or_id)));
            }
        }
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Retrieves a path from the container filesystem as a tar archive.
///
/// The daemon always wraps the requested path in a tar stream, even for a
/// single file. Callers unpack it with `archive::tar::unpack_single_file`
/// or count records across entries with `logs::count_archived_lines`.
///
/// # Errors
///
/// * `HarnessError::ContainerNotFound` - If the container or path does not
///   exist (the daemon reports both as 404).
/// * `HarnessError::DockerApi` - For other daemon or stream errors.
#[instrument(skip(name_or_id, path), fields(container = %name_or_id, path = %path))]
pub async fn copy_from_container(name_or_id: &str, path: &str) -> Result<Vec<u8>> {
    let docker = connect_docker().await?;

    let options = Some(DownloadFromContainerOptions {
        path: path.to_string(),
    });
    let mut stream = docker.download_from_container(name_or_id, options);
    let mut bytes = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk
            .map_err(|e| anyhow!(HarnessError::DockerApi { source: e }))
            .with_context(|| {
                format!(
                    "Failed to copy '{}' out of container '{}'",
                    path, name_or_id
                )
            })?;
        bytes.extend_from_slice(&chunk);
    }
    debug!(
        "Copied {} archive bytes for '{}' from '{}'",
        bytes.len(),
        path,
        name_or_id
    );
    Ok(bytes)
}

/// Returns the contents of the subject's termination-log file.
///
/// The entrypoint writes a recognizable message there whenever it refuses to
/// start or fails fatally; scenarios that provoke startup failures assert
/// the message is present and non-empty.
///
/// # Errors
///
/// Propagates copy-out and unpack failures; a missing termination log
/// surfaces as `HarnessError::ContainerNotFound` from the copy.
pub async fn termination_message(name_or_id: &str) -> Result<String> {
    let archive = copy_from_container(name_or_id, TERMINATION_LOG).await?;
    let contents = unpack_single_file(&archive)
        .with_context(|| format!("Failed to unpack termination log from '{}'", name_or_id))?;
    Ok(String::from_utf8_lossy(&contents).trim_end().to_string())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    // Exec and log capture need a live daemon and a container to aim at;
    // they are exercised by the scenario suite in `tests/docker_api.rs`.
    // The archive plumbing these functions delegate to is unit-tested in
    // `common::archive::tar` and `common::logs`.
}
