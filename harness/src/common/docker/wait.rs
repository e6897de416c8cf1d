//! # Readiness and Completion Polling
//!
//! File: harness/src/common/docker/wait.rs
//!
//! ## Overview
//!
//! This module implements the two blocking waits every scenario is built
//! around: waiting for the subject to report ready, and waiting for a
//! container to terminate. The subject exposes no push-based readiness
//! event, so bounded polling of its in-container probe is the only
//! detection mechanism available; the bound turns a wedged subject into a
//! scenario failure instead of a hung suite.
//!
//! ## Architecture
//!
//! - **`wait_for_ready`**: Repeatedly execs the readiness probe
//!   (`chkmqready`, as the `mqm` user) on a fixed interval until it exits
//!   zero or the overall deadline passes. Interval and deadline come from
//!   [`HarnessConfig`](crate::core::config::HarnessConfig), so a slow CI
//!   host can stretch them without code changes.
//! - **`wait_for_container`**: Waits on the daemon's wait endpoint for the
//!   container to reach a terminated state and returns its exit code. The
//!   Docker client reports a non-zero exit as an error value; that is folded
//!   back into the exit code, because non-zero exits are exactly what half
//!   the scenarios are waiting to observe.
//!
//! Deadline expiry maps to `HarnessError::Timeout` in both functions and is
//! fatal to the calling scenario. Cleanup still runs, via the scenario's
//! guards.
//!
use std::time::Instant;

use crate::core::config::HarnessConfig;
use crate::core::error::{HarnessError, Result};
use anyhow::anyhow;
use bollard::container::WaitContainerOptions;
use futures_util::StreamExt;
use tracing::{debug, info, instrument};

use super::connect::connect_docker;
use super::interaction::exec_in_container;

/// The subject's readiness probe, run as the queue-manager administration
/// user.
const READINESS_PROBE: &[&str] = &["chkmqready"];
const PROBE_USER: &str = "mqm";

/// Blocks until the container's readiness probe succeeds.
///
/// Retries the probe on the configured interval until it exits zero. The
/// probe is deliberately opaque: the subject decides what "ready" means
/// (queue manager started, configuration scripts applied, listeners up).
///
/// # Errors
///
/// * `HarnessError::Timeout` - If the deadline passes without a successful probe.
/// * Any error from `exec_in_container` - The probe cannot run at all, e.g.
///   because the container already exited; retrying cannot help, so this is
///   immediately fatal.
#[instrument(skip(name_or_id), fields(container = %name_or_id))]
pub async fn wait_for_ready(name_or_id: &str) -> Result<()> {
    let cfg = HarnessConfig::from_env();
    let deadline = Instant::now() + cfg.ready_timeout;

    loop {
        let (rc, _) = exec_in_container(name_or_id, PROBE_USER, READINESS_PROBE).await?;
        if rc == 0 {
            info!("Container '{}' is ready.", name_or_id);
            return Ok(());
        }
        debug!(
            "Readiness probe for '{}' returned {}, retrying...",
            name_or_id, rc
        );
        if Instant::now() >= deadline {
            return Err(anyhow!(HarnessError::Timeout {
                what: format!("container '{}' to become ready", name_or_id),
                secs: cfg.ready_timeout.as_secs(),
            }));
        }
        tokio::time::sleep(cfg.poll_interval).await;
    }
}

/// Blocks until the container terminates, returning its exit code.
///
/// # Arguments
///
/// * `name_or_id` - The container to wait for.
/// * `timeout_secs` - Overall bound on the wait.
///
/// # Returns
///
/// * `Result<i64>` - The container's exit code, zero or not.
///
/// # Errors
///
/// * `HarnessError::Timeout` - If the container is still running when the bound expires.
/// * `HarnessError::Docker` - If the wait stream ends without reporting a status.
/// * `HarnessError::DockerApi` - For other daemon errors.
#[instrument(skip(name_or_id, timeout_secs), fields(container = %name_or_id))]
pub async fn wait_for_container(name_or_id: &str, timeout_secs: u64) -> Result<i64> {
    let docker = connect_docker().await?;

    let mut stream = docker.wait_container(name_or_id, None::<WaitContainerOptions<String>>);
    let next = tokio::time::timeout(
        std::time::Duration::from_secs(timeout_secs),
        stream.next(),
    )
    .await
    .map_err(|_| {
        anyhow!(HarnessError::Timeout {
            what: format!("container '{}' to terminate", name_or_id),
            secs: timeout_secs,
        })
    })?;

    match next {
        Some(Ok(response)) => {
            debug!(
                "Container '{}' terminated with status {}",
                name_or_id, response.status_code
            );
            Ok(response.status_code)
        }
        // The client surfaces non-zero exits as an error carrying the code;
        // for the harness that is a perfectly good answer.
        Some(Err(bollard::errors::Error::DockerContainerWaitError { code, .. })) => {
            debug!(
                "Container '{}' terminated with status {}",
                name_or_id, code
            );
            Ok(code)
        }
        Some(Err(e)) => Err(anyhow!(HarnessError::DockerApi { source: e })
            .context(format!("Failed waiting for container '{}'", name_or_id))),
        None => Err(anyhow!(HarnessError::Docker(format!(
            "Wait stream for container '{}' ended without a status",
            name_or_id
        )))),
    }
}
