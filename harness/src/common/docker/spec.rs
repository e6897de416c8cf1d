//! # Container Configuration
//!
//! File: harness/src/common/docker/spec.rs
//!
//! ## Overview
//!
//! This module defines [`ContainerSpec`], the per-scenario description of a
//! container to run: image reference, environment assignments, and the
//! optional knobs individual scenarios need (hostname, entrypoint override,
//! exposed ports, capability additions, bind mounts). A spec is built with
//! `with_*` methods and is immutable once handed to container creation.
//!
//! ## Architecture
//!
//! `ContainerSpec` is deliberately a plain value type. The translation into
//! the Docker API's `Config`/`HostConfig` pair happens in one place,
//! [`ContainerSpec::to_config`], so every scenario's container is created
//! with identical conventions: detached, no TTY, no attached streams (the
//! harness reads output through the logs endpoint, never a live stream).
//!
//! Environment variables are carried as preformatted `KEY=VALUE` strings,
//! which is the shape the Docker API takes and the shape the subject's
//! documented contract is written in.
//!
//! ## Usage
//!
//! ```rust
//! use mqharness::common::docker::spec::ContainerSpec;
//! use mqharness::core::config::image_name;
//!
//! let spec = ContainerSpec::new(image_name())
//!     .with_env("LICENSE=accept")
//!     .with_env("MQ_QMGR_NAME=qm1")
//!     .with_exposed_port("1414/tcp");
//! ```
//!
use std::collections::HashMap;

use bollard::container::Config;
use bollard::models::HostConfig;

/// Description of a container to create for one scenario.
///
/// Immutable once passed to `lifecycle::run_container`; scenarios that need
/// a second container build a second spec (or clone and extend one).
#[derive(Debug, Clone, Default)]
pub struct ContainerSpec {
    /// Image reference to run.
    pub image: String,
    /// Environment assignments in `KEY=VALUE` form, in insertion order.
    pub env: Vec<String>,
    /// Optional container hostname. The subject derives a default
    /// queue-manager name from this.
    pub hostname: Option<String>,
    /// Optional entrypoint override, used by the failure-injection scenarios.
    pub entrypoint: Option<Vec<String>>,
    /// Ports to expose, in `port/proto` form (e.g. `1414/tcp`). No host
    /// bindings are created; scenarios talk to the container via exec.
    pub exposed_ports: Vec<String>,
    /// Linux capabilities to add (e.g. `SYS_ADMIN` for the unmount scenario).
    pub cap_add: Vec<String>,
    /// Bind mounts in the Docker `source:target` string form.
    pub binds: Vec<String>,
}

impl ContainerSpec {
    /// Creates a spec for the given image with no further configuration.
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }

    /// Appends one `KEY=VALUE` environment assignment.
    #[must_use]
    pub fn with_env(mut self, assignment: impl Into<String>) -> Self {
        self.env.push(assignment.into());
        self
    }

    /// Sets the container hostname.
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Overrides the image entrypoint with the given argv.
    #[must_use]
    pub fn with_entrypoint(mut self, argv: &[&str]) -> Self {
        self.entrypoint = Some(argv.iter().map(|s| (*s).to_string()).collect());
        self
    }

    /// Exposes a container port (`port/proto`).
    #[must_use]
    pub fn with_exposed_port(mut self, port: impl Into<String>) -> Self {
        self.exposed_ports.push(port.into());
        self
    }

    /// Adds a Linux capability.
    #[must_use]
    pub fn with_cap(mut self, cap: impl Into<String>) -> Self {
        self.cap_add.push(cap.into());
        self
    }

    /// Adds a bind mount (`source:target`), e.g. a named volume onto the
    /// subject's data directory.
    #[must_use]
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.binds.push(bind.into());
        self
    }

    /// Translates this spec into the Docker API's creation config.
    ///
    /// Containers are always created detached with no TTY; the harness
    /// observes them through exec, logs and archive copy-out only.
    pub(crate) fn to_config(&self) -> Config<String> {
        // Exposed ports are a map whose values are empty objects in the API.
        let exposed_ports: HashMap<String, HashMap<(), ()>> = self
            .exposed_ports
            .iter()
            .map(|p| (p.clone(), HashMap::new()))
            .collect();

        let host_config = HostConfig {
            binds: none_if_empty(self.binds.clone()),
            cap_add: none_if_empty(self.cap_add.clone()),
            ..Default::default()
        };

        Config {
            image: Some(self.image.clone()),
            env: none_if_empty(self.env.clone()),
            hostname: self.hostname.clone(),
            entrypoint: self.entrypoint.clone(),
            exposed_ports: if exposed_ports.is_empty() {
                None
            } else {
                Some(exposed_ports)
            },
            host_config: Some(host_config),
            attach_stdout: Some(false),
            attach_stderr: Some(false),
            attach_stdin: Some(false),
            tty: Some(false),
            ..Default::default()
        }
    }
}

/// Maps an empty Vec to `None`, matching the Docker API's treatment of
/// absent versus empty lists.
fn none_if_empty<T>(v: Vec<T>) -> Option<Vec<T>> {
    if v.is_empty() {
        None
    } else {
        Some(v)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_spec_converts_to_bare_config() {
        let config = ContainerSpec::new("subject:latest").to_config();
        assert_eq!(config.image.as_deref(), Some("subject:latest"));
        assert!(config.env.is_none());
        assert!(config.hostname.is_none());
        assert!(config.entrypoint.is_none());
        assert!(config.exposed_ports.is_none());
        let host = config.host_config.expect("host config always present");
        assert!(host.binds.is_none());
        assert!(host.cap_add.is_none());
        assert_eq!(config.tty, Some(false));
    }

    #[test]
    fn test_full_spec_round_trips_all_fields() {
        let spec = ContainerSpec::new("subject:latest")
            .with_env("LICENSE=accept")
            .with_env("MQ_QMGR_NAME=qm1")
            .with_hostname("qmhost")
            .with_entrypoint(&["bash", "-c", "exec runit"])
            .with_exposed_port("1414/tcp")
            .with_cap("SYS_ADMIN")
            .with_bind("vol:/mnt/mqm");
        let config = spec.to_config();

        assert_eq!(
            config.env.as_deref(),
            Some(&["LICENSE=accept".to_string(), "MQ_QMGR_NAME=qm1".to_string()][..])
        );
        assert_eq!(config.hostname.as_deref(), Some("qmhost"));
        assert_eq!(
            config.entrypoint.as_deref(),
            Some(
                &[
                    "bash".to_string(),
                    "-c".to_string(),
                    "exec runit".to_string()
                ][..]
            )
        );
        assert!(config
            .exposed_ports
            .as_ref()
            .expect("port exposed")
            .contains_key("1414/tcp"));
        let host = config.host_config.expect("host config always present");
        assert_eq!(host.cap_add.as_deref(), Some(&["SYS_ADMIN".to_string()][..]));
        assert_eq!(host.binds.as_deref(), Some(&["vol:/mnt/mqm".to_string()][..]));
    }

    /// Environment assignments keep their insertion order; the subject's
    /// contract is order-sensitive in principle (later assignments win).
    #[test]
    fn test_env_preserves_order() {
        let spec = ContainerSpec::new("subject:latest")
            .with_env("A=1")
            .with_env("B=2")
            .with_env("A=3");
        assert_eq!(spec.env, vec!["A=1", "B=2", "A=3"]);
    }
}
