//! # Scoped Resource Guards
//!
//! File: harness/src/common/docker/guard.rs
//!
//! ## Overview
//!
//! Every container, volume, and ephemeral image a scenario creates must be
//! released on all of that scenario's exit paths, including assertion
//! panics, or a long test run leaks daemon resources. This module expresses
//! that rule as drop guards: acquiring the resource hands back a guard, and
//! the guard's `Drop` releases the resource unconditionally.
//!
//! ## Architecture
//!
//! - **`ContainerGuard`**: wraps a container ID; `Drop` runs
//!   `lifecycle::clean_container`. `clean(self)` releases early and
//!   explicitly, for scenarios that remove a container mid-flight (the
//!   volume-durability scenario removes its first container before starting
//!   the second).
//! - **`VolumeGuard`** / **`ImageGuard`**: the same shape over
//!   `volumes::remove_volume` and `images::delete_image`.
//!
//! The release calls are async but `Drop` is not, so the guards re-enter
//! the runtime with `tokio::task::block_in_place` + `Handle::block_on`.
//! That requires the multi-threaded runtime flavor, which every scenario
//! declares (`#[tokio::test(flavor = "multi_thread")]`). Release failures
//! are logged, never panicked over: a scenario's own verdict must not be
//! overwritten by a teardown hiccup, and panicking in `Drop` during an
//! unwind would abort the whole test process.
//!
//! Drop order is reverse declaration order, so a scenario that declares its
//! volume guard before its container guard gets the container removed
//! first, then the volume, matching the dependency between them.
//!
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tokio::runtime::Handle;
use tokio::task;
use tracing::warn;

use crate::core::error::Result;

use super::images::delete_image;
use super::lifecycle::clean_container;
use super::volumes::remove_volume;

/// Runs an async release operation from a `Drop` implementation.
///
/// Never panics: missing runtime, single-threaded runtime, and release
/// errors all degrade to a warning, leaving the resource for a manual
/// `docker rm`/`rmi`/`volume rm`.
fn release_blocking<F>(kind: &str, name: &str, release: F)
where
    F: Future<Output = Result<()>>,
{
    let Ok(handle) = Handle::try_current() else {
        warn!("No async runtime available to release {} '{}'", kind, name);
        return;
    };
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        task::block_in_place(|| handle.block_on(release))
    }));
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Failed to release {} '{}': {:#}", kind, name, e),
        Err(_) => warn!(
            "Runtime refused blocking release of {} '{}'; use a multi-threaded test runtime",
            kind, name
        ),
    }
}

/// Owns a container for the duration of one scenario.
#[derive(Debug)]
pub struct ContainerGuard {
    id: String,
    released: bool,
}

impl ContainerGuard {
    /// Takes ownership of a container created by `lifecycle::run_container`.
    pub fn new(id: String) -> Self {
        Self {
            id,
            released: false,
        }
    }

    /// The guarded container's ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Releases the container now instead of at scope exit.
    ///
    /// Consumes the guard; `Drop` then has nothing left to do.
    pub async fn clean(mut self) -> Result<()> {
        self.released = true;
        clean_container(&self.id).await
    }
}

impl Drop for ContainerGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        release_blocking("container", &self.id, clean_container(&self.id));
    }
}

/// Owns a named volume for the duration of one scenario.
#[derive(Debug)]
pub struct VolumeGuard {
    name: String,
}

impl VolumeGuard {
    /// Takes ownership of a volume created by `volumes::create_volume`.
    pub fn new(name: String) -> Self {
        Self { name }
    }

    /// The guarded volume's name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for VolumeGuard {
    fn drop(&mut self) {
        release_blocking("volume", &self.name, remove_volume(&self.name));
    }
}

/// Owns an ephemeral image for the duration of one scenario.
#[derive(Debug)]
pub struct ImageGuard {
    tag: String,
}

impl ImageGuard {
    /// Takes ownership of an image built by `images::build_image`.
    pub fn new(tag: String) -> Self {
        Self { tag }
    }

    /// The guarded image's tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl Drop for ImageGuard {
    fn drop(&mut self) {
        release_blocking("image", &self.tag, delete_image(&self.tag));
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    /// A guard released explicitly must not attempt a second release from
    /// `Drop`. Without a daemon the second release would fail loudly inside
    /// `release_blocking`; the flag makes `Drop` a no-op instead, and the
    /// scenario suite exercises the full path against a live daemon.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_cleaned_container_guard_skips_drop_release() {
        let guard = ContainerGuard {
            id: "already-gone".to_string(),
            released: true,
        };
        assert_eq!(guard.id(), "already-gone");
        drop(guard);
    }
}
