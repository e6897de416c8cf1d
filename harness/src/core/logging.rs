//! # Harness Logging Setup
//!
//! File: harness/src/core/logging.rs
//!
//! ## Overview
//!
//! Tracing subscriber setup for test processes. Unlike a binary, the test
//! suite has no single entry point: every scenario (and every unit test that
//! wants log output) calls [`init`], and a `Once` guard makes the call
//! idempotent across whichever test happens to run first.
//!
//! Log level defaults to `info` and is overridable with `RUST_LOG`. Output
//! goes to stderr so it interleaves sanely with the test runner's own
//! reporting.
//!
use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Installs the global tracing subscriber for this test process.
///
/// Safe to call from every test; only the first call has any effect.
/// `try_init` is used so that a subscriber installed by some other harness
/// layer is tolerated rather than panicked over.
pub fn init() {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init();
    });
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    /// Calling init twice must not panic; the second call is a no-op.
    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
