//! Thin `tracing-subscriber` initializer, grounded on the teacher's
//! `logging.rs`. A library never installs a global subscriber implicitly;
//! callers opt in by invoking [`init`] themselves.

use tracing_subscriber::EnvFilter;

/// Verbosity level a caller selects; translated into an `EnvFilter` default
/// that `RUST_LOG` can still override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Debug,
    Trace,
}

impl Verbosity {
    fn default_directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }
}

/// Installs a global `tracing` subscriber. Returns an error if one was
/// already installed; callers that might run this more than once (tests,
/// repeated library entry points) should ignore that error.
pub fn init(verbosity: Verbosity) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
}
