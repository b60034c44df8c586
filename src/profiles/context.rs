//! Execution context shared by every profile of a run.
use std::sync::Arc;

use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Os;
use crate::resources::icon::SourceImage;

/// Shared, read-only state for running profiles.
pub struct Context {
    /// Run configuration.
    pub config: Arc<Config>,
    /// Source image, decoded once per run.
    pub source: Arc<SourceImage>,
    /// Logger for output and profile recording.
    pub log: Arc<dyn Log>,
    /// Command executor used by the container packers.
    pub executor: Arc<dyn Executor>,
    /// Host operating system, used to tailor packer guidance.
    pub os: Os,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("source", &self.source.path())
            .field("log", &"<dyn Log>")
            .field("executor", &self.executor)
            .field("os", &self.os)
            .finish()
    }
}

impl Context {
    /// Creates a new context for the detected host.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        source: Arc<SourceImage>,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            config,
            source,
            log,
            executor,
            os: Os::detect(),
        }
    }

    /// Return a copy that reports guidance for `os`.
    #[must_use]
    pub fn with_os(mut self, os: Os) -> Self {
        self.os = os;
        self
    }
}
