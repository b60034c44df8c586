//! Core logging types: profile entries, status, and the [`Log`] trait.
use std::fmt;
use std::path::PathBuf;

/// Profile execution result for summary reporting.
#[derive(Debug, Clone)]
pub struct ProfileEntry {
    /// Profile name (e.g. `browser-extension`).
    pub name: String,
    /// Final status of the profile.
    pub status: ProfileStatus,
    /// Output directory of the profile, when known.
    pub dir: Option<PathBuf>,
    /// Optional detail message (file count, guidance, or error description).
    pub message: Option<String>,
}

/// Status of a completed profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStatus {
    /// Every asset was written and post-processing (if any) succeeded.
    Ok,
    /// Every asset was written but the container packer fell back to guidance.
    Degraded,
    /// Profile ran in dry-run mode; nothing was written.
    DryRun,
    /// A fatal error aborted the profile.
    Failed,
}

impl ProfileStatus {
    /// Whether the profile counts as a success for the exit status.
    #[must_use]
    pub const fn is_success(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Degraded => write!(f, "degraded"),
            Self::DryRun => write!(f, "dry-run"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) is the production backend; tests may
/// supply their own recorder.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a profile result for the summary.
    fn record_profile(&self, entry: ProfileEntry);
}
