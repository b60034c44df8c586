//! Production [`Log`] backend that also collects the run summary.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, ProfileEntry, ProfileStatus};
use super::utils::log_file_path;

const RESET: &str = "\x1b[0m";

/// Marker and colour for a status in the summary.
const fn badge(status: ProfileStatus) -> (&'static str, &'static str) {
    match status {
        ProfileStatus::Ok => ("✓", "\x1b[32m"),
        ProfileStatus::Degraded => ("○", "\x1b[33m"),
        ProfileStatus::DryRun => ("~", "\x1b[37m"),
        ProfileStatus::Failed => ("✗", "\x1b[31m"),
    }
}

/// Per-status counts for the summary footer.
#[derive(Debug, Default)]
struct Tally {
    ok: usize,
    degraded: usize,
    dry_run: usize,
    failed: usize,
}

impl Tally {
    fn of(entries: &[ProfileEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut t, e| {
            match e.status {
                ProfileStatus::Ok => t.ok += 1,
                ProfileStatus::Degraded => t.degraded += 1,
                ProfileStatus::DryRun => t.dry_run += 1,
                ProfileStatus::Failed => t.failed += 1,
            }
            t
        })
    }

    const fn total(&self) -> usize {
        self.ok + self.degraded + self.dry_run + self.failed
    }

    fn render(&self) -> String {
        let part = |status, n: usize| {
            let (_, color) = badge(status);
            format!("{color}{n} {status}{RESET}")
        };
        format!(
            "{} profiles: {}, {}, {}, {}",
            self.total(),
            part(ProfileStatus::Ok, self.ok),
            part(ProfileStatus::Degraded, self.degraded),
            part(ProfileStatus::DryRun, self.dry_run),
            part(ProfileStatus::Failed, self.failed),
        )
    }
}

/// One summary line: `✓ favicon → out/favicon (7 icons)`.
fn summary_line(entry: &ProfileEntry) -> String {
    let (mark, color) = badge(entry.status);
    let dir = entry
        .dir
        .as_ref()
        .map_or_else(String::new, |d| format!(" → {}", d.display()));
    let detail = entry
        .message
        .as_ref()
        .map_or_else(String::new, |m| format!(" ({m})"));
    format!("{color}{mark} {}{dir}{detail}{RESET}", entry.name)
}

/// Logger that emits [`tracing`] events and remembers each profile's outcome.
///
/// The file layer installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) mirrors every
/// message into `$XDG_CACHE_HOME/icon-converter/<command>.log`.
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<ProfileEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`; the path is only remembered for the
    /// summary, the subscriber owns the file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Path of the run's log file, if the cache directory was usable.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Snapshot of the recorded profile outcomes, in recording order.
    #[must_use]
    pub fn profile_entries(&self) -> Vec<ProfileEntry> {
        self.entries.lock().map_or_else(|_| Vec::new(), |g| g.clone())
    }

    /// Log an error.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log progress.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log detail shown on the console only with `--verbose`.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log an action a dry run skipped.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Remember a profile outcome for [`print_summary`](Self::print_summary).
    pub fn record_profile(&self, entry: ProfileEntry) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(entry);
        }
    }

    /// Number of recorded profiles that failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.entries.lock().map_or(0, |guard| {
            guard.iter().filter(|e| !e.status.is_success()).count()
        })
    }

    /// Print one line per recorded profile, the status counts, and the log
    /// file location. Prints nothing when no profile ran.
    pub fn print_summary(&self) {
        let entries = self.profile_entries();
        if entries.is_empty() {
            return;
        }

        self.stage("Summary");
        for entry in &entries {
            self.info(&summary_line(entry));
        }
        self.info(&Tally::of(&entries).render());
        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}{RESET}", path.display()));
        }
    }
}

impl Log for Logger {
    fn stage(&self, msg: &str) {
        Self::stage(self, msg);
    }

    fn info(&self, msg: &str) {
        Self::info(self, msg);
    }

    fn debug(&self, msg: &str) {
        Self::debug(self, msg);
    }

    fn warn(&self, msg: &str) {
        Self::warn(self, msg);
    }

    fn error(&self, msg: &str) {
        Self::error(self, msg);
    }

    fn dry_run(&self, msg: &str) {
        Self::dry_run(self, msg);
    }

    fn record_profile(&self, entry: ProfileEntry) {
        Self::record_profile(self, entry);
    }
}
