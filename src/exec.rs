//! External tool invocation behind an injectable [`Executor`] trait.
use anyhow::{Context as _, Result};
use std::ffi::OsStr;
use std::process::{Command, Output};

/// What a finished tool left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
    /// Exit code; `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl ToolOutput {
    /// Whether the tool exited with status zero.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Why the tool failed, for a diagnostic: its trimmed output when it
    /// printed any, else its exit status.
    #[must_use]
    pub fn failure_details(&self) -> String {
        let streams: Vec<&str> = [self.stdout.trim(), self.stderr.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if !streams.is_empty() {
            return streams.join("\n");
        }
        self.exit_code.map_or_else(
            || "terminated by signal".to_string(),
            |code| format!("exit code {code}"),
        )
    }
}

impl From<Output> for ToolOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        }
    }
}

/// Runs the container packers; swapped for a fake in tests.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Whether `program` resolves on `PATH` (or is an existing path).
    fn is_available(&self, program: &str) -> bool;

    /// Run `program` to completion and capture its output. A non-zero exit
    /// is reported through [`ToolOutput`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process cannot be spawned.
    fn capture(&self, program: &str, args: &[&OsStr]) -> Result<ToolOutput>;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn capture(&self, program: &str, args: &[&OsStr]) -> Result<ToolOutput> {
        Command::new(program)
            .args(args)
            .output()
            .map(ToolOutput::from)
            .with_context(|| format!("cannot start {program}"))
    }
}
