//! Best-effort packing of generated PNGs into multi-resolution containers.
//!
//! Packers are external programs reached through [`Executor`].  Nothing here
//! is ever fatal: every attempt ends in a [`PackOutcome`] the caller turns
//! into messaging.
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::exec::Executor;
use crate::platform::Os;

/// Result of one packer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackOutcome {
    /// The container was written to this path.
    Packed(PathBuf),
    /// The packer program could not be found.
    Unavailable {
        /// Program that was looked up.
        tool: String,
    },
    /// The packer ran but did not produce the container.
    Failed {
        /// Program that was invoked.
        tool: String,
        /// Captured output or spawn error.
        details: String,
    },
}

impl PackOutcome {
    /// Whether the container was produced.
    #[must_use]
    pub const fn is_packed(&self) -> bool {
        matches!(self, Self::Packed(_))
    }
}

impl fmt::Display for PackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Packed(path) => write!(f, "created {}", path.display()),
            Self::Unavailable { tool } => write!(f, "{tool} not found on PATH"),
            Self::Failed { tool, details } if details.is_empty() => write!(f, "{tool} failed"),
            Self::Failed { tool, details } => write!(f, "{tool} failed: {details}"),
        }
    }
}

/// Arguments for packing `iconset_dir` into `output` with `iconutil`.
fn iconset_args<'a>(iconset_dir: &'a Path, output: &'a Path) -> Vec<&'a OsStr> {
    vec![
        OsStr::new("-c"),
        OsStr::new("icns"),
        OsStr::new("-o"),
        output.as_os_str(),
        iconset_dir.as_os_str(),
    ]
}

/// Arguments for packing `pngs` into `output` with ImageMagick.
fn ico_args<'a>(pngs: &'a [PathBuf], output: &'a Path) -> Vec<&'a OsStr> {
    let mut args = Vec::with_capacity(pngs.len() + 2);
    args.push(OsStr::new("convert"));
    args.extend(pngs.iter().map(PathBuf::as_path).map(Path::as_os_str));
    args.push(output.as_os_str());
    args
}

fn render(tool: &str, args: &[&OsStr]) -> String {
    let mut line = tool.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

/// Remove a container left by an earlier run so it cannot pass for fresh output.
fn clear_stale(output: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(output) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Run `tool` and confirm that it left a fresh `output` behind.
fn invoke(executor: &dyn Executor, tool: &str, args: &[&OsStr], output: &Path) -> PackOutcome {
    if !executor.is_available(tool) {
        return PackOutcome::Unavailable {
            tool: tool.to_string(),
        };
    }

    if let Err(e) = clear_stale(output) {
        return PackOutcome::Failed {
            tool: tool.to_string(),
            details: format!("cannot replace {}: {e}", output.display()),
        };
    }

    match executor.capture(tool, args) {
        Err(e) => PackOutcome::Failed {
            tool: tool.to_string(),
            details: format!("{e:#}"),
        },
        Ok(result) if !result.succeeded() => PackOutcome::Failed {
            tool: tool.to_string(),
            details: result.failure_details(),
        },
        Ok(_) if !output.is_file() => PackOutcome::Failed {
            tool: tool.to_string(),
            details: format!("no output written to {}", output.display()),
        },
        Ok(_) => PackOutcome::Packed(output.to_path_buf()),
    }
}

/// Pack an `.iconset` directory into an `.icns` file.
pub fn pack_iconset(
    executor: &dyn Executor,
    tool: &str,
    iconset_dir: &Path,
    output: &Path,
) -> PackOutcome {
    invoke(executor, tool, &iconset_args(iconset_dir, output), output)
}

/// Pack PNGs into a multi-resolution `.ico` file.
pub fn pack_ico(executor: &dyn Executor, tool: &str, pngs: &[PathBuf], output: &Path) -> PackOutcome {
    invoke(executor, tool, &ico_args(pngs, output), output)
}

/// The manual `iconutil` command for an iconset.
#[must_use]
pub fn iconset_command(tool: &str, iconset_dir: &Path, output: &Path) -> String {
    render(tool, &iconset_args(iconset_dir, output))
}

/// The manual ImageMagick command for a favicon.
#[must_use]
pub fn ico_command(tool: &str, pngs: &[PathBuf], output: &Path) -> String {
    render(tool, &ico_args(pngs, output))
}

/// What to do by hand when the `.icns` could not be packed.
#[must_use]
pub fn iconset_guidance(
    os: Os,
    tool: &str,
    iconset_dir: &Path,
    output: &Path,
    final_path: &Path,
) -> String {
    let mut text = format!(
        "create the .icns manually with: {} and move it to {}",
        iconset_command(tool, iconset_dir, output),
        final_path.display()
    );
    if !os.ships_iconutil() {
        text.push_str(" (iconutil ships only with macOS)");
    }
    text
}

/// What to do by hand when `favicon.ico` could not be packed.
#[must_use]
pub fn ico_guidance(tool: &str, pngs: &[PathBuf], output: &Path) -> String {
    format!(
        "create favicon.ico manually with: {}",
        ico_command(tool, pngs, output)
    )
}

/// What to do by hand when the packed `.icns` could not be moved into the bundle.
#[must_use]
pub fn relocate_guidance(from: &Path, to: &Path) -> String {
    format!(
        "move it manually with: mv {} {}",
        from.display(),
        to.display()
    )
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;

    fn pngs(dir: &Path) -> Vec<PathBuf> {
        [16, 32]
            .iter()
            .map(|s| dir.join(format!("favicon-{s}x{s}.png")))
            .collect()
    }

    #[test]
    fn iconset_packed_when_tool_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let iconset = dir.path().join("AppIcon.iconset");
        let out = dir.path().join("AppIcon.icns");
        let exec = MockExecutor::ok();

        let outcome = pack_iconset(&exec, "iconutil", &iconset, &out);

        assert_eq!(outcome, PackOutcome::Packed(out.clone()));
        assert!(outcome.is_packed());
        let calls = exec.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            format!("iconutil -c icns -o {} {}", out.display(), iconset.display())
        );
    }

    #[test]
    fn iconset_unavailable_without_running() {
        let dir = tempfile::tempdir().unwrap();
        let exec = MockExecutor::missing();
        let outcome = pack_iconset(
            &exec,
            "iconutil",
            &dir.path().join("AppIcon.iconset"),
            &dir.path().join("AppIcon.icns"),
        );
        assert_eq!(
            outcome,
            PackOutcome::Unavailable {
                tool: "iconutil".to_string()
            }
        );
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn ico_failure_carries_tool_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("favicon.ico");
        let exec = MockExecutor::fail("convert: no decode delegate");

        let outcome = pack_ico(&exec, "magick", &pngs(dir.path()), &out);

        match outcome {
            PackOutcome::Failed { tool, details } => {
                assert_eq!(tool, "magick");
                assert!(details.contains("no decode delegate"), "details: {details}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(!out.exists());
    }

    #[test]
    fn ico_args_put_output_last() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("favicon.ico");
        let exec = MockExecutor::ok();
        let inputs = pngs(dir.path());

        assert!(pack_ico(&exec, "magick", &inputs, &out).is_packed());
        assert_eq!(
            exec.calls()[0],
            format!(
                "magick convert {} {} {}",
                inputs[0].display(),
                inputs[1].display(),
                out.display()
            )
        );
    }

    #[test]
    fn zero_exit_without_output_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("favicon.ico");
        let outcome = pack_ico(&MockExecutor::silent(), "magick", &pngs(dir.path()), &out);
        assert!(matches!(outcome, PackOutcome::Failed { .. }));
        assert!(outcome.to_string().contains("no output written"));
    }

    #[test]
    fn leftover_container_is_not_reported_as_packed() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("favicon.ico");
        std::fs::write(&out, b"stale from last week").unwrap();

        let outcome = pack_ico(&MockExecutor::silent(), "magick", &pngs(dir.path()), &out);

        assert!(matches!(outcome, PackOutcome::Failed { .. }), "{outcome:?}");
        assert!(!out.exists());
    }

    #[test]
    fn leftover_container_is_replaced_by_fresh_output() {
        let dir = tempfile::tempdir().unwrap();
        let iconset = dir.path().join("AppIcon.iconset");
        let out = dir.path().join("AppIcon.icns");
        std::fs::write(&out, b"stale").unwrap();

        let outcome = pack_iconset(&MockExecutor::ok(), "iconutil", &iconset, &out);

        assert!(outcome.is_packed());
        assert_eq!(std::fs::read(&out).unwrap(), b"container");
    }

    #[test]
    fn missing_packer_leaves_existing_container_alone() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("favicon.ico");
        std::fs::write(&out, b"hand-made").unwrap();

        let outcome = pack_ico(&MockExecutor::missing(), "magick", &pngs(dir.path()), &out);

        assert!(!outcome.is_packed());
        assert_eq!(std::fs::read(&out).unwrap(), b"hand-made");
    }

    #[test]
    fn iconset_guidance_mentions_command_and_destination() {
        let text = iconset_guidance(
            Os::MacOs,
            "iconutil",
            Path::new("out/mac-app/AppIcon.iconset"),
            Path::new("out/mac-app/AppIcon.icns"),
            Path::new("out/mac-app/Contents/Resources/AppIcon.icns"),
        );
        assert!(text.contains("iconutil -c icns -o out/mac-app/AppIcon.icns out/mac-app/AppIcon.iconset"));
        assert!(text.contains("out/mac-app/Contents/Resources/AppIcon.icns"));
        assert!(!text.contains("only with macOS"));
    }

    #[test]
    fn iconset_guidance_notes_macos_only_elsewhere() {
        let text = iconset_guidance(
            Os::Linux,
            "iconutil",
            Path::new("a.iconset"),
            Path::new("a.icns"),
            Path::new("b.icns"),
        );
        assert!(text.contains("iconutil ships only with macOS"));
    }

    #[test]
    fn ico_guidance_lists_inputs() {
        let inputs = vec![PathBuf::from("favicon-16x16.png")];
        let text = ico_guidance("magick", &inputs, Path::new("favicon.ico"));
        assert_eq!(
            text,
            "create favicon.ico manually with: magick convert favicon-16x16.png favicon.ico"
        );
    }

    #[test]
    fn outcome_display() {
        let unavailable = PackOutcome::Unavailable {
            tool: "magick".to_string(),
        };
        assert_eq!(unavailable.to_string(), "magick not found on PATH");
        let failed = PackOutcome::Failed {
            tool: "iconutil".to_string(),
            details: String::new(),
        };
        assert_eq!(failed.to_string(), "iconutil failed");
    }
}
