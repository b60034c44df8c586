// Shared helpers for integration tests.
//
// Provides a temporary workspace holding a generated source image and an
// output root, plus a fake packer executor, so each integration test can run
// a full conversion without real `iconutil` or `magick` binaries.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use image::{Rgba, RgbaImage};
use icon_converter::config::Config;
use icon_converter::exec::{Executor, ToolOutput};
use icon_converter::logging::Logger;
use icon_converter::profiles::Profile;

/// An isolated workspace backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct Workspace {
    /// Temporary directory holding `source.png` and `out/`.
    pub root: tempfile::TempDir,
}

impl Workspace {
    /// Path of the source image.
    pub fn input(&self) -> PathBuf {
        self.root.path().join("source.png")
    }

    /// Output root passed to the converter.
    pub fn output(&self) -> PathBuf {
        self.root.path().join("out")
    }

    /// Output directory of one profile.
    pub fn profile_dir(&self, profile: Profile) -> PathBuf {
        self.output().join(profile.name())
    }

    /// Replace the source image with a solid `width × height` image.
    pub fn write_source(&self, width: u32, height: u32, color: [u8; 4]) {
        RgbaImage::from_pixel(width, height, Rgba(color))
            .save(self.input())
            .expect("write source image");
    }

    /// Configuration converting this workspace's source for `profiles`.
    pub fn config(&self, profiles: &[Profile], overwrite: bool) -> Config {
        Config::new(self.input(), self.output(), profiles, overwrite)
    }
}

/// Fluent builder for [`Workspace`].
pub struct WorkspaceBuilder {
    ws: Workspace,
}

impl WorkspaceBuilder {
    /// Begin building a workspace with a 512×512 source image.
    pub fn new() -> Self {
        let ws = Workspace {
            root: tempfile::tempdir().expect("create temp dir"),
        };
        ws.write_source(512, 512, [220, 60, 30, 255]);
        Self { ws }
    }

    /// Use a `width × height` source image instead.
    pub fn with_source(self, width: u32, height: u32) -> Self {
        self.ws.write_source(width, height, [20, 120, 220, 255]);
        self
    }

    /// Pre-create `relative` (under the output root) with `content`.
    pub fn with_output_file(self, relative: &str, content: &[u8]) -> Self {
        let path = relative
            .split('/')
            .fold(self.ws.output(), |p, c| p.join(c));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create output parent");
        }
        std::fs::write(&path, content).expect("write output file");
        self
    }

    /// Finish building and return the workspace.
    pub fn build(self) -> Workspace {
        self.ws
    }
}

/// Cache root for the log files of this test binary, kept out of `$HOME`.
static CACHE_HOME: OnceLock<tempfile::TempDir> = OnceLock::new();

/// Logger for integration tests; console output goes nowhere and the log
/// file lands under a temporary `XDG_CACHE_HOME`.
pub fn logger() -> Arc<Logger> {
    CACHE_HOME.get_or_init(|| {
        let dir = tempfile::tempdir().expect("temp cache dir");
        // SAFETY: runs once, before any logger in this binary reads the variable.
        #[allow(unsafe_code)]
        unsafe {
            std::env::set_var("XDG_CACHE_HOME", dir.path());
        }
        dir
    });
    Arc::new(Logger::new("integration-test"))
}

/// The cache root `logger()` writes under.
pub fn cache_home() -> PathBuf {
    logger();
    CACHE_HOME
        .get()
        .expect("cache home initialised")
        .path()
        .to_path_buf()
}

/// Fake container packer.
///
/// When `installed`, every call succeeds and writes a placeholder container at
/// the argument following `-o` (iconutil) or the last argument (magick).
#[derive(Debug)]
pub struct FakePacker {
    installed: bool,
    calls: Mutex<Vec<String>>,
}

impl FakePacker {
    /// A packer present on PATH.
    pub fn installed() -> Arc<Self> {
        Arc::new(Self {
            installed: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// A packer missing from PATH.
    pub fn missing() -> Arc<Self> {
        Arc::new(Self {
            installed: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Program names invoked so far.
    pub fn programs(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Executor for FakePacker {
    fn is_available(&self, _: &str) -> bool {
        self.installed
    }

    fn capture(&self, program: &str, args: &[&OsStr]) -> anyhow::Result<ToolOutput> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(program.to_string());
        let output = args
            .iter()
            .position(|a| *a == "-o")
            .and_then(|i| args.get(i + 1))
            .or_else(|| args.last())
            .map(Path::new);
        if let Some(output) = output {
            std::fs::write(output, b"fake container")?;
        }
        Ok(ToolOutput {
            exit_code: Some(0),
            ..ToolOutput::default()
        })
    }
}

/// Sorted paths of every file under `dir`, relative and `/`-separated.
pub fn files_under(dir: &Path) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(d) = stack.pop() {
        for entry in std::fs::read_dir(&d).expect("read dir") {
            let path = entry.expect("dir entry").path();
            if path.is_dir() {
                stack.push(path);
            } else {
                out.push(
                    path.strip_prefix(dir)
                        .expect("strip prefix")
                        .to_string_lossy()
                        .replace('\\', "/"),
                );
            }
        }
    }
    out.sort();
    out
}
