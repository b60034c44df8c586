//! Platform profiles: the closed set of deployment targets and their static
//! output layouts.
//!
//! Each [`Profile`] carries its layout as data.  The shared control flow lives
//! in [`generator`]; [`execute`] runs one profile and records its outcome.
pub mod context;
pub mod generator;

use std::fmt;
use std::path::{Path, PathBuf};

pub use context::Context;
pub use generator::{ContainerStatus, ProfileReport, generate};

use crate::logging::{ProfileEntry, ProfileStatus};

/// A deployment target for generated icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    /// Chrome/Firefox extension manifest icons.
    BrowserExtension,
    /// macOS application bundle (`.iconset` and `.icns`).
    MacApp,
    /// Windows application PNG set.
    WindowsApp,
    /// Website favicons, touch icon and `favicon.ico`.
    Favicon,
}

impl Profile {
    /// Every profile in canonical execution order.
    pub const ALL: [Self; 4] = [
        Self::BrowserExtension,
        Self::MacApp,
        Self::WindowsApp,
        Self::Favicon,
    ];

    /// Stable name, also the output subdirectory.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BrowserExtension => "browser-extension",
            Self::MacApp => "mac-app",
            Self::WindowsApp => "windows-app",
            Self::Favicon => "favicon",
        }
    }

    /// Static output layout of this profile.
    #[must_use]
    pub const fn layout(self) -> &'static Layout {
        match self {
            Self::BrowserExtension => &BROWSER_EXTENSION,
            Self::MacApp => &MAC_APP,
            Self::WindowsApp => &WINDOWS_APP,
            Self::Favicon => &FAVICON,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pixel density of a macOS iconset entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Nominal resolution.
    X1,
    /// Retina variant at twice the nominal size.
    X2,
}

/// One icon declared by a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSpec {
    /// Edge length in pixels.
    pub size: u32,
    /// File name inside the layout's assets directory.
    pub filename: &'static str,
    /// Density, for layouts that distinguish 1x and 2x entries.
    pub scale: Option<Scale>,
    /// Whether the file is fed to the container packer.
    pub container_input: bool,
}

impl IconSpec {
    const fn png(size: u32, filename: &'static str) -> Self {
        Self {
            size,
            filename,
            scale: None,
            container_input: false,
        }
    }

    const fn scaled(size: u32, filename: &'static str, scale: Scale) -> Self {
        Self {
            size,
            filename,
            scale: Some(scale),
            container_input: false,
        }
    }

    const fn packed(size: u32, filename: &'static str) -> Self {
        Self {
            size,
            filename,
            scale: None,
            container_input: true,
        }
    }
}

/// Step that runs after every icon of a profile is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    /// Nothing to do.
    None,
    /// Print an informational note.
    Note(&'static str),
    /// Pack the assets directory into `file` and move it into `into`.
    PackIcns {
        /// Container file name.
        file: &'static str,
        /// Directory (relative to the profile directory) the container belongs in.
        into: &'static str,
    },
    /// Pack the container inputs into `file` in the profile directory.
    PackIco {
        /// Container file name.
        file: &'static str,
    },
}

/// Directory structure and icon table of one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Subdirectory of the output root.
    pub dir: &'static str,
    /// Subdirectory of `dir` that receives the icons, if not `dir` itself.
    pub assets_dir: Option<&'static str>,
    /// Extra directories created under `dir` (`/`-separated).
    pub bundle_dirs: &'static [&'static str],
    /// Icons in generation order.
    pub icons: &'static [IconSpec],
    /// Post-processing step.
    pub post: PostProcess,
}

impl Layout {
    /// Directory that receives the icons, given the profile directory.
    #[must_use]
    pub fn assets_path(&self, profile_dir: &Path) -> PathBuf {
        self.assets_dir
            .map_or_else(|| profile_dir.to_path_buf(), |a| join_relative(profile_dir, a))
    }

    /// Every directory the profile needs, parents first.
    #[must_use]
    pub fn directories(&self, profile_dir: &Path) -> Vec<PathBuf> {
        let mut dirs = vec![profile_dir.to_path_buf()];
        if self.assets_dir.is_some() {
            dirs.push(self.assets_path(profile_dir));
        }
        dirs.extend(self.bundle_dirs.iter().map(|d| join_relative(profile_dir, d)));
        dirs
    }

    /// Paths of every icon, in generation order.
    #[must_use]
    pub fn icon_paths(&self, profile_dir: &Path) -> Vec<PathBuf> {
        let assets = self.assets_path(profile_dir);
        self.icons.iter().map(|i| assets.join(i.filename)).collect()
    }
}

/// Join a `/`-separated relative path onto `base` component by component.
pub(crate) fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|c| !c.is_empty())
        .fold(base.to_path_buf(), |path, component| path.join(component))
}

const BROWSER_EXTENSION: Layout = Layout {
    dir: "browser-extension",
    assets_dir: None,
    bundle_dirs: &[],
    icons: &[
        IconSpec::png(16, "icon_16x16.png"),
        IconSpec::png(32, "icon_32x32.png"),
        IconSpec::png(48, "icon_48x48.png"),
        IconSpec::png(128, "icon_128x128.png"),
    ],
    post: PostProcess::None,
};

const MAC_APP: Layout = Layout {
    dir: "mac-app",
    assets_dir: Some("AppIcon.iconset"),
    bundle_dirs: &["Contents/Resources"],
    icons: &[
        IconSpec::scaled(16, "icon_16x16.png", Scale::X1),
        IconSpec::scaled(32, "icon_16x16@2x.png", Scale::X2),
        IconSpec::scaled(32, "icon_32x32.png", Scale::X1),
        IconSpec::scaled(64, "icon_32x32@2x.png", Scale::X2),
        IconSpec::scaled(128, "icon_128x128.png", Scale::X1),
        IconSpec::scaled(256, "icon_128x128@2x.png", Scale::X2),
        IconSpec::scaled(256, "icon_256x256.png", Scale::X1),
        IconSpec::scaled(512, "icon_256x256@2x.png", Scale::X2),
        IconSpec::scaled(512, "icon_512x512.png", Scale::X1),
        IconSpec::scaled(1024, "icon_512x512@2x.png", Scale::X2),
    ],
    post: PostProcess::PackIcns {
        file: "AppIcon.icns",
        into: "Contents/Resources",
    },
};

const WINDOWS_APP: Layout = Layout {
    dir: "windows-app",
    assets_dir: None,
    bundle_dirs: &[],
    icons: &[
        IconSpec::png(16, "icon_16x16.png"),
        IconSpec::png(32, "icon_32x32.png"),
        IconSpec::png(48, "icon_48x48.png"),
        IconSpec::png(64, "icon_64x64.png"),
        IconSpec::png(128, "icon_128x128.png"),
        IconSpec::png(256, "icon_256x256.png"),
    ],
    post: PostProcess::Note(
        "Windows icons generated. To create an .ico file, use a third-party tool with these images",
    ),
};

const FAVICON: Layout = Layout {
    dir: "favicon",
    assets_dir: None,
    bundle_dirs: &[],
    icons: &[
        IconSpec::packed(16, "favicon-16x16.png"),
        IconSpec::packed(32, "favicon-32x32.png"),
        IconSpec::packed(48, "favicon-48x48.png"),
        IconSpec::packed(64, "favicon-64x64.png"),
        IconSpec::png(192, "favicon-192x192.png"),
        IconSpec::png(512, "favicon-512x512.png"),
        IconSpec::png(180, "apple-touch-icon.png"),
    ],
    post: PostProcess::PackIco {
        file: "favicon.ico",
    },
};

/// Per-profile progress, entered strictly in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Nothing has happened yet.
    NotStarted,
    /// Every directory of the layout exists.
    DirectoryEnsured,
    /// Every declared icon has been written.
    AssetsWritten,
    /// The post-processing step has finished (successfully or degraded).
    PostProcessed,
    /// Terminal state.
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not started",
            Self::DirectoryEnsured => "directories ensured",
            Self::AssetsWritten => "assets written",
            Self::PostProcessed => "post-processed",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Run one profile, logging progress and recording the result for the summary.
///
/// A failure is logged and recorded but never propagated, so the remaining
/// profiles of the run are unaffected.
pub fn execute(profile: Profile, ctx: &Context) {
    ctx.log.stage(profile.name());
    let _span = crate::logging::profile_span(profile.name()).entered();

    match generate(profile, ctx) {
        Ok(report) => {
            let status = report.status();
            ctx.log.record_profile(ProfileEntry {
                name: profile.name().to_string(),
                status,
                dir: Some(report.dir.clone()),
                message: Some(report.summary()),
            });
        }
        Err(e) => {
            ctx.log.error(&format!("{profile}: {e}"));
            ctx.log.record_profile(ProfileEntry {
                name: profile.name().to_string(),
                status: ProfileStatus::Failed,
                dir: Some(ctx.config.profile_dir(profile)),
                message: Some(e.to_string()),
            });
        }
    }
}
