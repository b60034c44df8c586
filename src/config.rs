//! Immutable run configuration, built once at the CLI boundary.
use std::path::PathBuf;

use crate::cli::Cli;
use crate::profiles::Profile;

/// Environment variable overriding the macOS iconset packer.
pub const ICONUTIL_ENV: &str = "ICON_ICONUTIL";
/// Environment variable overriding the ImageMagick binary used for `.ico`.
pub const MAGICK_ENV: &str = "ICON_MAGICK";

/// External container packers invoked during post-processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    /// Program that packs an `.iconset` directory into `.icns`.
    pub iconutil: String,
    /// Program that packs PNGs into a multi-resolution `.ico`.
    pub magick: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            iconutil: "iconutil".to_string(),
            magick: "magick".to_string(),
        }
    }
}

impl Tools {
    /// Resolve tool names from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve tool names through `lookup`, falling back to the defaults for
    /// unset or blank values.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let pick = |key: &str, fallback: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
        };
        Self {
            iconutil: pick(ICONUTIL_ENV, defaults.iconutil),
            magick: pick(MAGICK_ENV, defaults.magick),
        }
    }
}

/// Everything a conversion run needs; never mutated after construction.
#[derive(Debug, Clone)]
pub struct Config {
    /// Source image path.
    pub input: PathBuf,
    /// Output root; each profile writes into its own subdirectory.
    pub output: PathBuf,
    /// Replace existing destination files instead of failing.
    pub overwrite: bool,
    /// Report planned writes without touching the filesystem.
    pub dry_run: bool,
    /// Requested profiles in execution order, without duplicates.
    pub profiles: Vec<Profile>,
    /// Container packer programs.
    pub tools: Tools,
}

impl Config {
    /// Build the configuration from parsed arguments and the environment.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        let selected = |profile: Profile| {
            cli.all
                || match profile {
                    Profile::BrowserExtension => cli.browser_extension,
                    Profile::MacApp => cli.mac_app,
                    Profile::WindowsApp => cli.windows_app,
                    Profile::Favicon => cli.favicon,
                }
        };
        Self {
            input: cli.input.clone(),
            output: cli.output.clone(),
            overwrite: cli.force,
            dry_run: cli.dry_run,
            profiles: Profile::ALL.into_iter().filter(|p| selected(*p)).collect(),
            tools: Tools::from_env(),
        }
    }

    /// Create a configuration for the given profiles with default tools.
    #[must_use]
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        profiles: &[Profile],
        overwrite: bool,
    ) -> Self {
        let mut ordered = Vec::with_capacity(profiles.len());
        for profile in profiles {
            if !ordered.contains(profile) {
                ordered.push(*profile);
            }
        }
        Self {
            input: input.into(),
            output: output.into(),
            overwrite,
            dry_run: false,
            profiles: ordered,
            tools: Tools::default(),
        }
    }

    /// Return a copy with dry-run enabled or disabled.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Return a copy using the given packer programs.
    #[must_use]
    pub fn with_tools(mut self, tools: Tools) -> Self {
        self.tools = tools;
        self
    }

    /// Output directory of `profile`.
    #[must_use]
    pub fn profile_dir(&self, profile: Profile) -> PathBuf {
        self.output.join(profile.layout().dir)
    }
}
