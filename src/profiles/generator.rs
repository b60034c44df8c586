//! Shared control flow for every profile: ensure directories, write icons,
//! post-process.
use std::fmt;
use std::path::{Path, PathBuf};

use super::{Context, Phase, PostProcess, Profile, join_relative};
use crate::error::ConvertError;
use crate::logging::{Log, ProfileStatus};
use crate::resources::container::{
    self, PackOutcome, iconset_command, iconset_guidance, ico_command, ico_guidance,
    relocate_guidance,
};
use crate::resources::helpers::fs::ensure_dir;
use crate::resources::icon::IconAsset;

/// What happened to a profile's container file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerStatus {
    /// The profile has no container.
    NotApplicable,
    /// The container was packed and placed at this path.
    Packed(PathBuf),
    /// An existing container was left alone.
    Kept(PathBuf),
    /// Packing was not possible; carries the manual instructions.
    Degraded(String),
    /// Dry run: packing would have been attempted.
    Planned,
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |p: &Path| {
            p.file_name()
                .map_or_else(String::new, |n| n.to_string_lossy().to_string())
        };
        match self {
            Self::NotApplicable => Ok(()),
            Self::Packed(p) => write!(f, "{} packed", name(p)),
            Self::Kept(p) => write!(f, "{} kept", name(p)),
            Self::Degraded(_) => write!(f, "container skipped"),
            Self::Planned => write!(f, "container planned"),
        }
    }
}

/// Outcome of a profile that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileReport {
    /// The profile that ran.
    pub profile: Profile,
    /// Its output directory.
    pub dir: PathBuf,
    /// Icons written (or, in a dry run, that would be written).
    pub written: Vec<PathBuf>,
    /// Container post-processing result.
    pub container: ContainerStatus,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl ProfileReport {
    /// Summary status; a degraded container is still a success.
    #[must_use]
    pub const fn status(&self) -> ProfileStatus {
        if self.dry_run {
            ProfileStatus::DryRun
        } else if matches!(self.container, ContainerStatus::Degraded(_)) {
            ProfileStatus::Degraded
        } else {
            ProfileStatus::Ok
        }
    }

    /// One-line description for the run summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let count = self.written.len();
        let mut text = if self.dry_run {
            format!("{count} icons planned")
        } else {
            format!("{count} icons")
        };
        let container = self.container.to_string();
        if !container.is_empty() {
            text.push_str(", ");
            text.push_str(&container);
        }
        text
    }
}

/// Tracks and logs the profile's [`Phase`].
struct Progress<'a> {
    profile: Profile,
    log: &'a dyn Log,
    phase: Phase,
}

impl<'a> Progress<'a> {
    const fn new(profile: Profile, log: &'a dyn Log) -> Self {
        Self {
            profile,
            log,
            phase: Phase::NotStarted,
        }
    }

    fn advance(&mut self, next: Phase) {
        debug_assert!(next > self.phase, "{} cannot go back to {next}", self.phase);
        self.phase = next;
        self.log.debug(&format!("{}: {next}", self.profile));
    }
}

/// Run `profile` to completion.
///
/// Every icon is checked against the overwrite rule before any of them is
/// resampled, so a refused profile leaves its existing files untouched.  In a
/// dry run the same checks run but nothing is created.
///
/// # Errors
///
/// Returns the first [`ConvertError`] hit while creating directories,
/// checking destinations or writing icons.  Container packing never fails
/// the profile.
pub fn generate(profile: Profile, ctx: &Context) -> Result<ProfileReport, ConvertError> {
    let config = &ctx.config;
    let layout = profile.layout();
    let dir = config.profile_dir(profile);
    let mut progress = Progress::new(profile, ctx.log.as_ref());

    for d in layout.directories(&dir) {
        if config.dry_run {
            if !d.is_dir() {
                ctx.log.dry_run(&format!("would create {}", d.display()));
            }
        } else {
            ensure_dir(&d)?;
        }
    }
    progress.advance(Phase::DirectoryEnsured);

    let assets: Vec<IconAsset> = layout
        .icons
        .iter()
        .zip(layout.icon_paths(&dir))
        .map(|(spec, path)| IconAsset::new(spec.size, path))
        .collect();
    for asset in &assets {
        asset.check(config.overwrite)?;
    }

    for asset in &assets {
        let size = asset.size;
        if config.dry_run {
            ctx.log.dry_run(&format!(
                "would write {} ({size}x{size})",
                asset.destination.display()
            ));
        } else {
            asset.produce(&ctx.source, config.overwrite)?;
            ctx.log
                .debug(&format!("wrote {} ({size}x{size})", asset.destination.display()));
        }
    }
    ctx.log.info(&format!(
        "{} {} icons in {}",
        if config.dry_run { "planned" } else { "generated" },
        assets.len(),
        layout.assets_path(&dir).display()
    ));
    progress.advance(Phase::AssetsWritten);

    let container = match layout.post {
        PostProcess::None => ContainerStatus::NotApplicable,
        PostProcess::Note(note) => {
            ctx.log.info(note);
            ContainerStatus::NotApplicable
        }
        PostProcess::PackIcns { file, into } => pack_icns(
            ctx,
            &layout.assets_path(&dir),
            &dir.join(file),
            &join_relative(&dir, into).join(file),
        ),
        PostProcess::PackIco { file } => {
            let inputs: Vec<PathBuf> = layout
                .icons
                .iter()
                .zip(&assets)
                .filter(|(spec, _)| spec.container_input)
                .map(|(_, asset)| asset.destination.clone())
                .collect();
            pack_favicon(ctx, &inputs, &dir.join(file))
        }
    };
    progress.advance(Phase::PostProcessed);
    progress.advance(Phase::Done);

    Ok(ProfileReport {
        profile,
        dir,
        written: assets.into_iter().map(|a| a.destination).collect(),
        container,
        dry_run: config.dry_run,
    })
}

/// Pack the iconset into `staged`, then move it to `final_path`.
fn pack_icns(ctx: &Context, iconset: &Path, staged: &Path, final_path: &Path) -> ContainerStatus {
    let config = &ctx.config;
    let tool = config.tools.iconutil.as_str();

    if final_path.exists() && !config.overwrite {
        ctx.log.info(&format!(
            "{} already exists, skipping .icns packing (use -f or --force to replace it)",
            final_path.display()
        ));
        return ContainerStatus::Kept(final_path.to_path_buf());
    }

    if config.dry_run {
        ctx.log
            .dry_run(&format!("would run: {}", iconset_command(tool, iconset, staged)));
        ctx.log.dry_run(&format!(
            "would move {} to {}",
            staged.display(),
            final_path.display()
        ));
        return ContainerStatus::Planned;
    }

    match container::pack_iconset(ctx.executor.as_ref(), tool, iconset, staged) {
        PackOutcome::Packed(packed) => match std::fs::rename(&packed, final_path) {
            Ok(()) => {
                ctx.log.info(&format!("created {}", final_path.display()));
                ContainerStatus::Packed(final_path.to_path_buf())
            }
            Err(e) => {
                let guidance = relocate_guidance(&packed, final_path);
                ctx.log.warn(&format!(
                    "created {} but could not move it into place: {e}",
                    packed.display()
                ));
                ctx.log.info(&guidance);
                ContainerStatus::Degraded(guidance)
            }
        },
        outcome => {
            let guidance = iconset_guidance(ctx.os, tool, iconset, staged, final_path);
            ctx.log.warn(&format!("could not create .icns: {outcome}"));
            ctx.log.info(&guidance);
            ContainerStatus::Degraded(guidance)
        }
    }
}

/// Pack the favicon inputs into `output` unless it is already there.
fn pack_favicon(ctx: &Context, inputs: &[PathBuf], output: &Path) -> ContainerStatus {
    let config = &ctx.config;
    let tool = config.tools.magick.as_str();

    if output.exists() && !config.overwrite {
        ctx.log.info(&format!(
            "{} already exists, skipping .ico packing (use -f or --force to replace it)",
            output.display()
        ));
        return ContainerStatus::Kept(output.to_path_buf());
    }

    if config.dry_run {
        ctx.log
            .dry_run(&format!("would run: {}", ico_command(tool, inputs, output)));
        return ContainerStatus::Planned;
    }

    match container::pack_ico(ctx.executor.as_ref(), tool, inputs, output) {
        PackOutcome::Packed(packed) => {
            ctx.log.info(&format!("created {}", packed.display()));
            ContainerStatus::Packed(packed)
        }
        outcome => {
            let guidance = ico_guidance(tool, inputs, output);
            ctx.log.warn(&format!("could not create favicon.ico: {outcome}"));
            ctx.log.info(&guidance);
            ContainerStatus::Degraded(guidance)
        }
    }
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
    use crate::config::{Config, MAGICK_ENV, Tools};
    use crate::platform::Os;
    use crate::profiles::test_helpers::{RecordingLog, context};
    use crate::resources::test_helpers::MockExecutor;
    use std::sync::Arc;

    fn files_under(dir: &Path) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![dir.to_path_buf()];
        while let Some(d) = stack.pop() {
            for entry in std::fs::read_dir(&d).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    stack.push(path);
                } else {
                    out.push(
                        path.strip_prefix(dir)
                            .unwrap()
                            .to_string_lossy()
                            .replace('\\', "/"),
                    );
                }
            }
        }
        out.sort();
        out
    }

    #[test]
    fn browser_extension_writes_exactly_four_icons() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::new("src.png", tmp.path(), &[Profile::BrowserExtension], false);
        let (ctx, _log) = context(config, MockExecutor::missing());

        let report = generate(Profile::BrowserExtension, &ctx).unwrap();

        assert_eq!(report.written.len(), 4);
        assert_eq!(report.container, ContainerStatus::NotApplicable);
        assert_eq!(report.status(), ProfileStatus::Ok);
        assert_eq!(
            files_under(&tmp.path().join("browser-extension")),
            vec![
                "icon_128x128.png",
                "icon_16x16.png",
                "icon_32x32.png",
                "icon_48x48.png"
            ]
        );
    }

    #[test]
    fn mac_app_degrades_without_packer() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::new("src.png", tmp.path(), &[Profile::MacApp], false);
        let (ctx, log) = context(config, MockExecutor::missing());
        let ctx = ctx.with_os(Os::Linux);

        let report = generate(Profile::MacApp, &ctx).unwrap();

        assert_eq!(report.status(), ProfileStatus::Degraded);
        let ContainerStatus::Degraded(guidance) = &report.container else {
            panic!("expected degraded container, got {:?}", report.container);
        };
        assert!(guidance.contains("iconutil -c icns"));
        assert!(guidance.contains("only with macOS"));
        let mac = tmp.path().join("mac-app");
        assert_eq!(files_under(&mac.join("AppIcon.iconset")).len(), 10);
        assert!(mac.join("Contents").join("Resources").is_dir());
        assert!(!mac.join("Contents").join("Resources").join("AppIcon.icns").exists());
        assert!(log.contains("warn", "could not create .icns"));
    }

    #[test]
    fn mac_app_moves_packed_icns_into_bundle() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::new("src.png", tmp.path(), &[Profile::MacApp], false);
        let (ctx, _log) = context(config, MockExecutor::ok());

        let report = generate(Profile::MacApp, &ctx).unwrap();

        let mac = tmp.path().join("mac-app");
        let final_path = mac.join("Contents").join("Resources").join("AppIcon.icns");
        assert_eq!(report.container, ContainerStatus::Packed(final_path.clone()));
        assert!(final_path.is_file());
        assert!(!mac.join("AppIcon.icns").exists(), "staged container must be moved");
        assert_eq!(report.summary(), "10 icons, AppIcon.icns packed");
    }

    #[test]
    fn favicon_keeps_existing_ico_without_packing() {
        let tmp = tempfile::tempdir().unwrap();
        let fav = tmp.path().join("favicon");
        std::fs::create_dir_all(&fav).unwrap();
        std::fs::write(fav.join("favicon.ico"), b"old").unwrap();
        let config = Config::new("src.png", tmp.path(), &[Profile::Favicon], false);
        let exec = Arc::new(MockExecutor::ok());
        let (ctx, log) = context(config, Arc::clone(&exec));

        let report = generate(Profile::Favicon, &ctx).unwrap();

        assert_eq!(report.container, ContainerStatus::Kept(fav.join("favicon.ico")));
        assert!(exec.calls().is_empty(), "packer must not run");
        assert_eq!(std::fs::read(fav.join("favicon.ico")).unwrap(), b"old");
        assert_eq!(report.written.len(), 7);
        assert!(log.contains("info", "skipping .ico packing"));
    }

    #[test]
    fn favicon_packs_the_four_small_pngs() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::new("src.png", tmp.path(), &[Profile::Favicon], false);
        let exec = Arc::new(MockExecutor::ok());
        let (ctx, _log) = context(config, Arc::clone(&exec));

        generate(Profile::Favicon, &ctx).unwrap();

        let calls = exec.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("magick convert "));
        for size in [16, 32, 48, 64] {
            assert!(calls[0].contains(&format!("favicon-{size}x{size}.png")));
        }
        assert!(!calls[0].contains("favicon-192x192.png"));
        assert!(!calls[0].contains("apple-touch-icon.png"));
        assert!(calls[0].ends_with("favicon.ico"));
    }

    #[test]
    fn magick_override_reaches_the_command_line() {
        let tmp = tempfile::tempdir().unwrap();
        let tools = Tools::from_lookup(|key| {
            (key == MAGICK_ENV).then(|| "/opt/im7/bin/magick".to_string())
        });
        let config =
            Config::new("src.png", tmp.path(), &[Profile::Favicon], false).with_tools(tools);
        let exec = Arc::new(MockExecutor::ok());
        let (ctx, log) = context(config, Arc::clone(&exec));

        let report = generate(Profile::Favicon, &ctx).unwrap();

        assert!(matches!(report.container, ContainerStatus::Packed(_)));
        let calls = exec.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("/opt/im7/bin/magick convert "), "{}", calls[0]);
        assert!(!log.contains("info", "manually"));
    }

    #[test]
    fn existing_icon_fails_before_writing_anything() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("windows-app");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("icon_256x256.png"), b"mine").unwrap();
        let config = Config::new("src.png", tmp.path(), &[Profile::WindowsApp], false);
        let (ctx, _log) = context(config, MockExecutor::missing());

        let err = generate(Profile::WindowsApp, &ctx).unwrap_err();

        assert!(err.is_destination_exists());
        assert!(err.to_string().contains("icon_256x256.png"));
        assert_eq!(files_under(&dir), vec!["icon_256x256.png"]);
        assert_eq!(std::fs::read(dir.join("icon_256x256.png")).unwrap(), b"mine");
    }

    #[test]
    fn dry_run_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let config =
            Config::new("src.png", tmp.path(), &[Profile::MacApp], false).with_dry_run(true);
        let exec = Arc::new(MockExecutor::ok());
        let (ctx, log) = context(config, Arc::clone(&exec));

        let report = generate(Profile::MacApp, &ctx).unwrap();

        assert_eq!(report.status(), ProfileStatus::DryRun);
        assert_eq!(report.container, ContainerStatus::Planned);
        assert_eq!(report.written.len(), 10);
        assert!(!tmp.path().join("mac-app").exists());
        assert!(exec.calls().is_empty());
        assert!(log.contains("dry_run", "would write"));
        assert!(log.contains("dry_run", "would run: iconutil -c icns"));
        assert_eq!(report.summary(), "10 icons planned, container planned");
    }

    #[test]
    fn dry_run_still_reports_conflicts() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("browser-extension");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("icon_16x16.png"), b"x").unwrap();
        let config = Config::new("src.png", tmp.path(), &[Profile::BrowserExtension], false)
            .with_dry_run(true);
        let (ctx, _log) = context(config, MockExecutor::missing());

        assert!(
            generate(Profile::BrowserExtension, &ctx)
                .unwrap_err()
                .is_destination_exists()
        );
    }

    #[test]
    fn windows_app_prints_note() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::new("src.png", tmp.path(), &[Profile::WindowsApp], false);
        let (ctx, log) = context(config, MockExecutor::missing());

        let report = generate(Profile::WindowsApp, &ctx).unwrap();

        assert_eq!(report.container, ContainerStatus::NotApplicable);
        assert_eq!(report.summary(), "6 icons");
        assert!(log.contains("info", "third-party tool"));
    }

    #[test]
    fn phases_are_logged_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::new("src.png", tmp.path(), &[Profile::BrowserExtension], false);
        let (ctx, log) = context(config, MockExecutor::missing());

        generate(Profile::BrowserExtension, &ctx).unwrap();

        let phases: Vec<String> = log
            .messages("debug")
            .into_iter()
            .filter(|m| m.starts_with("browser-extension: "))
            .collect();
        assert_eq!(
            phases,
            vec![
                "browser-extension: directories ensured",
                "browser-extension: assets written",
                "browser-extension: post-processed",
                "browser-extension: done",
            ]
        );
    }
}
