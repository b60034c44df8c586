//! The `convert` command: validate input, decode once, run profiles.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::ConvertError;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::profiles::Context;
use crate::resources::helpers::fs::ensure_dir;
use crate::resources::icon::SourceImage;

/// Run the convert command.
///
/// # Errors
///
/// Returns an error if the input is missing or undecodable, the output
/// directory cannot be created, or any profile fails.
pub fn run(cli: &Cli, log: &Arc<Logger>) -> Result<()> {
    run_with(Config::from_cli(cli), log, Arc::new(SystemExecutor))
}

/// Run a conversion with an explicit configuration and executor.
///
/// # Errors
///
/// See [`run`].
pub fn run_with(config: Config, log: &Arc<Logger>, executor: Arc<dyn Executor>) -> Result<()> {
    log.info(&format!("icon {}", crate::VERSION));

    if !config.input.exists() {
        return Err(ConvertError::SourceNotFound { path: config.input }.into());
    }

    if config.profiles.is_empty() {
        log.warn("no conversion type specified");
        log.info("use -b, -m, -w, -i or --all to select at least one profile (see --help)");
        return Ok(());
    }

    if config.dry_run {
        log.dry_run("no files will be written");
    }

    log.stage("Preparing output");
    if config.dry_run {
        if !config.output.is_dir() {
            log.dry_run(&format!("would create {}", config.output.display()));
        }
    } else {
        ensure_dir(&config.output)?;
    }
    log.info(&format!("output: {}", config.output.display()));

    log.stage("Loading source image");
    let source = SourceImage::open(&config.input)?;
    let (width, height) = source.dimensions();
    log.info(&format!(
        "source: {} ({width}x{height})",
        source.path().display()
    ));
    if width != height {
        log.warn("source image is not square; icons will be stretched to fit");
    }
    log.debug(&format!(
        "profiles: {}",
        config
            .profiles
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    ));
    log.debug(&format!(
        "packers: iconutil={} magick={}",
        config.tools.iconutil, config.tools.magick
    ));

    let ctx = Context::new(
        Arc::new(config),
        Arc::new(source),
        Arc::clone(log) as Arc<dyn Log>,
        executor,
    );
    super::run_profiles_to_completion(&ctx, log)
}
