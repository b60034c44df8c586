//! Top-level command orchestration.
pub mod convert;

use anyhow::Result;

use crate::logging::Logger;
use crate::profiles::{self, Context};

/// Run every requested profile in order, print the summary, and bail if any
/// profile failed.
///
/// # Errors
///
/// Returns an error if one or more profiles recorded a failure.
pub fn run_profiles_to_completion(ctx: &Context, log: &Logger) -> Result<()> {
    for profile in &ctx.config.profiles {
        profiles::execute(*profile, ctx);
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} profile(s) failed");
    }
    Ok(())
}
