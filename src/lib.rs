//! Icon conversion engine.
//!
//! Converts one source image into the icon sets required by browser
//! extensions, macOS application bundles, Windows applications and websites.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: immutable run configuration built from the command line
//! - **[`resources`]**: the resampling write gate and container packers
//! - **[`profiles`]**: per-target layouts and the shared generation flow
//! - **[`commands`]**: top-level orchestration (`convert`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod profiles;
pub mod resources;

/// Version string: `ICON_VERSION` at build time, else the package version.
pub const VERSION: &str = match option_env!("ICON_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
