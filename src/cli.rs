//! Command-line interface definition.
use clap::Parser;
use std::path::PathBuf;

/// Top-level CLI entry point for the icon converter.
#[derive(Parser, Debug)]
#[command(
    name = "icon",
    about = "Convert icons to various formats and sizes",
    long_about = "Converts one source image into the icon sets required by browser \
                  extensions, macOS applications, Windows applications and websites.",
    version = crate::VERSION
)]
pub struct Cli {
    /// Source image (PNG, JPEG, GIF, BMP or TIFF)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory that receives one subdirectory per selected profile
    #[arg(value_name = "OUTPUT_DIR")]
    pub output: PathBuf,

    /// Convert for browser extension requirements
    #[arg(short = 'b', long)]
    pub browser_extension: bool,

    /// Convert for macOS application requirements
    #[arg(short = 'm', long)]
    pub mac_app: bool,

    /// Convert for Windows application requirements
    #[arg(short = 'w', long)]
    pub windows_app: bool,

    /// Generate website favicons (PNG set, apple-touch-icon and favicon.ico)
    #[arg(short = 'i', long)]
    pub favicon: bool,

    /// Select every profile
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Force overwrite existing files
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Preview the files that would be written without touching the disk
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
