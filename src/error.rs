//! Domain-specific error types for the icon converter.
//!
//! Library code returns [`ConvertError`]; the command layer converts it to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Fatal vs. recoverable
//!
//! ```text
//! ConvertError              : fatal to the profile it occurs in
//! ├── SourceNotFound
//! ├── SourceDecode
//! ├── DestinationExists
//! ├── DirectoryCreate
//! ├── Write
//! └── InvalidSize
//!
//! resources::container::PackOutcome: never fatal
//! ├── Unavailable           : packer not installed / not on PATH
//! └── Failed                : packer ran but did not produce a container
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error carried by [`ConvertError::Write`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort the profile in which they occur.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The input image path does not exist.
    #[error("input file does not exist: {}", .path.display())]
    SourceNotFound {
        /// Path given as the input image.
        path: PathBuf,
    },

    /// The input exists but could not be read or decoded as an image.
    #[error("failed to open image {}: {source}", .path.display())]
    SourceDecode {
        /// Path given as the input image.
        path: PathBuf,
        /// Underlying decoder error.
        source: image::ImageError,
    },

    /// A destination file is already present and overwriting is disabled.
    #[error(
        "output file already exists: {}. Use -f or --force to overwrite",
        .path.display()
    )]
    DestinationExists {
        /// Path of the existing file.
        path: PathBuf,
    },

    /// An output directory could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    DirectoryCreate {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Encoding or persisting an output file failed.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying encoder or I/O error.
        source: BoxError,
    },

    /// An icon size of zero was requested.
    #[error("invalid icon size {0}: size must be a positive number of pixels")]
    InvalidSize(u32),
}

impl ConvertError {
    /// Build a [`ConvertError::Write`] from any error type.
    pub fn write(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::Write {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Whether this error was caused by an existing destination file.
    #[must_use]
    pub const fn is_destination_exists(&self) -> bool {
        matches!(self, Self::DestinationExists { .. })
    }
}
