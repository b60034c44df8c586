//! Resampling and write gate: one source image in, one square icon file out.
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView as _, ImageFormat, ImageReader};

use super::ResourceState;
use super::helpers::fs::write_atomically;
use crate::error::ConvertError;

/// Resampling filter used for every icon.
const FILTER: FilterType = FilterType::Lanczos3;

/// A decoded source image.
#[derive(Debug, Clone)]
pub struct SourceImage {
    path: PathBuf,
    image: DynamicImage,
}

impl SourceImage {
    /// Open and decode the image at `path`, guessing the format from content.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::SourceNotFound`] if nothing exists at `path`
    /// and [`ConvertError::SourceDecode`] if it cannot be read or decoded.
    pub fn open(path: &Path) -> Result<Self, ConvertError> {
        if !path.exists() {
            return Err(ConvertError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        let decode_err = |source| ConvertError::SourceDecode {
            path: path.to_path_buf(),
            source,
        };
        let image = ImageReader::open(path)
            .and_then(ImageReader::with_guessed_format)
            .map_err(|e| decode_err(image::ImageError::IoError(e)))?
            .decode()
            .map_err(decode_err)?;
        Ok(Self {
            path: path.to_path_buf(),
            image,
        })
    }

    /// Wrap an already-decoded image.
    #[must_use]
    pub fn from_image(path: impl Into<PathBuf>, image: DynamicImage) -> Self {
        Self {
            path: path.into(),
            image,
        }
    }

    /// Path the image was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Width and height of the source in pixels.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Resample to exactly `size × size`, stretching non-square sources.
    #[must_use]
    pub fn resample(&self, size: u32) -> DynamicImage {
        self.image.resize_exact(size, size, FILTER)
    }
}

/// Encoding implied by a destination's extension; PNG when unknown.
#[must_use]
pub fn format_for(destination: &Path) -> ImageFormat {
    let ext = destination
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => ImageFormat::Jpeg,
        Some("gif") => ImageFormat::Gif,
        Some("bmp") => ImageFormat::Bmp,
        Some("tif" | "tiff") => ImageFormat::Tiff,
        _ => ImageFormat::Png,
    }
}

/// One square icon destined for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconAsset {
    /// Edge length in pixels.
    pub size: u32,
    /// Output file.
    pub destination: PathBuf,
}

impl IconAsset {
    /// Create a new asset description.
    #[must_use]
    pub fn new(size: u32, destination: impl Into<PathBuf>) -> Self {
        Self {
            size,
            destination: destination.into(),
        }
    }

    /// Whether the destination is already occupied.
    #[must_use]
    pub fn current_state(&self) -> ResourceState {
        if self.destination.exists() {
            ResourceState::Present
        } else {
            ResourceState::Missing
        }
    }

    /// Apply the size and overwrite rules without producing anything.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidSize`] for a zero size and
    /// [`ConvertError::DestinationExists`] when the destination is occupied
    /// and `overwrite` is off.
    pub fn check(&self, overwrite: bool) -> Result<(), ConvertError> {
        if self.size == 0 {
            return Err(ConvertError::InvalidSize(self.size));
        }
        if !overwrite && self.current_state() == ResourceState::Present {
            return Err(ConvertError::DestinationExists {
                path: self.destination.clone(),
            });
        }
        Ok(())
    }

    /// Resample `source` and write it to the destination.
    ///
    /// # Errors
    ///
    /// See [`produce`].
    pub fn produce(&self, source: &SourceImage, overwrite: bool) -> Result<PathBuf, ConvertError> {
        self.check(overwrite)?;

        let format = format_for(&self.destination);
        let resized = source.resample(self.size);
        let encoded = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(resized.to_rgb8()),
            ImageFormat::Gif | ImageFormat::Bmp => DynamicImage::ImageRgba8(resized.to_rgba8()),
            _ => resized,
        };

        write_atomically(&self.destination, overwrite, |writer| {
            encoded.write_to(writer, format)?;
            Ok(())
        })?;
        Ok(self.destination.clone())
    }
}

/// Resample `source` to `size × size` and write it to `destination`.
///
/// The existence check runs before any resampling, so a refused write costs
/// nothing.  On failure no file (final or temporary) is left behind.
///
/// # Errors
///
/// - [`ConvertError::InvalidSize`] if `size` is zero
/// - [`ConvertError::DestinationExists`] if the file exists and `overwrite` is off
/// - [`ConvertError::Write`] if the directory is missing or encoding/persisting fails
pub fn produce(
    source: &SourceImage,
    size: u32,
    destination: &Path,
    overwrite: bool,
) -> Result<PathBuf, ConvertError> {
    IconAsset::new(size, destination).produce(source, overwrite)
}
