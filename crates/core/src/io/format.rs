//! Input format gate

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raster file formats accepted as change-detection inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RasterFormat {
    /// `.tif`
    GeoTiff,
    /// `.img` (ERDAS Imagine), needs the `gdal` feature to decode
    ErdasImagine,
}

impl RasterFormat {
    /// Recognize a format from a lowercased extension including the dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            ".tif" => Some(RasterFormat::GeoTiff),
            ".img" => Some(RasterFormat::ErdasImagine),
            _ => None,
        }
    }

    /// Recognize a format from a file path
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        Self::from_extension(&extension_of(path.as_ref()))
    }

    /// Canonical extension including the dot
    pub fn extension(&self) -> &'static str {
        match self {
            RasterFormat::GeoTiff => ".tif",
            RasterFormat::ErdasImagine => ".img",
        }
    }
}

/// Lowercased extension with leading dot, or an empty string when there is none
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Both inputs must share one extension from the allowed set.
///
/// Only the paths are inspected; nothing is opened.
pub fn check_format_compatibility(
    before: impl AsRef<Path>,
    after: impl AsRef<Path>,
) -> Result<RasterFormat> {
    let before_ext = extension_of(before.as_ref());
    let after_ext = extension_of(after.as_ref());

    match RasterFormat::from_extension(&before_ext) {
        Some(format) if before_ext == after_ext => Ok(format),
        _ => Err(Error::FormatMismatch {
            before: before_ext,
            after: after_ext,
        }),
    }
}
