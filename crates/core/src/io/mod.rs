//! I/O operations for reading and writing rasters

mod format;
#[cfg(feature = "gdal")]
mod gdal_io;
mod native;

pub use format::{check_format_compatibility, extension_of, RasterFormat};

#[cfg(feature = "gdal")]
pub use gdal_io::{read_raster_stack, write_overlay};

#[cfg(not(feature = "gdal"))]
pub use native::{read_raster_stack, write_overlay};

// Buffer-based I/O and float writer (always available, native backend)
pub use native::{read_raster_stack_from_buffer, write_overlay_to_buffer, write_raster_stack};

use crate::error::{Error, Result};
use crate::profile::RasterProfile;
use crate::raster::{MultiBandRaster, OverlayImage, OVERLAY_CHANNELS};
use std::path::Path;

/// Load every band of a change-detection input as `f64` samples.
///
/// Fails with [`Error::UnreadableFile`] when the file cannot be opened, its
/// extension is not an accepted input format, or decoding fails.
pub fn load<P: AsRef<Path>>(path: P) -> Result<(MultiBandRaster<f64>, RasterProfile)> {
    let path = path.as_ref();
    let format = RasterFormat::from_path(path).ok_or_else(|| {
        Error::unreadable(path, format!("unsupported format '{}'", extension_of(path)))
    })?;

    if cfg!(not(feature = "gdal")) && format == RasterFormat::ErdasImagine {
        return Err(Error::unreadable(
            path,
            "ERDAS Imagine (.img) input requires the `gdal` feature",
        ));
    }

    let (raster, mut profile) = read_raster_stack::<f64, _>(path)?;
    profile.format = format;
    Ok((raster, profile))
}

/// Save an overlay georeferenced by the profile of the raster it was derived from.
///
/// The output profile comes from [`RasterProfile::for_overlay`]; `source` is not modified.
pub fn save_overlay<P: AsRef<Path>>(
    overlay: &OverlayImage,
    source: &RasterProfile,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let (rows, cols) = overlay.shape();
    if (rows, cols) != (source.height, source.width) {
        return Err(Error::ShapeMismatch {
            expected: (OVERLAY_CHANNELS, source.height, source.width),
            actual: (OVERLAY_CHANNELS, rows, cols),
        });
    }

    let profile = source.for_overlay();
    write_overlay(overlay, &profile, path)
}
