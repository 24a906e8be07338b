//! # changemask core
//!
//! Core types and I/O for before/after raster change detection.
//!
//! This crate provides:
//! - `MultiBandRaster<T>`: `(band, row, col)` sample stack
//! - `ChangeMask` and `OverlayImage`: detection products
//! - `RasterProfile`: spatial metadata carried from input to output
//! - `GeoTransform` and `CRS`: georeferencing
//! - GeoTIFF I/O (native, or GDAL with the `gdal` feature)

pub mod crs;
pub mod error;
pub mod io;
pub mod profile;
pub mod raster;

pub use crs::CRS;
pub use error::{Error, Result};
pub use profile::{Interleave, Photometric, RasterProfile, SampleType};
pub use raster::{ChangeMask, GeoTransform, MultiBandRaster, OverlayImage, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::profile::RasterProfile;
    pub use crate::raster::{ChangeMask, GeoTransform, MultiBandRaster, OverlayImage};
}
