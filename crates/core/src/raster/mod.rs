//! Raster data structures

mod element;
mod geotransform;
mod mask;
mod overlay;
mod stack;

pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use mask::ChangeMask;
pub use overlay::{OverlayImage, OVERLAY_CHANNELS};
pub use stack::{BandStatistics, MultiBandRaster};
