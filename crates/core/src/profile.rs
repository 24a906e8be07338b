//! Spatial metadata carried alongside raster samples

use crate::crs::CRS;
use crate::io::RasterFormat;
use crate::raster::{GeoTransform, OVERLAY_CHANNELS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage type of raster samples on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleType::U8 => "uint8",
            SampleType::U16 => "uint16",
            SampleType::U32 => "uint32",
            SampleType::U64 => "uint64",
            SampleType::I8 => "int8",
            SampleType::I16 => "int16",
            SampleType::I32 => "int32",
            SampleType::I64 => "int64",
            SampleType::F32 => "float32",
            SampleType::F64 => "float64",
        };
        f.write_str(name)
    }
}

/// How pixel values map to colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Photometric {
    /// Independent bands, no color model
    MinIsBlack,
    /// Three bands interpreted as red, green, blue
    Rgb,
}

/// Sample ordering within the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interleave {
    /// One plane per band
    Band,
    /// All bands of a pixel stored together
    Pixel,
}

/// Format-level and georeferencing metadata of a raster file.
///
/// Loaded together with the samples and handed back to the writer. Callers
/// that produce a different kind of product derive a new profile (see
/// [`RasterProfile::for_overlay`]) instead of editing the loaded one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterProfile {
    pub format: RasterFormat,
    pub width: usize,
    pub height: usize,
    /// Number of bands
    pub count: usize,
    pub dtype: SampleType,
    pub transform: GeoTransform,
    pub crs: Option<CRS>,
    pub nodata: Option<f64>,
    pub photometric: Photometric,
    pub interleave: Interleave,
    /// Raw GeoKeyDirectory (tag 34735), copied to outputs
    pub geokeys: Option<Vec<u16>>,
    /// GeoDoubleParams (tag 34736) referenced by `geokeys`
    pub geo_double_params: Option<Vec<f64>>,
    /// GeoAsciiParams (tag 34737) referenced by `geokeys`
    pub geo_ascii_params: Option<String>,
}

impl RasterProfile {
    /// Profile for a single-band float GeoTIFF with default georeferencing
    pub fn new(width: usize, height: usize, count: usize) -> Self {
        Self {
            format: RasterFormat::GeoTiff,
            width,
            height,
            count,
            dtype: SampleType::F64,
            transform: GeoTransform::default(),
            crs: None,
            nodata: None,
            photometric: Photometric::MinIsBlack,
            interleave: Interleave::Pixel,
            geokeys: None,
            geo_double_params: None,
            geo_ascii_params: None,
        }
    }

    /// Derive the profile of an 8-bit RGB overlay written over this raster's footprint.
    ///
    /// Geotransform, CRS and GeoKeys carry over; band count, sample type,
    /// color model and interleaving are replaced. The source nodata value is
    /// dropped since an 8-bit overlay has no room for it.
    pub fn for_overlay(&self) -> RasterProfile {
        RasterProfile {
            format: RasterFormat::GeoTiff,
            count: OVERLAY_CHANNELS,
            dtype: SampleType::U8,
            nodata: None,
            photometric: Photometric::Rgb,
            interleave: Interleave::Pixel,
            ..self.clone()
        }
    }

    /// Geographic bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_profile() -> RasterProfile {
        RasterProfile {
            format: RasterFormat::ErdasImagine,
            width: 640,
            height: 480,
            count: 4,
            dtype: SampleType::U16,
            transform: GeoTransform::new(272_000.0, 2_110_000.0, 0.5, -0.5),
            crs: Some(CRS::from_epsg(32643)),
            nodata: Some(0.0),
            photometric: Photometric::MinIsBlack,
            interleave: Interleave::Band,
            geokeys: Some(vec![1, 1, 0, 2, 1026, 34737, 22, 0, 3072, 0, 1, 32643]),
            geo_double_params: None,
            geo_ascii_params: Some("WGS 84 / UTM zone 43N|".into()),
        }
    }

    #[test]
    fn overlay_profile_overrides_product_fields() {
        let src = source_profile();
        let out = src.for_overlay();

        assert_eq!(out.count, 3);
        assert_eq!(out.dtype, SampleType::U8);
        assert_eq!(out.photometric, Photometric::Rgb);
        assert_eq!(out.interleave, Interleave::Pixel);
        assert_eq!(out.nodata, None);
        assert_eq!(out.format, RasterFormat::GeoTiff);
    }

    #[test]
    fn overlay_profile_keeps_georeferencing() {
        let src = source_profile();
        let out = src.for_overlay();

        assert_eq!(out.transform, src.transform);
        assert_eq!(out.crs, src.crs);
        assert_eq!(out.geokeys, src.geokeys);
        assert_eq!(out.geo_ascii_params, src.geo_ascii_params);
        assert_eq!((out.width, out.height), (640, 480));
    }

    #[test]
    fn overlay_profile_leaves_source_untouched() {
        let src = source_profile();
        let _ = src.for_overlay();
        assert_eq!(src, source_profile());
    }

    #[test]
    fn sample_type_names() {
        assert_eq!(SampleType::U8.to_string(), "uint8");
        assert_eq!(SampleType::F32.to_string(), "float32");
    }
}
