//! Raster reading and writing using GDAL
//!
//! Covers every GDAL-readable input, including ERDAS Imagine (`.img`).

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::io::RasterFormat;
use crate::profile::{Interleave, Photometric, RasterProfile, SampleType};
use crate::raster::{GeoTransform, MultiBandRaster, OverlayImage, RasterElement};
use gdal::raster::{GdalDataType, GdalType};
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DriverManager};
use std::path::Path;
use tracing::debug;

/// Read every band of a raster file
///
/// # Example
/// ```ignore
/// let (stack, profile) = read_raster_stack::<f64, _>("2017_crop.img")?;
/// ```
pub fn read_raster_stack<T, P>(path: P) -> Result<(MultiBandRaster<T>, RasterProfile)>
where
    T: RasterElement + GdalType,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let dataset = Dataset::open(path).map_err(|e| Error::unreadable(path, e))?;

    let (cols, rows) = dataset.raster_size();
    let bands = dataset.raster_count() as usize;

    let mut data: Vec<T> = Vec::with_capacity(bands * rows * cols);
    let mut dtype = SampleType::F64;
    let mut nodata = None;
    for band_idx in 1..=bands {
        let rasterband = dataset
            .rasterband(band_idx)
            .map_err(|e| Error::unreadable(path, e))?;
        if band_idx == 1 {
            dtype = sample_type(rasterband.band_type());
            nodata = rasterband.no_data_value();
        }
        let buffer = rasterband
            .read_as::<T>((0, 0), (cols, rows), (cols, rows), None)
            .map_err(|e| Error::unreadable(path, e))?;
        data.extend_from_slice(buffer.data());
    }

    let raster = MultiBandRaster::from_vec(data, bands, rows, cols)
        .map_err(|e| Error::unreadable(path, e))?;

    let transform = dataset
        .geo_transform()
        .map(GeoTransform::from_gdal)
        .unwrap_or_default();

    let crs = dataset.spatial_ref().ok().and_then(|srs| match srs.auth_code() {
        Ok(code) => Some(CRS::from_epsg(code as u32)),
        Err(_) => srs.to_wkt().ok().map(CRS::from_wkt),
    });

    let format = if path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("img"))
    {
        RasterFormat::ErdasImagine
    } else {
        RasterFormat::GeoTiff
    };

    debug!("GDAL decoded {} bands x {} x {} from {}", bands, cols, rows, path.display());

    let profile = RasterProfile {
        format,
        width: cols,
        height: rows,
        count: bands,
        dtype,
        transform,
        crs,
        nodata,
        photometric: if bands == 3 { Photometric::Rgb } else { Photometric::MinIsBlack },
        interleave: Interleave::Band,
        geokeys: None,
        geo_double_params: None,
        geo_ascii_params: None,
    };

    Ok((raster, profile))
}

fn sample_type(band_type: GdalDataType) -> SampleType {
    match band_type {
        GdalDataType::UInt8 => SampleType::U8,
        GdalDataType::UInt16 => SampleType::U16,
        GdalDataType::UInt32 => SampleType::U32,
        GdalDataType::UInt64 => SampleType::U64,
        GdalDataType::Int8 => SampleType::I8,
        GdalDataType::Int16 => SampleType::I16,
        GdalDataType::Int32 => SampleType::I32,
        GdalDataType::Int64 => SampleType::I64,
        GdalDataType::Float32 => SampleType::F32,
        _ => SampleType::F64,
    }
}

/// Write an RGB overlay through the GTiff driver
///
/// Each channel of [`OverlayImage::to_band_sequential`] is written as its own band.
pub fn write_overlay<P: AsRef<Path>>(
    overlay: &OverlayImage,
    profile: &RasterProfile,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    write_overlay_bands(overlay, profile, path).inspect_err(|_| {
        let _ = std::fs::remove_file(path);
    })
}

fn write_overlay_bands(overlay: &OverlayImage, profile: &RasterProfile, path: &Path) -> Result<()> {
    let driver =
        DriverManager::get_driver_by_name("GTiff").map_err(|e| Error::write_failure(path, e))?;

    let (rows, cols) = overlay.shape();
    let create_options = ["COMPRESS=DEFLATE", "PHOTOMETRIC=RGB", "INTERLEAVE=PIXEL"];

    let mut dataset = driver
        .create_with_band_type_with_options::<u8, _>(
            path,
            cols as isize,
            rows as isize,
            profile.count as isize,
            &create_options,
        )
        .map_err(|e| Error::write_failure(path, e))?;

    dataset
        .set_geo_transform(&profile.transform.to_gdal())
        .map_err(|e| Error::write_failure(path, e))?;

    if let Some(crs) = &profile.crs {
        let srs = if let Some(epsg) = crs.epsg() {
            SpatialRef::from_epsg(epsg)
        } else {
            SpatialRef::from_wkt(crs.wkt().unwrap_or_default())
        }
        .map_err(|e| Error::write_failure(path, e))?;
        dataset
            .set_spatial_ref(&srs)
            .map_err(|e| Error::write_failure(path, e))?;
    }

    let planes = overlay.to_band_sequential();
    for (idx, plane) in planes.outer_iter().enumerate() {
        let mut band = dataset
            .rasterband(idx + 1)
            .map_err(|e| Error::write_failure(path, e))?;
        let data: Vec<u8> = plane.iter().copied().collect();
        band.write((0, 0), (cols, rows), &data)
            .map_err(|e| Error::write_failure(path, e))?;
    }

    Ok(())
}
