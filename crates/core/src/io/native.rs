//! Native GeoTIFF reading/writing (without GDAL dependency)
//!
//! Uses the `tiff` crate for chunky (pixel-interleaved) TIFFs of any band count.
//! ERDAS Imagine and planar TIFFs need the `gdal` feature.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::profile::{Interleave, Photometric, RasterProfile, SampleType};
use crate::raster::{GeoTransform, MultiBandRaster, OverlayImage, RasterElement};
use crate::io::RasterFormat;
use num_traits::NumCast;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::colortype::{Gray32Float, RGB32Float, RGB8};
use tiff::encoder::{DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;
use tiff::ColorType;
use tracing::{debug, warn};

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const MODEL_TRANSFORMATION: u16 = 34264;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GEO_DOUBLE_PARAMS: u16 = 34736;
const GEO_ASCII_PARAMS: u16 = 34737;
const GDAL_NODATA: u16 = 42113;

/// GTModelTypeGeoKey
const GT_MODEL_TYPE: u16 = 1024;
/// GTRasterTypeGeoKey
const GT_RASTER_TYPE: u16 = 1025;
const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;

/// PlanarConfiguration value for band-sequential storage
const PLANAR_SEPARATE: u32 = 2;

/// Read every band of a GeoTIFF file
pub fn read_raster_stack<T, P>(path: P) -> Result<(MultiBandRaster<T>, RasterProfile)>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::unreadable(path, e))?;
    decode_raster_stack(file, path)
}

/// Read every band of a GeoTIFF held in memory
///
/// Useful where filesystem access is not available.
pub fn read_raster_stack_from_buffer<T>(data: &[u8]) -> Result<(MultiBandRaster<T>, RasterProfile)>
where
    T: RasterElement,
{
    decode_raster_stack(Cursor::new(data), Path::new("<buffer>"))
}

fn decode_raster_stack<T, R>(reader: R, source: &Path) -> Result<(MultiBandRaster<T>, RasterProfile)>
where
    T: RasterElement,
    R: Read + Seek,
{
    // no cap on decoded buffer size; full scenes exceed the default
    let mut decoder = Decoder::new(reader)
        .map_err(|e| Error::unreadable(source, format!("TIFF decode error: {}", e)))?
        .with_limits(Limits::unlimited());

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::unreadable(source, format!("cannot read dimensions: {}", e)))?;
    let rows = height as usize;
    let cols = width as usize;

    let colortype = decoder
        .colortype()
        .map_err(|e| Error::unreadable(source, format!("cannot read color type: {}", e)))?;
    let photometric = match colortype {
        ColorType::RGB(_) | ColorType::RGBA(_) => Photometric::Rgb,
        _ => Photometric::MinIsBlack,
    };
    let bands = decoder.get_tag_u32(Tag::SamplesPerPixel).unwrap_or(1) as usize;

    if decoder.get_tag_u32(Tag::PlanarConfiguration).ok() == Some(PLANAR_SEPARATE) {
        return Err(Error::unreadable(
            source,
            "band-sequential (planar) TIFF layout requires the `gdal` feature",
        ));
    }

    let result = decoder
        .read_image()
        .map_err(|e| Error::unreadable(source, format!("cannot read image data: {}", e)))?;

    let (samples, dtype): (Vec<T>, SampleType) = match result {
        DecodingResult::U8(buf) => (cast_samples(buf), SampleType::U8),
        DecodingResult::U16(buf) => (cast_samples(buf), SampleType::U16),
        DecodingResult::U32(buf) => (cast_samples(buf), SampleType::U32),
        DecodingResult::U64(buf) => (cast_samples(buf), SampleType::U64),
        DecodingResult::I8(buf) => (cast_samples(buf), SampleType::I8),
        DecodingResult::I16(buf) => (cast_samples(buf), SampleType::I16),
        DecodingResult::I32(buf) => (cast_samples(buf), SampleType::I32),
        DecodingResult::I64(buf) => (cast_samples(buf), SampleType::I64),
        DecodingResult::F32(buf) => (cast_samples(buf), SampleType::F32),
        DecodingResult::F64(buf) => (cast_samples(buf), SampleType::F64),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(Error::unreadable(
                source,
                format!("unsupported TIFF sample format for {:?}", colortype),
            ))
        }
    };

    let raster = MultiBandRaster::from_interleaved(samples, bands, rows, cols)
        .map_err(|e| Error::unreadable(source, e))?;

    let transform = read_geotransform(&mut decoder).unwrap_or_else(|| {
        warn!(
            "No georeferencing tags in {}; using the identity pixel grid",
            source.display()
        );
        GeoTransform::default()
    });
    let geokeys = decoder.get_tag_u16_vec(geotiff_tag(GEO_KEY_DIRECTORY)).ok();
    let geo_double_params = decoder.get_tag_f64_vec(geotiff_tag(GEO_DOUBLE_PARAMS)).ok();
    let geo_ascii_params = decoder.get_tag_ascii_string(geotiff_tag(GEO_ASCII_PARAMS)).ok();
    let crs = geokeys.as_deref().and_then(CRS::from_geokeys);
    let nodata = decoder
        .get_tag_ascii_string(geotiff_tag(GDAL_NODATA))
        .ok()
        .and_then(|s| s.trim_end_matches('\0').trim().parse::<f64>().ok());

    debug!(
        "Decoded {} bands x {} x {} ({}) from {}",
        bands,
        cols,
        rows,
        dtype,
        source.display()
    );

    let profile = RasterProfile {
        format: RasterFormat::GeoTiff,
        width: cols,
        height: rows,
        count: bands,
        dtype,
        transform,
        crs,
        nodata,
        photometric,
        interleave: Interleave::Pixel,
        geokeys,
        geo_double_params,
        geo_ascii_params,
    };

    Ok((raster, profile))
}

fn cast_samples<S: NumCast + Copy, T: RasterElement>(buf: Vec<S>) -> Vec<T> {
    buf.into_iter().map(T::from_sample).collect()
}

/// Tag lookup that resolves to the named variant when the `tiff` crate knows the code
fn geotiff_tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

/// GeoTransform from ModelPixelScale + ModelTiepoint, falling back to ModelTransformation
fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(geotiff_tag(MODEL_PIXEL_SCALE)).ok();
    let tiepoint = decoder.get_tag_f64_vec(geotiff_tag(MODEL_TIEPOINT)).ok();
    if let (Some(scale), Some(tiepoint)) = (scale, tiepoint) {
        if let Some(gt) = GeoTransform::from_tiepoint_scale(&tiepoint, &scale) {
            return Some(gt);
        }
    }

    let matrix = decoder.get_tag_f64_vec(geotiff_tag(MODEL_TRANSFORMATION)).ok()?;
    GeoTransform::from_model_transformation(&matrix)
}

/// Write an RGB overlay as a pixel-interleaved 8-bit GeoTIFF.
///
/// `profile` must already describe the overlay (see [`RasterProfile::for_overlay`]).
/// The file is encoded in memory first; nothing is left on disk if writing fails.
pub fn write_overlay<P: AsRef<Path>>(
    overlay: &OverlayImage,
    profile: &RasterProfile,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let mut buf = Vec::new();
    encode_overlay(overlay, profile, Cursor::new(&mut buf), path)?;
    write_file(path, &buf)
}

/// Write an RGB overlay into an in-memory GeoTIFF buffer
pub fn write_overlay_to_buffer(overlay: &OverlayImage, profile: &RasterProfile) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_overlay(overlay, profile, Cursor::new(&mut buf), Path::new("<buffer>"))?;
    Ok(buf)
}

fn encode_overlay<W: Write + Seek>(
    overlay: &OverlayImage,
    profile: &RasterProfile,
    writer: W,
    target: &Path,
) -> Result<()> {
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| Error::write_failure(target, format!("TIFF encoder error: {}", e)))?;

    let (rows, cols) = overlay.shape();
    let mut image = encoder
        .new_image::<RGB8>(cols as u32, rows as u32)
        .map_err(|e| Error::write_failure(target, format!("cannot create TIFF image: {}", e)))?;

    write_georeferencing(image.encoder(), profile, target)?;

    image
        .write_data(&overlay.to_interleaved())
        .map_err(|e| Error::write_failure(target, format!("cannot write image data: {}", e)))?;

    Ok(())
}

/// Write a 1- or 3-band raster as 32-bit float GeoTIFF
pub fn write_raster_stack<T, P>(raster: &MultiBandRaster<T>, profile: &RasterProfile, path: P) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let (bands, rows, cols) = raster.shape();
    let data: Vec<f32> = raster
        .to_interleaved()
        .into_iter()
        .map(|v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();

    let mut buf = Vec::new();
    {
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buf))
            .map_err(|e| Error::write_failure(path, format!("TIFF encoder error: {}", e)))?;

        match bands {
            1 => {
                let mut image = encoder
                    .new_image::<Gray32Float>(cols as u32, rows as u32)
                    .map_err(|e| Error::write_failure(path, e))?;
                write_georeferencing(image.encoder(), profile, path)?;
                image.write_data(&data).map_err(|e| Error::write_failure(path, e))?;
            }
            3 => {
                let mut image = encoder
                    .new_image::<RGB32Float>(cols as u32, rows as u32)
                    .map_err(|e| Error::write_failure(path, e))?;
                write_georeferencing(image.encoder(), profile, path)?;
                image.write_data(&data).map_err(|e| Error::write_failure(path, e))?;
            }
            n => {
                return Err(Error::UnsupportedDataType(format!(
                    "native writer supports 1 or 3 float bands, got {}",
                    n
                )))
            }
        }
    }

    write_file(path, &buf)
}

/// Georeferencing tags for `profile`.
///
/// North-up grids get ModelPixelScale + ModelTiepoint, anything rotated or
/// flipped gets ModelTransformation. The source GeoKeyDirectory is written
/// with the GeoDoubleParams/GeoAsciiParams tables its entries point into;
/// without one a directory is built from the CRS.
fn write_georeferencing<W, K>(
    dir: &mut DirectoryEncoder<'_, W, K>,
    profile: &RasterProfile,
    target: &Path,
) -> Result<()>
where
    W: Write + Seek,
    K: TiffKind,
{
    let gt = &profile.transform;

    if gt.is_north_up() {
        dir.write_tag(Tag::Unknown(MODEL_PIXEL_SCALE), &gt.pixel_scale()[..])
            .map_err(|e| Error::write_failure(target, format!("cannot write scale tag: {}", e)))?;
        dir.write_tag(Tag::Unknown(MODEL_TIEPOINT), &gt.tiepoint()[..])
            .map_err(|e| Error::write_failure(target, format!("cannot write tiepoint tag: {}", e)))?;
    } else {
        dir.write_tag(Tag::Unknown(MODEL_TRANSFORMATION), &gt.model_transformation()[..])
            .map_err(|e| {
                Error::write_failure(target, format!("cannot write transformation tag: {}", e))
            })?;
    }

    let doubles = profile.geo_double_params.as_deref();
    // TIFF ASCII must be 7-bit; a non-ASCII table is dropped with its keys
    let ascii = profile.geo_ascii_params.as_deref().filter(|text| text.is_ascii());
    let geokeys = profile
        .geokeys
        .as_deref()
        .and_then(|keys| resolvable_geokeys(keys, doubles.is_some(), ascii.is_some()));

    match geokeys {
        Some(keys) => {
            dir.write_tag(Tag::Unknown(GEO_KEY_DIRECTORY), keys.as_slice())
                .map_err(|e| Error::write_failure(target, format!("cannot write geokey tag: {}", e)))?;
            if let Some(values) = doubles {
                dir.write_tag(Tag::Unknown(GEO_DOUBLE_PARAMS), values)
                    .map_err(|e| {
                        Error::write_failure(target, format!("cannot write geo double params: {}", e))
                    })?;
            }
            if let Some(text) = ascii {
                dir.write_tag(Tag::Unknown(GEO_ASCII_PARAMS), text)
                    .map_err(|e| {
                        Error::write_failure(target, format!("cannot write geo ascii params: {}", e))
                    })?;
            }
        }
        None => {
            let keys = build_geokeys(profile.crs.as_ref());
            dir.write_tag(Tag::Unknown(GEO_KEY_DIRECTORY), keys.as_slice())
                .map_err(|e| Error::write_failure(target, format!("cannot write geokey tag: {}", e)))?;
        }
    }

    Ok(())
}

/// Copy of a GeoKeyDirectory keeping only entries whose values will exist in
/// the output: inline values, and values in a params table written alongside.
///
/// Returns `None` for a directory too short to hold its header.
fn resolvable_geokeys(directory: &[u16], has_doubles: bool, has_ascii: bool) -> Option<Vec<u16>> {
    if directory.len() < 4 {
        return None;
    }
    let declared = directory[3] as usize;

    let entries: Vec<&[u16]> = directory[4..]
        .chunks_exact(4)
        .take(declared)
        .filter(|entry| match entry[1] {
            0 => true,
            GEO_DOUBLE_PARAMS => has_doubles,
            GEO_ASCII_PARAMS => has_ascii,
            _ => false,
        })
        .collect();

    let mut keys = Vec::with_capacity(4 + entries.len() * 4);
    keys.extend_from_slice(&directory[..3]);
    keys.push(entries.len() as u16);
    for entry in entries {
        keys.extend_from_slice(entry);
    }
    Some(keys)
}

/// Minimal GeoKeyDirectory so tools recognize the file as GeoTIFF.
///
/// EPSG codes 4000..=4999 are written as geographic, everything else as projected.
fn build_geokeys(crs: Option<&CRS>) -> Vec<u16> {
    let epsg = crs
        .and_then(|c| c.epsg())
        .and_then(|code| u16::try_from(code).ok());

    let model_type = match epsg {
        Some(code) if (4000..=4999).contains(&code) => MODEL_TYPE_GEOGRAPHIC,
        _ => MODEL_TYPE_PROJECTED,
    };

    let mut keys = vec![
        1, 1, 0, 2,
        GT_MODEL_TYPE, 0, 1, model_type,
        GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA,
    ];

    if let Some(code) = epsg {
        let key = if model_type == MODEL_TYPE_GEOGRAPHIC {
            crate::crs::GEOGRAPHIC_TYPE_GEOKEY
        } else {
            crate::crs::PROJECTED_CS_TYPE_GEOKEY
        };
        keys.extend_from_slice(&[key, 0, 1, code]);
        keys[3] = 3;
    }

    keys
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Err(e) = std::fs::write(path, bytes) {
        let _ = std::fs::remove_file(path);
        return Err(Error::write_failure(path, e));
    }
    Ok(())
}
