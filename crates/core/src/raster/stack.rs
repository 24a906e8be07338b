//! Multi-band raster stack

use crate::error::{Error, Result};
use crate::raster::RasterElement;
use ndarray::{Array3, Axis};

/// A multi-band raster held as a `(band, row, col)` array.
///
/// Every band shares the same row/column extent, which the 3-D array
/// layout guarantees. Georeferencing lives separately in
/// [`RasterProfile`](crate::RasterProfile) so the stack stays a plain
/// numeric container.
///
/// # Example
///
/// ```ignore
/// use changemask_core::MultiBandRaster;
///
/// let stack = MultiBandRaster::from_vec(vec![0.0, 1.0, 2.0, 3.0], 1, 2, 2)?;
/// assert_eq!(stack.shape(), (1, 2, 2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MultiBandRaster<T: RasterElement> {
    data: Array3<T>,
}

impl<T: RasterElement> MultiBandRaster<T> {
    /// Create a zero-filled stack
    pub fn new(bands: usize, rows: usize, cols: usize) -> Result<Self> {
        check_dimensions(bands, rows, cols)?;
        Ok(Self {
            data: Array3::zeros((bands, rows, cols)),
        })
    }

    /// Create a stack from band-sequential data (all of band 0, then band 1, ...)
    pub fn from_vec(data: Vec<T>, bands: usize, rows: usize, cols: usize) -> Result<Self> {
        check_dimensions(bands, rows, cols)?;
        if data.len() != bands * rows * cols {
            return Err(Error::InvalidDimensions { bands, rows, cols });
        }
        let array = Array3::from_shape_vec((bands, rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(Self { data: array })
    }

    /// Create a stack from pixel-interleaved data (all bands of pixel 0, then pixel 1, ...)
    ///
    /// This is the sample order of chunky TIFF strips.
    pub fn from_interleaved(data: Vec<T>, bands: usize, rows: usize, cols: usize) -> Result<Self> {
        check_dimensions(bands, rows, cols)?;
        if data.len() != bands * rows * cols {
            return Err(Error::InvalidDimensions { bands, rows, cols });
        }
        let pixels = Array3::from_shape_vec((rows, cols, bands), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        let data = pixels.permuted_axes([2, 0, 1]).as_standard_layout().into_owned();
        Ok(Self { data })
    }

    /// Create a stack from an existing `(band, row, col)` array
    pub fn from_array(data: Array3<T>) -> Result<Self> {
        let (bands, rows, cols) = data.dim();
        check_dimensions(bands, rows, cols)?;
        Ok(Self { data })
    }

    /// Number of bands
    pub fn bands(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    /// Dimensions as (bands, rows, cols)
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get value at (band, row, col)
    pub fn get(&self, band: usize, row: usize, col: usize) -> Result<T> {
        self.data
            .get((band, row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array3<T> {
        &self.data
    }

    /// Consume the stack and return the underlying array
    pub fn into_array(self) -> Array3<T> {
        self.data
    }

    /// Samples in pixel-interleaved order
    pub fn to_interleaved(&self) -> Vec<T> {
        self.data.view().permuted_axes([1, 2, 0]).iter().copied().collect()
    }

    /// Per-band statistics over non-NaN samples
    pub fn band_statistics(&self) -> Vec<BandStatistics> {
        self.data
            .axis_iter(Axis(0))
            .map(|band| {
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                let mut sum = 0.0;
                let mut count = 0usize;
                for v in band.iter().filter_map(|v| v.to_f64()) {
                    if v.is_nan() {
                        continue;
                    }
                    min = min.min(v);
                    max = max.max(v);
                    sum += v;
                    count += 1;
                }
                if count == 0 {
                    BandStatistics { min: None, max: None, mean: None, valid_count: 0 }
                } else {
                    BandStatistics {
                        min: Some(min),
                        max: Some(max),
                        mean: Some(sum / count as f64),
                        valid_count: count,
                    }
                }
            })
            .collect()
    }
}

/// Basic statistics for one band
#[derive(Debug, Clone, PartialEq)]
pub struct BandStatistics {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub valid_count: usize,
}

fn check_dimensions(bands: usize, rows: usize, cols: usize) -> Result<()> {
    if bands == 0 || rows == 0 || cols == 0 {
        return Err(Error::InvalidDimensions { bands, rows, cols });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_creation() {
        let stack: MultiBandRaster<f64> = MultiBandRaster::new(3, 100, 200).unwrap();
        assert_eq!(stack.bands(), 3);
        assert_eq!(stack.rows(), 100);
        assert_eq!(stack.cols(), 200);
        assert_eq!(stack.shape(), (3, 100, 200));
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            MultiBandRaster::<f64>::new(0, 10, 10),
            Err(Error::InvalidDimensions { bands: 0, .. })
        ));
        assert!(MultiBandRaster::<f64>::from_vec(vec![], 1, 0, 4).is_err());
    }

    #[test]
    fn test_from_vec_length_checked() {
        let err = MultiBandRaster::from_vec(vec![1.0f64; 5], 1, 2, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { rows: 2, cols: 2, .. }));
    }

    #[test]
    fn test_interleaved_is_deinterleaved_per_band() {
        // 1x2 pixels, 3 bands: (r,g,b) = (1,2,3), (4,5,6)
        let stack = MultiBandRaster::from_interleaved(vec![1u8, 2, 3, 4, 5, 6], 3, 1, 2).unwrap();
        assert_eq!(stack.get(0, 0, 0).unwrap(), 1);
        assert_eq!(stack.get(0, 0, 1).unwrap(), 4);
        assert_eq!(stack.get(2, 0, 1).unwrap(), 6);
        assert_eq!(stack.to_interleaved(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_band_sequential_layout_and_bounds() {
        let stack = MultiBandRaster::from_vec((0..8).map(|v| v as f64).collect(), 2, 2, 2).unwrap();
        assert_eq!(stack.get(1, 0, 0).unwrap(), 4.0);
        assert_eq!(stack.get(1, 1, 1).unwrap(), 7.0);
        assert!(matches!(stack.get(2, 0, 0), Err(Error::IndexOutOfBounds { .. })));
        assert!(matches!(stack.get(0, 2, 0), Err(Error::IndexOutOfBounds { .. })));
    }

    #[test]
    fn test_band_statistics_skip_nan() {
        let stack =
            MultiBandRaster::from_vec(vec![1.0, f64::NAN, 3.0, 5.0, f64::NAN, f64::NAN], 2, 1, 3)
                .unwrap();
        let stats = stack.band_statistics();
        assert_eq!(stats[0].min, Some(1.0));
        assert_eq!(stats[0].max, Some(3.0));
        assert_eq!(stats[0].mean, Some(2.0));
        assert_eq!(stats[0].valid_count, 2);
        assert_eq!(stats[1].valid_count, 1);
    }
}
