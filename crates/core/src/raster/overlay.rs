//! RGB overlay image

use crate::error::{Error, Result};
use ndarray::Array3;

/// Number of channels in an overlay
pub const OVERLAY_CHANNELS: usize = 3;

/// An 8-bit RGB image laid out as `(row, col, channel)`.
///
/// The memory order is pixel-interleaved, which is what a chunky RGB TIFF
/// strip expects. Band-sequential writers use [`OverlayImage::to_band_sequential`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayImage {
    data: Array3<u8>,
}

impl OverlayImage {
    /// Create a black overlay
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array3::zeros((rows, cols, OVERLAY_CHANNELS)),
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.dim().0
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.dim().1
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        let (rows, cols, _) = self.data.dim();
        (rows, cols)
    }

    /// Get the RGB triple at (row, col)
    pub fn pixel(&self, row: usize, col: usize) -> Result<[u8; 3]> {
        self.check_bounds(row, col)?;
        Ok([
            self.data[(row, col, 0)],
            self.data[(row, col, 1)],
            self.data[(row, col, 2)],
        ])
    }

    /// Set the RGB triple at (row, col)
    pub fn set_pixel(&mut self, row: usize, col: usize, rgb: [u8; 3]) -> Result<()> {
        self.check_bounds(row, col)?;
        for (channel, value) in rgb.into_iter().enumerate() {
            self.data[(row, col, channel)] = value;
        }
        Ok(())
    }

    /// Pixel-interleaved bytes (r, g, b, r, g, b, ...)
    pub fn to_interleaved(&self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }

    /// Transpose `(row, col, 3)` into band-sequential `(3, row, col)`
    pub fn to_band_sequential(&self) -> Array3<u8> {
        self.data
            .view()
            .permuted_axes([2, 0, 1])
            .as_standard_layout()
            .into_owned()
    }

    /// Get a reference to the underlying `(row, col, channel)` array
    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_overlay_is_black() {
        let overlay = OverlayImage::new(2, 3);
        assert_eq!(overlay.shape(), (2, 3));
        assert_eq!(overlay.pixel(1, 2).unwrap(), [0, 0, 0]);
    }

    #[test]
    fn test_band_sequential_transpose() {
        let mut overlay = OverlayImage::new(2, 2);
        overlay.set_pixel(0, 1, [10, 20, 30]).unwrap();
        overlay.set_pixel(1, 0, [40, 50, 60]).unwrap();

        let bands = overlay.to_band_sequential();
        assert_eq!(bands.dim(), (3, 2, 2));
        assert_eq!(bands[(0, 0, 1)], 10);
        assert_eq!(bands[(1, 0, 1)], 20);
        assert_eq!(bands[(2, 0, 1)], 30);
        assert_eq!(bands[(2, 1, 0)], 60);
        assert!(bands.is_standard_layout());
    }

    #[test]
    fn test_interleaved_order() {
        let mut overlay = OverlayImage::new(1, 2);
        overlay.set_pixel(0, 1, [255, 0, 0]).unwrap();
        assert_eq!(overlay.to_interleaved(), vec![0, 0, 0, 255, 0, 0]);
    }

    #[test]
    fn test_out_of_bounds_pixel() {
        let overlay = OverlayImage::new(1, 1);
        assert!(matches!(overlay.pixel(0, 1), Err(Error::IndexOutOfBounds { .. })));
    }
}
