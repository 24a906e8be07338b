//! Affine geotransformation for rasters

use serde::{Deserialize, Serialize};

/// Affine transformation coefficients for georeferencing rasters.
///
/// Converts between pixel coordinates (col, row) and geographic coordinates (x, y):
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// For north-up images, `row_rotation` and `col_rotation` are typically 0,
/// and `pixel_height` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width (cell size in X direction)
    pub pixel_width: f64,
    /// Pixel height (cell size in Y direction, usually negative)
    pub pixel_height: f64,
    /// Rotation about X axis (usually 0)
    pub row_rotation: f64,
    /// Rotation about Y axis (usually 0)
    pub col_rotation: f64,
}

impl GeoTransform {
    /// Create a new GeoTransform with no rotation (north-up image)
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// Create from GDAL-style array [origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]
    pub fn from_gdal(coeffs: [f64; 6]) -> Self {
        Self {
            origin_x: coeffs[0],
            pixel_width: coeffs[1],
            row_rotation: coeffs[2],
            origin_y: coeffs[3],
            col_rotation: coeffs[4],
            pixel_height: coeffs[5],
        }
    }

    /// Convert to GDAL-style array
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// Build from GeoTIFF ModelPixelScale (33550) and ModelTiepoint (33922) values.
    ///
    /// tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ].
    /// Returns `None` when either tag is too short.
    pub fn from_tiepoint_scale(tiepoint: &[f64], scale: &[f64]) -> Option<Self> {
        if scale.len() < 2 || tiepoint.len() < 6 {
            return None;
        }
        let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
        let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
        Some(Self::new(origin_x, origin_y, scale[0], -scale[1]))
    }

    /// ModelPixelScale tag values for this transform
    pub fn pixel_scale(&self) -> [f64; 3] {
        [self.pixel_width, self.pixel_height.abs(), 0.0]
    }

    /// ModelTiepoint tag values anchoring pixel (0, 0) at the origin
    pub fn tiepoint(&self) -> [f64; 6] {
        [0.0, 0.0, 0.0, self.origin_x, self.origin_y, 0.0]
    }

    /// Build from a GeoTIFF ModelTransformation (34264) matrix.
    ///
    /// The tag holds a row-major 4x4 matrix; only the 2-D affine terms are used.
    /// Returns `None` when fewer than 16 values are present.
    pub fn from_model_transformation(matrix: &[f64]) -> Option<Self> {
        if matrix.len() < 16 {
            return None;
        }
        Some(Self {
            origin_x: matrix[3],
            pixel_width: matrix[0],
            row_rotation: matrix[1],
            origin_y: matrix[7],
            col_rotation: matrix[4],
            pixel_height: matrix[5],
        })
    }

    /// ModelTransformation tag values for this transform
    pub fn model_transformation(&self) -> [f64; 16] {
        [
            self.pixel_width, self.row_rotation, 0.0, self.origin_x,
            self.col_rotation, self.pixel_height, 0.0, self.origin_y,
            0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]
    }

    /// Unrotated grid with x growing east and y growing south.
    ///
    /// Only these transforms fit ModelPixelScale + ModelTiepoint; others need
    /// ModelTransformation.
    pub fn is_north_up(&self) -> bool {
        self.row_rotation == 0.0
            && self.col_rotation == 0.0
            && self.pixel_width > 0.0
            && self.pixel_height < 0.0
    }

    /// Convert pixel coordinates to geographic coordinates (top-left corner)
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        let col_f = col as f64;
        let row_f = row as f64;

        let x = self.origin_x + col_f * self.pixel_width + row_f * self.row_rotation;
        let y = self.origin_y + col_f * self.col_rotation + row_f * self.pixel_height;

        (x, y)
    }

    /// Get the cell size (assumes square pixels and no rotation)
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Calculate the bounding box for a raster of given dimensions
    pub fn bounds(&self, width: usize, height: usize) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.pixel_to_geo_corner(0, 0);
        let (x1, y1) = self.pixel_to_geo_corner(width, 0);
        let (x2, y2) = self.pixel_to_geo_corner(0, height);
        let (x3, y3) = self.pixel_to_geo_corner(width, height);

        let min_x = x0.min(x1).min(x2).min(x3);
        let max_x = x0.max(x1).max(x2).max(x3);
        let min_y = y0.min(y1).min(y2).min(y3);
        let max_y = y0.max(y1).max(y2).max(y3);

        (min_x, min_y, max_x, max_y)
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tiepoint_scale_roundtrip() {
        let gt = GeoTransform::new(500_000.0, 4_200_000.0, 0.5, -0.5);
        let back = GeoTransform::from_tiepoint_scale(&gt.tiepoint(), &gt.pixel_scale()).unwrap();
        assert_eq!(back, gt);
    }

    #[test]
    fn test_tiepoint_offset_from_origin() {
        // Tiepoint anchored at pixel (10, 20) instead of (0, 0)
        let tiepoint = [10.0, 20.0, 0.0, 110.0, 180.0, 0.0];
        let scale = [2.0, 2.0, 0.0];
        let gt = GeoTransform::from_tiepoint_scale(&tiepoint, &scale).unwrap();
        assert_relative_eq!(gt.origin_x, 90.0, epsilon = 1e-10);
        assert_relative_eq!(gt.origin_y, 220.0, epsilon = 1e-10);
        assert_relative_eq!(gt.pixel_height, -2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_short_tags_rejected() {
        assert!(GeoTransform::from_tiepoint_scale(&[0.0; 3], &[1.0, 1.0]).is_none());
    }

    #[test]
    fn test_model_transformation_roundtrip_keeps_rotation() {
        let gt = GeoTransform {
            origin_x: 1000.0,
            origin_y: 2000.0,
            pixel_width: 0.8,
            pixel_height: -0.8,
            row_rotation: 0.1,
            col_rotation: -0.05,
        };
        let back = GeoTransform::from_model_transformation(&gt.model_transformation()).unwrap();
        assert_eq!(back, gt);
        assert!(!gt.is_north_up());
        assert!(GeoTransform::from_model_transformation(&[1.0; 12]).is_none());
    }

    #[test]
    fn test_north_up_detection() {
        assert!(GeoTransform::new(0.0, 10.0, 1.0, -1.0).is_north_up());
        // y growing north (south-up storage)
        assert!(!GeoTransform::new(0.0, 0.0, 1.0, 1.0).is_north_up());
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::new(0.0, 100.0, 1.0, -1.0);
        let (min_x, min_y, max_x, max_y) = gt.bounds(100, 100);

        assert_relative_eq!(min_x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(min_y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(max_x, 100.0, epsilon = 1e-10);
        assert_relative_eq!(max_y, 100.0, epsilon = 1e-10);
    }
}
