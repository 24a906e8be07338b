//! Change mask compositing into an RGB overlay.

use crate::scheme::{ADDED_COLOR, REMOVED_COLOR};
use changemask_core::raster::{ChangeMask, OverlayImage};
use changemask_core::{Error, Result};

/// Paint added and removed masks onto a black overlay.
///
/// Added pixels become [`ADDED_COLOR`] (green), then removed pixels become
/// [`REMOVED_COLOR`] (red). Where both masks are set, removed is painted last
/// and wins.
///
/// Returns [`Error::ShapeMismatch`] when the masks differ in extent.
pub fn composite(added: &ChangeMask, removed: &ChangeMask) -> Result<OverlayImage> {
    let (rows, cols) = added.shape();
    if removed.shape() != (rows, cols) {
        let (r_rows, r_cols) = removed.shape();
        return Err(Error::ShapeMismatch {
            expected: (1, rows, cols),
            actual: (1, r_rows, r_cols),
        });
    }

    let mut overlay = OverlayImage::new(rows, cols);

    for (mask, color) in [(added, ADDED_COLOR), (removed, REMOVED_COLOR)] {
        for ((row, col), &set) in mask.data().indexed_iter() {
            if set {
                overlay.set_pixel(row, col, color.to_array())?;
            }
        }
    }

    Ok(overlay)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(data: &[bool], rows: usize, cols: usize) -> ChangeMask {
        ChangeMask::from_vec(data.to_vec(), rows, cols).unwrap()
    }

    #[test]
    fn composite_colors() {
        let added = mask(&[true, false], 1, 2);
        let removed = mask(&[false, true], 1, 2);

        let overlay = composite(&added, &removed).unwrap();

        assert_eq!(overlay.pixel(0, 0).unwrap(), [0, 255, 0]);
        assert_eq!(overlay.pixel(0, 1).unwrap(), [255, 0, 0]);
    }

    #[test]
    fn composite_unchanged_is_black() {
        let overlay = composite(&ChangeMask::new(2, 2), &ChangeMask::new(2, 2)).unwrap();
        assert!(overlay.data().iter().all(|&v| v == 0));
        assert_eq!(overlay.shape(), (2, 2));
    }

    #[test]
    fn composite_overlap_removed_wins() {
        let both = mask(&[true], 1, 1);
        let overlay = composite(&both, &both).unwrap();
        assert_eq!(overlay.pixel(0, 0).unwrap(), [255, 0, 0]);
    }

    #[test]
    fn composite_shape_mismatch() {
        let err = composite(&ChangeMask::new(2, 2), &ChangeMask::new(2, 3)).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }
}
