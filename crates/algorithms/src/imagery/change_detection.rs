//! Change detection between two co-registered rasters
//!
//! Both dates are normalized band by band, then each pixel is classified by:
//! - Magnitude: mean absolute normalized difference across bands
//! - Direction: strict majority of bands getting brighter (added) or darker (removed)

use ndarray::Array3;
use crate::imagery::normalize::normalize;
use crate::maybe_rayon::*;
use changemask_core::raster::{ChangeMask, MultiBandRaster};
use changemask_core::{Error, Result};

/// Default mean normalized difference above which a pixel counts as changed
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Parameters for change detection
#[derive(Debug, Clone)]
pub struct ChangeDetectionParams {
    /// Mean normalized band difference a pixel must exceed (strictly) to count as changed
    pub threshold: f64,
}

impl Default for ChangeDetectionParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Directional change masks
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeMasks {
    /// Changed pixels where most bands increased
    pub added: ChangeMask,
    /// Changed pixels where most bands decreased
    pub removed: ChangeMask,
}

impl ChangeMasks {
    pub fn added_count(&self) -> usize {
        self.added.count()
    }

    pub fn removed_count(&self) -> usize {
        self.removed.count()
    }
}

/// Detect additions and removals between two dates.
///
/// For each pixel, with both images normalized per band to [0, 1]:
///
/// `mean_diff = mean_b |after_b - before_b|`, changed when `mean_diff > threshold`
///
/// - added: changed and more than half the bands have `after > before`
/// - removed: changed and more than half the bands have `before > after`
///
/// A pixel split evenly between increasing and decreasing bands is neither.
/// The two masks are not forced to be exclusive.
///
/// # Arguments
/// * `before` - Raster at time T1
/// * `after` - Raster at time T2, same (bands, rows, cols) as `before`
/// * `params` - Threshold parameters
///
/// # Errors
/// [`Error::ShapeMismatch`] when the inputs differ in band count or extent,
/// [`Error::InvalidParameter`] for a non-finite threshold.
pub fn detect_changes(
    before: &MultiBandRaster<f64>,
    after: &MultiBandRaster<f64>,
    params: ChangeDetectionParams,
) -> Result<ChangeMasks> {
    if before.shape() != after.shape() {
        return Err(Error::ShapeMismatch {
            expected: before.shape(),
            actual: after.shape(),
        });
    }

    if !params.threshold.is_finite() {
        return Err(Error::InvalidParameter {
            name: "threshold",
            value: params.threshold.to_string(),
            reason: "must be a finite number".into(),
        });
    }

    let (bands, rows, cols) = before.shape();
    let before_norm = normalize(before)?;
    let after_norm = normalize(after)?;
    let b = before_norm.data();
    let a = after_norm.data();
    let threshold = params.threshold;

    let (added, removed): (Vec<bool>, Vec<bool>) = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .map(|col| classify_pixel(b, a, bands, row, col, threshold))
                .collect::<Vec<_>>()
        })
        .unzip();

    Ok(ChangeMasks {
        added: ChangeMask::from_vec(added, rows, cols)?,
        removed: ChangeMask::from_vec(removed, rows, cols)?,
    })
}

/// (added, removed) for one pixel of normalized inputs
fn classify_pixel(
    before: &Array3<f64>,
    after: &Array3<f64>,
    bands: usize,
    row: usize,
    col: usize,
    threshold: f64,
) -> (bool, bool) {
    let mut diff_sum = 0.0;
    let mut increased = 0usize;
    let mut decreased = 0usize;

    for band in 0..bands {
        let b = before[(band, row, col)];
        let a = after[(band, row, col)];
        diff_sum += (a - b).abs();
        if a > b {
            increased += 1;
        } else if b > a {
            decreased += 1;
        }
    }

    let n = bands as f64;
    let changed = diff_sum / n > threshold;
    let added = increased as f64 / n > 0.5 && changed;
    let removed = decreased as f64 / n > 0.5 && changed;

    (added, removed)
}
