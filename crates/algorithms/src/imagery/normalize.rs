//! Per-band min-max normalization

use ndarray::{Array3, Axis};
use crate::maybe_rayon::*;
use changemask_core::raster::MultiBandRaster;
use changemask_core::{Error, Result};

/// Observed value range of one band.
///
/// Returns `None` when the band is empty or holds a NaN sample: a NaN
/// poisons the band's min and max, so the band has no usable range.
pub fn band_range<'a, I>(samples: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut iter = samples.into_iter().peekable();
    iter.peek()?;

    iter.try_fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        if v.is_nan() {
            None
        } else {
            Some((lo.min(v), hi.max(v)))
        }
    })
}

/// Rescale every band of `image` independently into [0, 1].
///
/// `out = (v - min) / (max - min)` using the band's own min and max.
/// A band whose range is not positive becomes all zeros. That covers
/// constant bands and any band containing a NaN sample, whose NaN and
/// finite samples alike come out as 0.
///
/// Bands are processed in parallel when the `parallel` feature is enabled.
pub fn normalize(image: &MultiBandRaster<f64>) -> Result<MultiBandRaster<f64>> {
    let (bands, rows, cols) = image.shape();
    let data = image.data();

    let normalized: Vec<f64> = (0..bands)
        .into_par_iter()
        .flat_map(|b| {
            let band = data.index_axis(Axis(0), b);
            match band_range(band.iter()) {
                Some((min, max)) if max - min > 0.0 => {
                    let span = max - min;
                    band.iter().map(|&v| (v - min) / span).collect::<Vec<f64>>()
                }
                _ => vec![0.0; rows * cols],
            }
        })
        .collect();

    let array = Array3::from_shape_vec((bands, rows, cols), normalized)
        .map_err(|e| Error::Other(e.to_string()))?;
    MultiBandRaster::from_array(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stack(data: Vec<f64>, bands: usize, rows: usize, cols: usize) -> MultiBandRaster<f64> {
        MultiBandRaster::from_vec(data, bands, rows, cols).unwrap()
    }

    #[test]
    fn test_unit_range_band_is_unchanged() {
        let input = stack(vec![0.0, 0.25, 0.5, 1.0], 1, 2, 2);
        let out = normalize(&input).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_constant_band_becomes_zero() {
        let input = stack(vec![5.0; 6], 1, 2, 3);
        let out = normalize(&input).unwrap();
        assert!(out.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_all_zero_band_stays_zero() {
        let out = normalize(&stack(vec![0.0; 4], 1, 2, 2)).unwrap();
        assert!(out.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_bands_use_their_own_range() {
        // band 0 in [10, 20], band 1 in [-4, 4]
        let input = stack(vec![10.0, 15.0, 20.0, -4.0, 0.0, 4.0], 2, 1, 3);
        let out = normalize(&input).unwrap();

        assert_relative_eq!(out.get(0, 0, 1).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(out.get(1, 0, 0).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(out.get(1, 0, 1).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(out.get(1, 0, 2).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_band_does_not_affect_others() {
        let input = stack(vec![7.0, 7.0, 0.0, 100.0], 2, 1, 2);
        let out = normalize(&input).unwrap();
        assert_eq!(out.data().as_slice().unwrap(), &[0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_nan_sample_zeroes_its_band() {
        // band 0 holds a NaN, band 1 is clean
        let input = stack(vec![2.0, f64::NAN, 4.0, 1.0, 2.0, 3.0], 2, 1, 3);
        let out = normalize(&input).unwrap();
        assert_eq!(out.data().as_slice().unwrap(), &[0.0, 0.0, 0.0, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_band_range() {
        assert_eq!(band_range(&[3.0, -1.0, 8.0]), Some((-1.0, 8.0)));
        assert_eq!(band_range(&[3.0, f64::NAN, 8.0]), None);
        assert_eq!(band_range(&[f64::NAN, f64::NAN]), None);
        assert_eq!(band_range(&[] as &[f64]), None);
    }

    #[test]
    fn test_input_not_mutated() {
        let input = stack(vec![1.0, 3.0], 1, 1, 2);
        let copy = input.clone();
        normalize(&input).unwrap();
        assert_eq!(input, copy);
    }
}
