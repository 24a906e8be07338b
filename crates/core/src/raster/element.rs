//! Sample element trait for generic band values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Trait for types that can be stored in a raster band.
///
/// Samples decoded from disk arrive in their native type (u8, u16, f32, ...)
/// and are cast into `T` through [`RasterElement::from_sample`].
pub trait RasterElement:
    Copy + Clone + Debug + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Value used when a decoded sample does not fit in this type
    fn default_nodata() -> Self;

    /// Convert self to f64
    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }

    /// Cast a decoded sample into this type, falling back to
    /// [`RasterElement::default_nodata`] when it is out of range
    fn from_sample<S: NumCast>(sample: S) -> Self {
        num_traits::cast(sample).unwrap_or_else(Self::default_nodata)
    }
}

macro_rules! impl_raster_element_int {
    ($t:ty) => {
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::MIN
            }
        }
    };
}

macro_rules! impl_raster_element_float {
    ($t:ty) => {
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::NAN
            }
        }
    };
}

impl_raster_element_int!(i8);
impl_raster_element_int!(i16);
impl_raster_element_int!(i32);
impl_raster_element_int!(i64);
impl_raster_element_int!(u8);
impl_raster_element_int!(u16);
impl_raster_element_int!(u32);
impl_raster_element_int!(u64);
impl_raster_element_float!(f32);
impl_raster_element_float!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotes_integer_samples_to_f64() {
        assert_eq!(f64::from_sample(65535u16), 65535.0);
        assert_eq!(f64::from_sample(-12i16), -12.0);
    }

    #[test]
    fn out_of_range_sample_falls_back_to_nodata() {
        assert_eq!(u8::from_sample(300u16), u8::MIN);
        assert!(f32::from_sample(f64::NAN).is_nan());
    }
}
