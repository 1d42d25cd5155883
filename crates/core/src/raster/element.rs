//! Cell values of band rasters

use num_traits::Float;
use std::fmt::Debug;

/// Floating-point cell type of a band or index raster.
///
/// Reflectance, radiance and derived indices are all continuous, so only
/// `f32` and `f64` grids exist. NaN and infinities always count as nodata.
pub trait RasterElement: Float + Debug + Send + Sync + 'static {
    /// Whether this value is missing, either non-finite or equal to the
    /// raster's nodata sentinel.
    fn is_nodata(self, nodata: Option<Self>) -> bool {
        !self.is_finite() || nodata.map_or(false, |nd| self == nd)
    }
}

impl RasterElement for f32 {}
impl RasterElement for f64 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_is_nodata() {
        assert!(f64::NAN.is_nodata(None));
        assert!(f64::INFINITY.is_nodata(None));
        assert!(f32::NEG_INFINITY.is_nodata(Some(0.0)));
    }

    #[test]
    fn test_sentinel() {
        assert!((-9999.0_f64).is_nodata(Some(-9999.0)));
        assert!(!0.5_f64.is_nodata(Some(-9999.0)));
        assert!(!0.0_f32.is_nodata(None));
    }
}
