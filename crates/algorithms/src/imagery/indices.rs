//! Normalized Difference Vegetation Index
//!
//! Scalar form for sampled band values and a raster form for whole scenes.

use crate::maybe_rayon::*;
use uhi_core::raster::Raster;
use uhi_core::Result;

/// Damping term keeping the NDVI denominator away from zero.
pub const NDVI_EPSILON: f64 = 1e-10;

/// Normalized Difference Vegetation Index
///
/// `NDVI = (NIR - Red) / (NIR + Red + ε)`, ε = 1e-10
///
/// Values range from -1 to 1:
/// - Dense vegetation: 0.5 to 0.9
/// - Sparse vegetation: 0.2 to 0.5
/// - Bare soil / built-up: 0.0 to 0.2
/// - Water: below 0
///
/// A zero denominator is damped by ε rather than special-cased, so
/// `ndvi(0.0, 0.0) == 0.0`.
#[inline]
pub fn ndvi(nir: f64, red: f64) -> f64 {
    (nir - red) / (nir + red + NDVI_EPSILON)
}

/// NDVI over whole band rasters.
///
/// Cells where either band is nodata (or non-finite) become NaN.
///
/// # Arguments
/// * `nir` - Near-infrared reflectance band
/// * `red` - Red reflectance band
pub fn ndvi_raster(nir: &Raster<f64>, red: &Raster<f64>) -> Result<Raster<f64>> {
    nir.check_same_shape(red)?;

    let (rows, cols) = nir.shape();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for col in 0..cols {
                let n = unsafe { nir.get_unchecked(row, col) };
                let r = unsafe { red.get_unchecked(row, col) };

                if nir.is_nodata(n) || red.is_nodata(r) {
                    continue;
                }

                row_data[col] = ndvi(n, r);
            }
            row_data
        })
        .collect();

    nir.derive(data)
}
