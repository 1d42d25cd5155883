//! Land Surface Temperature from thermal radiance
//!
//! Single-channel retrieval for Landsat 8 TIRS band 10:
//!
//! 1. Brightness temperature by inverting Planck's law with the sensor
//!    calibration constants K1/K2.
//! 2. Surface emissivity from NDVI via fractional vegetation cover
//!    (NDVI threshold method).
//! 3. Emissivity-corrected LST:
//!    `LST = BT / (1 + (λ·BT / c2) · ln ε)`
//!
//! Temperatures are returned in degrees Celsius.

use crate::maybe_rayon::*;
use uhi_core::raster::Raster;
use uhi_core::Result;

/// TIRS band 10 thermal conversion constant K1 (W/(m²·sr·μm)).
pub const K1: f64 = 774.8853;
/// TIRS band 10 thermal conversion constant K2 (K).
pub const K2: f64 = 1321.0789;
pub const KELVIN_OFFSET: f64 = 273.15;

/// NDVI of bare soil; fractional cover is 0 at or below this.
pub const NDVI_SOIL: f64 = 0.2;
/// NDVI of full vegetation; fractional cover is 1 at or above this.
pub const NDVI_VEGETATION: f64 = 0.5;
pub const EMISSIVITY_SOIL: f64 = 0.973;
pub const EMISSIVITY_VEGETATION: f64 = 0.987;

/// Effective wavelength of the emitted radiance (m).
pub const WAVELENGTH: f64 = 10.9e-6;
/// h·c/σ (m·K).
pub const C2: f64 = 1.438e-2;

/// Plausible surface temperature range (°C, exclusive).
pub const LST_MIN: f64 = -50.0;
pub const LST_MAX: f64 = 70.0;

/// At-sensor brightness temperature in °C.
///
/// `BT = K2 / ln(K1 / L + 1) - 273.15`
///
/// Returns NaN when `thermal` is not a positive finite radiance; callers
/// filter non-finite results rather than treating them as errors.
pub fn brightness_temperature(thermal: f64) -> f64 {
    if !(thermal > 0.0 && thermal.is_finite()) {
        return f64::NAN;
    }
    let arg = K1 / thermal + 1.0;
    if arg <= 0.0 {
        return f64::NAN;
    }
    K2 / arg.ln() - KELVIN_OFFSET
}

/// Fractional vegetation cover, linear between the soil and vegetation
/// NDVI thresholds and clamped to [0, 1].
pub fn fractional_vegetation_cover(ndvi: f64) -> f64 {
    ((ndvi - NDVI_SOIL) / (NDVI_VEGETATION - NDVI_SOIL)).clamp(0.0, 1.0)
}

/// Surface emissivity from NDVI.
///
/// Blends soil and vegetation emissivity weighted by the squared fractional
/// cover, so the result is continuous and stays in
/// [`EMISSIVITY_SOIL`, `EMISSIVITY_VEGETATION`].
pub fn emissivity(ndvi: f64) -> f64 {
    let pv = fractional_vegetation_cover(ndvi);
    EMISSIVITY_SOIL + (EMISSIVITY_VEGETATION - EMISSIVITY_SOIL) * pv * pv
}

/// [`emissivity`] applied element-wise over a batch of NDVI values.
pub fn emissivity_batch(ndvi: &[f64]) -> Vec<f64> {
    ndvi.par_iter().map(|&v| emissivity(v)).collect()
}

/// Emissivity-corrected land surface temperature in °C.
///
/// Non-finite for invalid thermal input (see [`brightness_temperature`]).
pub fn lst(thermal: f64, ndvi: f64) -> f64 {
    let bt = brightness_temperature(thermal);
    bt / (1.0 + (WAVELENGTH * bt / C2) * emissivity(ndvi).ln())
}

/// Whether an LST value is physically plausible for a land surface.
#[inline]
pub fn is_plausible_lst(lst: f64) -> bool {
    lst > LST_MIN && lst < LST_MAX
}

/// Brightness temperature over a thermal radiance raster.
pub fn brightness_temperature_raster(thermal: &Raster<f64>) -> Result<Raster<f64>> {
    let (rows, cols) = thermal.shape();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for col in 0..cols {
                let t = unsafe { thermal.get_unchecked(row, col) };
                if thermal.is_nodata(t) {
                    continue;
                }
                row_data[col] = brightness_temperature(t);
            }
            row_data
        })
        .collect();

    thermal.derive(data)
}

/// Land surface temperature field from a thermal radiance raster and an
/// NDVI field of the same shape.
///
/// Cells with nodata input, invalid radiance, or implausible temperature
/// are NaN in the output.
pub fn lst_raster(thermal: &Raster<f64>, ndvi: &Raster<f64>) -> Result<Raster<f64>> {
    thermal.check_same_shape(ndvi)?;

    let (rows, cols) = thermal.shape();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for col in 0..cols {
                let t = unsafe { thermal.get_unchecked(row, col) };
                let v = unsafe { ndvi.get_unchecked(row, col) };
                if thermal.is_nodata(t) || ndvi.is_nodata(v) {
                    continue;
                }
                let value = lst(t, v);
                if value.is_finite() && is_plausible_lst(value) {
                    row_data[col] = value;
                }
            }
            row_data
        })
        .collect();

    thermal.derive(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use uhi_core::GeoTransform;

    /// Radiance that yields the given brightness temperature (°C).
    fn radiance_for_bt(bt_c: f64) -> f64 {
        K1 / ((K2 / (bt_c + KELVIN_OFFSET)).exp() - 1.0)
    }

    #[test]
    fn test_brightness_temperature_formula() {
        let t = 10.5;
        let expected = K2 / (K1 / t + 1.0).ln() - 273.15;
        assert_eq!(brightness_temperature(t), expected);
    }

    #[test]
    fn test_brightness_temperature_inverts_planck() {
        let l = radiance_for_bt(35.0);
        assert_relative_eq!(brightness_temperature(l), 35.0, epsilon = 1e-9);
    }

    #[test]
    fn test_brightness_temperature_invalid_input() {
        assert!(brightness_temperature(0.0).is_nan());
        assert!(brightness_temperature(-3.0).is_nan());
        assert!(brightness_temperature(f64::NAN).is_nan());
    }

    #[test]
    fn test_emissivity_endpoints() {
        assert_eq!(emissivity(-0.4), EMISSIVITY_SOIL);
        assert_eq!(emissivity(0.2), EMISSIVITY_SOIL);
        assert_relative_eq!(emissivity(0.5), EMISSIVITY_VEGETATION, epsilon = 1e-15);
        assert_relative_eq!(emissivity(0.9), EMISSIVITY_VEGETATION, epsilon = 1e-15);
    }

    #[test]
    fn test_emissivity_squared_cover_weighting() {
        // NDVI 0.35 is halfway: Pv = 0.5, weight = 0.25
        let expected = 0.973 * 0.75 + 0.987 * 0.25;
        assert!(emissivity(0.35) > EMISSIVITY_SOIL);
        assert_relative_eq!(emissivity(0.35), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_emissivity_continuous_at_thresholds() {
        for &x in &[NDVI_SOIL, NDVI_VEGETATION] {
            let below = emissivity(x - 1e-9);
            let above = emissivity(x + 1e-9);
            assert!((above - below).abs() < 1e-9, "jump at {}", x);
        }
    }

    #[test]
    fn test_emissivity_batch_matches_scalar() {
        let ndvi: Vec<f64> = (-10..=10).map(|i| i as f64 / 10.0).collect();
        let batch = emissivity_batch(&ndvi);
        assert_eq!(batch.len(), ndvi.len());
        for (v, e) in ndvi.iter().zip(&batch) {
            assert_eq!(*e, emissivity(*v));
        }
    }

    #[test]
    fn test_lst_formula() {
        let t = radiance_for_bt(36.0);
        let v = 0.3;
        let bt = brightness_temperature(t);
        let expected = bt / (1.0 + (10.9e-6 * bt / 1.438e-2) * emissivity(v).ln());
        assert_eq!(lst(t, v), expected);
        // Emissivity below one raises LST slightly above BT
        assert!(lst(t, v) > bt);
        assert!(lst(t, v) - bt < 0.1);
    }

    #[test]
    fn test_lst_invalid_thermal() {
        assert!(!lst(0.0, 0.3).is_finite());
    }

    #[test]
    fn test_plausibility_bounds_exclusive() {
        assert!(is_plausible_lst(35.0));
        assert!(!is_plausible_lst(-50.0));
        assert!(!is_plausible_lst(70.0));
        assert!(!is_plausible_lst(f64::NAN));
    }

    #[test]
    fn test_lst_raster() {
        let mut thermal = Raster::filled(4, 4, radiance_for_bt(30.0));
        thermal.set_transform(GeoTransform::new(0.0, 4.0, 1.0, -1.0));
        thermal.set(0, 0, 0.0).unwrap();
        let ndvi = Raster::filled(4, 4, 0.6);

        let result = lst_raster(&thermal, &ndvi).unwrap();
        assert!(result.get(0, 0).unwrap().is_nan());
        assert_relative_eq!(
            result.get(2, 3).unwrap(),
            lst(radiance_for_bt(30.0), 0.6),
            epsilon = 1e-12
        );

        let bt = brightness_temperature_raster(&thermal).unwrap();
        assert_relative_eq!(bt.get(1, 1).unwrap(), 30.0, epsilon = 1e-9);
    }

    proptest! {
        #[test]
        fn brightness_temperature_monotonic(t in 0.5f64..30.0, dt in 1e-3f64..5.0) {
            let a = brightness_temperature(t);
            let b = brightness_temperature(t + dt);
            prop_assert!(a.is_finite() && b.is_finite());
            prop_assert!(b > a);
        }

        #[test]
        fn emissivity_in_range(v in -1.0f64..=1.0) {
            let e = emissivity(v);
            prop_assert!((EMISSIVITY_SOIL..=EMISSIVITY_VEGETATION + 1e-15).contains(&e));
        }
    }
}
