//! Per-feature standardization
//!
//! Fit parameters live only in the returned value; nothing is cached
//! between calls.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use uhi_core::{Error, Result};

/// Zero-mean, unit-variance scaling fitted on one feature matrix
/// (rows = observations, columns = features).
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Fit mean and population standard deviation of each column.
    ///
    /// Constant columns get their value as mean and a scale of 1, so they
    /// map to exact zeros instead of dividing by zero.
    pub fn fit(data: ArrayView2<'_, f64>) -> Result<Self> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(Error::Computation(
                "cannot fit scaler on an empty feature matrix".into(),
            ));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(Error::Computation(
                "feature matrix contains non-finite values".into(),
            ));
        }

        let mut mean = data
            .mean_axis(Axis(0))
            .ok_or_else(|| Error::Computation("feature mean undefined".into()))?;
        let mut scale = data
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > f64::EPSILON { s } else { 1.0 });

        // The rounded mean of a constant column can differ from its value
        for (j, col) in data.axis_iter(Axis(1)).enumerate() {
            let first = col[0];
            if col.iter().all(|&v| v == first) {
                mean[j] = first;
                scale[j] = 1.0;
            }
        }

        Ok(Self { mean, scale })
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }

    pub fn transform(&self, data: ArrayView2<'_, f64>) -> Array2<f64> {
        (&data - &self.mean) / &self.scale
    }

    pub fn inverse_transform(&self, data: ArrayView2<'_, f64>) -> Array2<f64> {
        &data * &self.scale + &self.mean
    }

    /// Fit on `data` and return the scaler together with the scaled matrix.
    pub fn fit_transform(data: ArrayView2<'_, f64>) -> Result<(Self, Array2<f64>)> {
        let scaler = Self::fit(data)?;
        let scaled = scaler.transform(data);
        Ok((scaler, scaled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_zero_mean_unit_variance() {
        let x = array![[30.0, 0.1], [40.0, 0.3], [50.0, 0.5], [60.0, 0.7]];
        let (_, z) = StandardScaler::fit_transform(x.view()).unwrap();

        for col in 0..2 {
            let c = z.column(col);
            assert_relative_eq!(c.mean().unwrap(), 0.0, epsilon = 1e-12);
            assert_relative_eq!(c.std(0.0), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_inverse_roundtrip() {
        let x = array![[45.0, 0.05], [25.0, 0.35], [9.0, 0.7]];
        let (scaler, z) = StandardScaler::fit_transform(x.view()).unwrap();
        let back = scaler.inverse_transform(z.view());
        for (a, b) in x.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_constant_column() {
        let x = array![[30.0, 0.4], [31.0, 0.4], [32.0, 0.4]];
        let (scaler, z) = StandardScaler::fit_transform(x.view()).unwrap();
        assert_eq!(scaler.scale()[1], 1.0);
        assert_eq!(scaler.mean()[1], 0.4);
        assert!(z.column(1).iter().all(|&v| v == 0.0));

        let back = scaler.inverse_transform(z.view());
        assert!(back.column(1).iter().all(|&v| v == 0.4));
    }

    #[test]
    fn test_repeating_decimal_constant_column() {
        let x = array![[0.1, 0.7], [0.2, 0.7], [0.3, 0.7], [0.4, 0.7], [0.5, 0.7], [0.6, 0.7]];
        let (_, z) = StandardScaler::fit_transform(x.view()).unwrap();
        assert!(z.column(1).iter().all(|&v| v == 0.0));
        assert_relative_eq!(z.column(0).mean().unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_non_finite() {
        let x = array![[30.0, f64::NAN], [31.0, 0.4]];
        assert!(StandardScaler::fit(x.view()).is_err());
    }
}
