//! Batch summary statistics
//!
//! Temperatures and UHI intensities are rounded to 2 decimals, NDVI to 3.

use std::collections::BTreeMap;

use serde::Serialize;
use uhi_core::{ClassifiedPoint, Error, Result};

/// Summary of a classified batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_points: usize,
    /// Points per zone rank; every rank below the zone count is present
    pub zone_counts: BTreeMap<usize, usize>,
    pub avg_lst: f64,
    pub min_lst: f64,
    pub max_lst: f64,
    /// Population standard deviation
    pub std_lst: f64,
    pub avg_ndvi: f64,
    pub min_ndvi: f64,
    pub max_ndvi: f64,
    pub max_uhi_intensity: f64,
    pub avg_uhi_intensity: f64,
}

/// Round half away from zero to `decimals` places.
///
/// Values that round to zero come back as `+0.0`, never `-0.0`.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor + 0.0
}

/// Reduce classified points into [`Statistics`].
///
/// `zone_count` is the configured number of zones, so ranks with no
/// points still show up with a count of zero.
///
/// # Errors
/// `Computation` if `points` is empty.
pub fn summarize(points: &[ClassifiedPoint], zone_count: usize) -> Result<Statistics> {
    if points.is_empty() {
        return Err(Error::Computation(
            "cannot summarize an empty set of classified points".into(),
        ));
    }

    let n = points.len() as f64;

    let mut zone_counts: BTreeMap<usize, usize> = (0..zone_count).map(|z| (z, 0)).collect();
    for p in points {
        *zone_counts.entry(p.zone).or_insert(0) += 1;
    }

    let lst = Moments::of(points.iter().map(|p| p.lst));
    let ndvi = Moments::of(points.iter().map(|p| p.ndvi));
    let uhi = Moments::of(points.iter().map(|p| p.uhi_intensity));

    let variance = points
        .iter()
        .map(|p| (p.lst - lst.mean(n)).powi(2))
        .sum::<f64>()
        / n;

    Ok(Statistics {
        total_points: points.len(),
        zone_counts,
        avg_lst: round_to(lst.mean(n), 2),
        min_lst: round_to(lst.min, 2),
        max_lst: round_to(lst.max, 2),
        std_lst: round_to(variance.sqrt(), 2),
        avg_ndvi: round_to(ndvi.mean(n), 3),
        min_ndvi: round_to(ndvi.min, 3),
        max_ndvi: round_to(ndvi.max, 3),
        max_uhi_intensity: round_to(uhi.max, 2),
        avg_uhi_intensity: round_to(uhi.mean(n), 2),
    })
}

/// Running sum/min/max of one attribute
pub(crate) struct Moments {
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl Moments {
    pub fn of(values: impl Iterator<Item = f64>) -> Self {
        values.fold(
            Moments {
                sum: 0.0,
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |m, v| Moments {
                sum: m.sum + v,
                min: m.min.min(v),
                max: m.max.max(v),
            },
        )
    }

    pub fn mean(&self, n: f64) -> f64 {
        self.sum / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::{vegetation_category, zone_tier};
    use approx::assert_relative_eq;
    use uhi_core::Location;

    fn point(zone: usize, lst: f64, ndvi: f64, uhi: f64) -> ClassifiedPoint {
        let tier = zone_tier(zone);
        ClassifiedPoint {
            location: Location::new(85.8, 20.3),
            lst,
            ndvi,
            zone,
            cluster_id: zone,
            uhi_intensity: uhi,
            severity: tier.severity,
            recommendation: tier.recommendation,
            priority: tier.priority,
            color: tier.color,
            vegetation_category: vegetation_category(ndvi),
        }
    }

    #[test]
    fn test_avg_lst_rounding() {
        let points = vec![
            point(0, 30.123, 0.1, 0.0),
            point(1, 40.456, 0.2, 0.0),
            point(2, 50.789, 0.3, 0.0),
        ];
        let stats = summarize(&points, 3).unwrap();
        assert_eq!(stats.avg_lst, 40.46);
        assert_eq!(stats.min_lst, 30.12);
        assert_eq!(stats.max_lst, 50.79);
    }

    #[test]
    fn test_population_std_and_ndvi() {
        let points = vec![
            point(0, 40.0, 0.1234, 5.0),
            point(1, 30.0, 0.2345, -5.0),
            point(1, 30.0, 0.6789, -5.0),
            point(2, 40.0, 0.4, 5.0),
        ];
        let stats = summarize(&points, 3).unwrap();
        assert_eq!(stats.std_lst, 5.0);
        assert_eq!(stats.min_ndvi, 0.123);
        assert_eq!(stats.max_ndvi, 0.679);
        assert_eq!(stats.avg_ndvi, 0.359);
        assert_eq!(stats.max_uhi_intensity, 5.0);
        assert_eq!(stats.avg_uhi_intensity, 0.0);
    }

    #[test]
    fn test_zone_counts_include_empty_zones() {
        let points = vec![point(0, 40.0, 0.1, 1.0), point(0, 41.0, 0.1, 2.0)];
        let stats = summarize(&points, 3).unwrap();
        assert_eq!(stats.total_points, 2);
        assert_eq!(stats.zone_counts.get(&0), Some(&2));
        assert_eq!(stats.zone_counts.get(&1), Some(&0));
        assert_eq!(stats.zone_counts.get(&2), Some(&0));
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(summarize(&[], 3).is_err());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(40.456, 2), 40.46);
        assert_eq!(round_to(-1.2346, 3), -1.235);
        assert_relative_eq!(round_to(0.1 + 0.2, 1), 0.3);
    }

    #[test]
    fn test_round_to_never_negative_zero() {
        assert!(round_to(-1e-15, 2).is_sign_positive());
        assert!(round_to(-0.004, 2).is_sign_positive());
        assert!(round_to(-0.0, 3).is_sign_positive());

        let points = vec![point(0, 40.0, 0.1, -2e-15), point(1, 30.0, 0.2, -1e-15)];
        let stats = summarize(&points, 2).unwrap();
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"avg_uhi_intensity\":0.0"), "{json}");
        assert!(!json.contains("-0.0"), "{json}");
    }

    #[test]
    fn test_serializes_zone_counts_as_object() {
        let stats = summarize(&[point(1, 35.0, 0.3, 0.0)], 2).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["zone_counts"]["0"], 0);
        assert_eq!(json["zone_counts"]["1"], 1);
    }
}
