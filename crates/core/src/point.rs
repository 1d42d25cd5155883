//! Point data model flowing through the analysis stages
//!
//! `BandSample` (provider) → `SamplePoint` (sampler) → `ClassifiedPoint`
//! (classifier). Each stage builds new values; nothing is mutated in place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lon: f64,
    pub lat: f64,
}

impl Location {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Calibrated band values observed at one location.
///
/// `nir` and `red` are surface reflectance (roughly 0..1), `thermal` is
/// at-sensor spectral radiance of the thermal band and must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSample {
    #[serde(flatten)]
    pub location: Location,
    pub nir: f64,
    pub red: f64,
    pub thermal: f64,
}

impl BandSample {
    pub fn new(location: Location, nir: f64, red: f64, thermal: f64) -> Self {
        Self {
            location,
            nir,
            red,
            thermal,
        }
    }
}

/// A sampled location with its vegetation index and surface temperature (°C).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    #[serde(flatten)]
    pub location: Location,
    pub lst: f64,
    pub ndvi: f64,
}

impl SamplePoint {
    pub fn new(location: Location, lst: f64, ndvi: f64) -> Self {
        Self {
            location,
            lst,
            ndvi,
        }
    }
}

/// Heat severity tier of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Moderate,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Critical => "Critical",
            Severity::Moderate => "Moderate",
            Severity::Low => "Low",
        };
        f.write_str(s)
    }
}

/// Land cover class inferred from NDVI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VegetationCategory {
    #[serde(rename = "Water/Built-up")]
    WaterBuiltUp,
    #[serde(rename = "Barren/Sparse")]
    BarrenSparse,
    #[serde(rename = "Moderate Vegetation")]
    Moderate,
    #[serde(rename = "Dense Vegetation")]
    Dense,
}

impl VegetationCategory {
    pub fn label(&self) -> &'static str {
        match self {
            VegetationCategory::WaterBuiltUp => "Water/Built-up",
            VegetationCategory::BarrenSparse => "Barren/Sparse",
            VegetationCategory::Moderate => "Moderate Vegetation",
            VegetationCategory::Dense => "Dense Vegetation",
        }
    }
}

impl fmt::Display for VegetationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A sample point after zone classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedPoint {
    #[serde(flatten)]
    pub location: Location,
    pub lst: f64,
    pub ndvi: f64,
    /// Severity rank, 0 = hottest cluster.
    pub zone: usize,
    /// Raw k-means label before ranking.
    pub cluster_id: usize,
    /// LST minus the mean LST of the classified batch.
    pub uhi_intensity: f64,
    pub severity: Severity,
    pub recommendation: &'static str,
    pub priority: u8,
    pub color: &'static str,
    pub vegetation_category: VegetationCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_sample_flattens_location() {
        let s = BandSample::new(Location::new(85.8, 20.3), 0.4, 0.1, 10.5);
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(json["lon"], 85.8);
        assert_eq!(json["lat"], 20.3);
        assert!(json.get("location").is_none());

        let back: BandSample = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&VegetationCategory::BarrenSparse).unwrap();
        assert_eq!(json, "\"Barren/Sparse\"");
    }

    #[test]
    fn test_labels() {
        assert_eq!(Severity::Critical.to_string(), "Critical");
        assert_eq!(VegetationCategory::WaterBuiltUp.to_string(), "Water/Built-up");
        assert_eq!(VegetationCategory::Dense.label(), "Dense Vegetation");
    }
}
