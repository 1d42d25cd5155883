//! Heat-severity zones
//!
//! Clusters (LST, NDVI) samples, ranks the clusters by mean temperature and
//! attaches the fixed mitigation policy of each rank.

use ndarray::Array2;
use serde::Serialize;
use tracing::debug;
use uhi_core::{ClassifiedPoint, Error, Result, SamplePoint, Severity, VegetationCategory};

use super::kmeans::{kmeans, KmeansParams};
use super::scaler::StandardScaler;

/// Severity metadata shared by every point of one zone rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneTier {
    pub severity: Severity,
    pub priority: u8,
    pub color: &'static str,
    pub recommendation: &'static str,
}

/// Policy by zone rank. Ranks past the end use the last tier.
pub const ZONE_POLICY: [ZoneTier; 3] = [
    ZoneTier {
        severity: Severity::Critical,
        priority: 1,
        color: "#ef4444",
        recommendation: "Urgent intervention: expand tree canopy, install green roofs \
                         and apply cool pavements to cut surface heat",
    },
    ZoneTier {
        severity: Severity::Moderate,
        priority: 2,
        color: "#f97316",
        recommendation: "Add parks and water bodies, and use reflective roofing and \
                         surfaces to moderate heat",
    },
    ZoneTier {
        severity: Severity::Low,
        priority: 3,
        color: "#22c55e",
        recommendation: "Preserve existing green cover and keep monitoring surface \
                         temperatures",
    },
];

/// Tier for a zone rank (0 = hottest).
pub fn zone_tier(zone: usize) -> &'static ZoneTier {
    &ZONE_POLICY[zone.min(ZONE_POLICY.len() - 1)]
}

/// Land cover class from NDVI; each bracket excludes its upper bound.
pub fn vegetation_category(ndvi: f64) -> VegetationCategory {
    if ndvi < 0.0 {
        VegetationCategory::WaterBuiltUp
    } else if ndvi < 0.2 {
        VegetationCategory::BarrenSparse
    } else if ndvi < 0.5 {
        VegetationCategory::Moderate
    } else {
        VegetationCategory::Dense
    }
}

/// Center of one ranked cluster, in original units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneCenter {
    pub zone: usize,
    pub cluster_id: usize,
    pub lst: f64,
    pub ndvi: f64,
}

#[derive(Debug, Clone)]
pub struct ZoneClassification {
    /// Classified points in input order
    pub points: Vec<ClassifiedPoint>,
    /// Cluster centers ordered by zone rank
    pub centers: Vec<ZoneCenter>,
    /// Mean LST of the batch, the reference for `uhi_intensity`
    pub mean_lst: f64,
    /// Within-cluster sum of squares in standardized units
    pub inertia: f64,
}

/// Classify sample points into `params.k` ranked heat zones.
///
/// Features are standardized per call, clustered with [`kmeans`], and the
/// clusters ranked by descending center LST so zone 0 is the hottest.
///
/// # Errors
/// * `InvalidParameter` for invalid `params`
/// * `InsufficientData` if there are fewer samples than clusters
/// * `Computation` if clustering fails on degenerate data
pub fn classify_zones(samples: &[SamplePoint], params: &KmeansParams) -> Result<ZoneClassification> {
    params.validate()?;
    if samples.len() < params.k {
        return Err(Error::InsufficientData {
            available: samples.len(),
            required: params.k,
        });
    }

    let mut features = Array2::<f64>::zeros((samples.len(), 2));
    for (mut row, s) in features.outer_iter_mut().zip(samples) {
        row[0] = s.lst;
        row[1] = s.ndvi;
    }

    let (scaler, scaled) = StandardScaler::fit_transform(features.view())?;
    let clusters = kmeans(scaled.view(), params)?;
    let centers = scaler.inverse_transform(clusters.centroids.view());

    // Hottest first; equal temperatures keep label order
    let mut ranked: Vec<usize> = (0..params.k).collect();
    ranked.sort_by(|&a, &b| centers[[b, 0]].total_cmp(&centers[[a, 0]]));

    let mut zone_of = vec![0usize; params.k];
    for (zone, &cluster) in ranked.iter().enumerate() {
        zone_of[cluster] = zone;
    }

    let mean_lst = samples.iter().map(|s| s.lst).sum::<f64>() / samples.len() as f64;

    let points = samples
        .iter()
        .zip(&clusters.labels)
        .map(|(s, &cluster_id)| {
            let zone = zone_of[cluster_id];
            let tier = zone_tier(zone);
            ClassifiedPoint {
                location: s.location,
                lst: s.lst,
                ndvi: s.ndvi,
                zone,
                cluster_id,
                uhi_intensity: s.lst - mean_lst,
                severity: tier.severity,
                recommendation: tier.recommendation,
                priority: tier.priority,
                color: tier.color,
                vegetation_category: vegetation_category(s.ndvi),
            }
        })
        .collect();

    let centers = ranked
        .iter()
        .enumerate()
        .map(|(zone, &cluster)| ZoneCenter {
            zone,
            cluster_id: cluster,
            lst: centers[[cluster, 0]],
            ndvi: centers[[cluster, 1]],
        })
        .collect();

    debug!(
        points = samples.len(),
        k = params.k,
        inertia = clusters.inertia,
        iterations = clusters.iterations,
        "classified heat zones"
    );

    Ok(ZoneClassification {
        points,
        centers,
        mean_lst,
        inertia: clusters.inertia,
    })
}
