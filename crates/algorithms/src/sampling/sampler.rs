//! Point sampler
//!
//! Computes NDVI and LST for each band sample and keeps only points that lie
//! inside the analysis region and pass the physical plausibility filter.
//! Rejected points are dropped, not replaced, so the output can be shorter
//! than requested.

use tracing::{debug, warn};
use uhi_core::{BBox, BandSample, Error, Result, SamplePoint};

use crate::imagery::{is_plausible_lst, lst, ndvi};

/// Parameters for point sampling
#[derive(Debug, Clone)]
pub struct SamplerParams {
    /// Maximum number of points to emit (default: 100)
    pub max_points: usize,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self { max_points: 100 }
    }
}

/// Index values for one band sample, or `None` if the point is invalid.
///
/// Invalid means: outside `region`, NDVI non-finite or outside [-1, 1], or
/// LST non-finite or outside the plausible range.
pub fn sample_point(band: &BandSample, region: &BBox) -> Option<SamplePoint> {
    let loc = band.location;
    if !region.contains(loc.lon, loc.lat) {
        return None;
    }

    let v = ndvi(band.nir, band.red);
    if !v.is_finite() || !(-1.0..=1.0).contains(&v) {
        return None;
    }

    let t = lst(band.thermal, v);
    if !t.is_finite() || !is_plausible_lst(t) {
        return None;
    }

    Some(SamplePoint::new(loc, t, v))
}

/// Convert provider band samples into validated sample points.
///
/// Input order is preserved. At most `params.max_points` points are
/// returned.
///
/// # Errors
/// * `InvalidParameter` if `max_points` is zero
/// * `DataUnavailable` if no point survives filtering
pub fn sample_points(
    bands: &[BandSample],
    region: &BBox,
    params: &SamplerParams,
) -> Result<Vec<SamplePoint>> {
    if params.max_points == 0 {
        return Err(Error::invalid_parameter(
            "max_points",
            params.max_points,
            "must be at least 1",
        ));
    }

    let mut points: Vec<SamplePoint> = bands
        .iter()
        .filter_map(|b| sample_point(b, region))
        .collect();

    let rejected = bands.len() - points.len();
    if rejected > 0 {
        warn!(rejected, valid = points.len(), "dropped implausible or out-of-region points");
    }
    points.truncate(params.max_points);
    debug!(input = bands.len(), kept = points.len(), "sampled index points");

    if points.is_empty() {
        return Err(Error::DataUnavailable(format!(
            "none of {} sampled points had valid NDVI/LST values inside the region",
            bands.len()
        )));
    }

    Ok(points)
}
