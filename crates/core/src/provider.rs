//! Contract with the upstream imagery source
//!
//! A provider picks a single scene for the requested region and period and
//! hands back calibrated band values at up to `max_points` locations. How it
//! finds and reads that scene (remote catalog, local file, synthetic) is its
//! own business.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::point::BandSample;
use crate::region::{BBox, DateRange};

/// What the analysis asks a provider for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneRequest {
    pub region: BBox,
    pub date_range: DateRange,
    /// Upper bound on returned band samples.
    pub max_points: usize,
    /// Maximum acceptable scene cloud cover, in percent.
    pub max_cloud_cover: f64,
}

/// Band values from one acquired scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Provider-specific scene identifier, if any.
    #[serde(default)]
    pub id: Option<String>,
    pub acquisition_date: NaiveDate,
    pub samples: Vec<BandSample>,
}

/// Upstream source of multispectral/thermal band values.
///
/// Implementations return `Error::DataUnavailable` when no scene satisfies
/// the request; they never substitute default or fabricated data.
pub trait ImageryProvider {
    /// Human-readable data source name, reported in the analysis metadata.
    fn name(&self) -> &str;

    /// Select one scene and sample its bands inside `request.region`.
    fn fetch_scene(&self, request: &SceneRequest) -> Result<Scene>;
}

impl<P: ImageryProvider + ?Sized> ImageryProvider for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_scene(&self, request: &SceneRequest) -> Result<Scene> {
        (**self).fetch_scene(request)
    }
}

impl<P: ImageryProvider + ?Sized> ImageryProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_scene(&self, request: &SceneRequest) -> Result<Scene> {
        (**self).fetch_scene(request)
    }
}
