//! End-to-end UHI analysis
//!
//! Data flows strictly forward: provider bands → indices → samples →
//! classified samples → statistics. Every call builds its own scaler and
//! clustering model; nothing is shared between runs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uhi_core::{
    BBox, ClassifiedPoint, DateRange, Error, ImageryProvider, Result, SceneRequest,
};

use crate::classification::{classify_zones, KmeansParams};
use crate::sampling::{sample_points, SamplerParams};
use crate::statistics::{summarize, zone_summaries, Statistics, ZoneSummary};

pub const MIN_SAMPLE_COUNT: usize = 10;
pub const MAX_SAMPLE_COUNT: usize = 500;
pub const MAX_LOOKBACK_DAYS: u32 = 365;

/// Names of the methods applied, in pipeline order.
pub const ALGORITHMS: [&str; 4] = [
    "NDVI",
    "Land Surface Temperature (emissivity corrected)",
    "StandardScaler",
    "K-Means Clustering",
];

/// Caller-facing analysis parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Number of points to sample (default: 100, range 10..=500)
    pub sample_count: usize,
    /// Days before today searched for imagery (default: 30, range 1..=365)
    pub lookback_days: u32,
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            sample_count: 100,
            lookback_days: 30,
        }
    }
}

impl AnalysisRequest {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SAMPLE_COUNT..=MAX_SAMPLE_COUNT).contains(&self.sample_count) {
            return Err(Error::invalid_parameter(
                "sample_count",
                self.sample_count,
                format!("must be between {MIN_SAMPLE_COUNT} and {MAX_SAMPLE_COUNT}"),
            ));
        }
        if !(1..=MAX_LOOKBACK_DAYS).contains(&self.lookback_days) {
            return Err(Error::invalid_parameter(
                "lookback_days",
                self.lookback_days,
                format!("must be between 1 and {MAX_LOOKBACK_DAYS}"),
            ));
        }
        Ok(())
    }
}

/// Fixed settings of a deployment
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Analysis region (default: Bhubaneswar)
    pub region: BBox,
    /// Maximum scene cloud cover in percent (default: 20)
    pub max_cloud_cover: f64,
    pub kmeans: KmeansParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            region: BBox::bhubaneswar(),
            max_cloud_cover: 20.0,
            kmeans: KmeansParams::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        self.region.validate()?;
        if !(0.0..=100.0).contains(&self.max_cloud_cover) {
            return Err(Error::invalid_parameter(
                "max_cloud_cover",
                self.max_cloud_cover,
                "must be a percentage between 0 and 100",
            ));
        }
        self.kmeans.validate()
    }
}

/// Source of the current date and time
pub trait AnalysisClock {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl AnalysisClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl AnalysisClock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub data_source: String,
    pub algorithms: Vec<&'static str>,
    pub generated_at: DateTime<Utc>,
    pub scene_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<String>,
    pub date_range: DateRange,
    pub requested_points: usize,
    pub valid_points: usize,
    pub cluster_count: usize,
    pub seed: u64,
}

/// Full analysis output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UhiReport {
    /// Classified points in provider sample order
    pub points: Vec<ClassifiedPoint>,
    pub zones: Vec<ZoneSummary>,
    pub statistics: Statistics,
    pub metadata: ReportMetadata,
}

/// Run the whole analysis for one request.
///
/// Parameters are checked before the provider is contacted. Errors from
/// any stage are returned unchanged.
///
/// # Errors
/// * `InvalidParameter` for an out-of-range request or bad configuration
/// * `DataUnavailable` if the provider has no scene or no sampled point is
///   valid
/// * `InsufficientData` if fewer valid points than clusters remain
/// * `Computation` for clustering or reduction failures
pub fn analyze<P: ImageryProvider + ?Sized>(
    provider: &P,
    request: &AnalysisRequest,
    config: &PipelineConfig,
    clock: &dyn AnalysisClock,
) -> Result<UhiReport> {
    request.validate()?;
    config.validate()?;

    let date_range = DateRange::lookback(clock.today(), request.lookback_days);
    let scene_request = SceneRequest {
        region: config.region,
        date_range,
        max_points: request.sample_count,
        max_cloud_cover: config.max_cloud_cover,
    };

    info!(
        provider = provider.name(),
        region = %config.region,
        dates = %date_range,
        samples = request.sample_count,
        "starting UHI analysis"
    );

    let scene = provider.fetch_scene(&scene_request)?;
    debug!(
        scene = scene.id.as_deref().unwrap_or("-"),
        acquired = %scene.acquisition_date,
        bands = scene.samples.len(),
        "scene received"
    );

    let samples = sample_points(
        &scene.samples,
        &config.region,
        &SamplerParams {
            max_points: request.sample_count,
        },
    )?;

    let classification = classify_zones(&samples, &config.kmeans)?;
    let k = config.kmeans.k;
    let statistics = summarize(&classification.points, k)?;
    let zones = zone_summaries(&classification.points, k);

    info!(
        points = classification.points.len(),
        avg_lst = statistics.avg_lst,
        max_uhi = statistics.max_uhi_intensity,
        "UHI analysis complete"
    );

    let metadata = ReportMetadata {
        data_source: provider.name().to_string(),
        algorithms: ALGORITHMS.to_vec(),
        generated_at: clock.now(),
        scene_date: scene.acquisition_date,
        scene_id: scene.id,
        date_range,
        requested_points: request.sample_count,
        valid_points: samples.len(),
        cluster_count: k,
        seed: config.kmeans.seed,
    };

    Ok(UhiReport {
        points: classification.points,
        zones,
        statistics,
        metadata,
    })
}
