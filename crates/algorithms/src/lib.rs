//! # UHI Algorithms
//!
//! Urban heat island analysis over multispectral/thermal imagery.
//!
//! ## Modules
//!
//! - **imagery**: NDVI, brightness temperature, emissivity, LST
//! - **sampling**: validated (location, NDVI, LST) sample points
//! - **classification**: feature scaling, K-means, ranked heat zones
//! - **statistics**: batch and per-zone summaries
//! - **pipeline**: the end-to-end analysis driven by an imagery provider

pub mod classification;
pub mod imagery;
pub mod pipeline;
pub mod sampling;
pub mod statistics;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classification::{
        classify_zones, kmeans, vegetation_category, zone_tier, KmeansParams, KmeansResult,
        StandardScaler, ZoneClassification, ZoneTier,
    };
    pub use crate::imagery::{
        brightness_temperature, emissivity, is_plausible_lst, lst, lst_raster, ndvi, ndvi_raster,
    };
    pub use crate::pipeline::{
        analyze, AnalysisClock, AnalysisRequest, FixedClock, PipelineConfig, SystemClock,
        UhiReport,
    };
    pub use crate::sampling::{sample_points, RasterBands, SamplerParams};
    pub use crate::statistics::{summarize, zone_summaries, Statistics, ZoneSummary};
    pub use uhi_core::prelude::*;
}
