//! Zone classification
//!
//! - **StandardScaler**: per-feature zero-mean, unit-variance scaling
//! - **K-means**: seeded k-means++ clustering with multiple initializations
//! - **Zones**: temperature-ranked clusters with a fixed severity policy

mod kmeans;
mod scaler;
mod zones;

pub use kmeans::{kmeans, KmeansParams, KmeansResult};
pub use scaler::StandardScaler;
pub use zones::{
    classify_zones, vegetation_category, zone_tier, ZoneCenter, ZoneClassification, ZoneTier,
    ZONE_POLICY,
};
