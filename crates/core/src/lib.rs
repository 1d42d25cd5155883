//! # UHI Core
//!
//! Core types, errors and raster grid for urban heat island analysis.
//!
//! This crate provides:
//! - `Error` / `ErrorKind`: the failure taxonomy shared by every stage
//! - `Raster<T>` and `GeoTransform`: georeferenced band grids
//! - `BBox` and `DateRange`: the region and period an analysis covers
//! - The point data model (`BandSample`, `SamplePoint`, `ClassifiedPoint`)
//! - `ImageryProvider`: the contract with the upstream imagery source

pub mod error;
pub mod point;
pub mod provider;
pub mod raster;
pub mod region;

pub use error::{Error, ErrorKind, Result};
pub use point::{BandSample, ClassifiedPoint, Location, SamplePoint, Severity, VegetationCategory};
pub use provider::{ImageryProvider, Scene, SceneRequest};
pub use raster::{GeoTransform, Raster, RasterElement};
pub use region::{BBox, DateRange};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::point::{
        BandSample, ClassifiedPoint, Location, SamplePoint, Severity, VegetationCategory,
    };
    pub use crate::provider::{ImageryProvider, Scene, SceneRequest};
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::region::{BBox, DateRange};
}
