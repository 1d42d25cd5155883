//! Spatial point sampling of index fields
//!
//! - **sampler**: turns provider band samples into validated (NDVI, LST) points
//! - **raster_bands**: draws seeded band samples from co-registered band rasters

mod raster_bands;
mod sampler;

pub use raster_bands::RasterBands;
pub use sampler::{sample_point, sample_points, SamplerParams};
