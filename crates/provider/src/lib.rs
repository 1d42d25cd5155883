//! # UHI Provider
//!
//! Upstream imagery sources implementing [`uhi_core::ImageryProvider`]:
//!
//! - [`CatalogProvider`]: picks the least cloudy scene from a JSON catalog
//! - [`RasterProvider`]: samples co-registered in-memory band rasters
//! - [`SyntheticProvider`]: seeded demo scene with an urban heat core

pub mod catalog;
pub mod raster;
pub mod synthetic;

pub use catalog::{Catalog, CatalogProvider, CatalogScene};
pub use raster::RasterProvider;
pub use synthetic::SyntheticProvider;
