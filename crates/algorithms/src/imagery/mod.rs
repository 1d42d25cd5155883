//! Band-algebra index computation
//!
//! - NDVI from near-infrared and red reflectance
//! - Brightness temperature, emissivity and emissivity-corrected LST from
//!   thermal radiance
//!
//! Every function has a scalar form (for sampled band values) and a raster
//! form (for whole scenes).

mod indices;
mod thermal;

pub use indices::{ndvi, ndvi_raster, NDVI_EPSILON};
pub use thermal::{
    brightness_temperature, brightness_temperature_raster, emissivity, emissivity_batch,
    fractional_vegetation_cover, is_plausible_lst, lst, lst_raster, C2, EMISSIVITY_SOIL,
    EMISSIVITY_VEGETATION, K1, K2, KELVIN_OFFSET, LST_MAX, LST_MIN, NDVI_SOIL, NDVI_VEGETATION,
    WAVELENGTH,
};
