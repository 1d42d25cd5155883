//! Co-registered NIR / red / thermal band rasters
//!
//! Draws seeded uniform locations inside the analysis region and reads the
//! three bands at each one, yielding the `(location, nir, red, thermal)`
//! tuples the point sampler consumes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use uhi_core::raster::Raster;
use uhi_core::{BBox, BandSample, Error, Location, Result};

use crate::imagery::{lst_raster, ndvi_raster};

/// Three band rasters sharing one grid.
#[derive(Debug, Clone)]
pub struct RasterBands {
    nir: Raster<f64>,
    red: Raster<f64>,
    thermal: Raster<f64>,
}

impl RasterBands {
    /// Bundle the bands. All three must have the same shape; the NIR
    /// band's georeferencing is taken as the common grid.
    pub fn new(nir: Raster<f64>, red: Raster<f64>, thermal: Raster<f64>) -> Result<Self> {
        nir.check_same_shape(&red)?;
        nir.check_same_shape(&thermal)?;
        if nir.is_empty() {
            return Err(Error::InvalidDimensions {
                width: nir.cols(),
                height: nir.rows(),
            });
        }
        Ok(Self { nir, red, thermal })
    }

    pub fn nir(&self) -> &Raster<f64> {
        &self.nir
    }

    pub fn red(&self) -> &Raster<f64> {
        &self.red
    }

    pub fn thermal(&self) -> &Raster<f64> {
        &self.thermal
    }

    /// Geographic extent of the common grid
    pub fn extent(&self) -> BBox {
        self.nir.bounds()
    }

    /// Band values at the cell containing (lon, lat), if all three are valid.
    pub fn band_sample_at(&self, lon: f64, lat: f64) -> Option<BandSample> {
        let (row, col) = self.nir.cell_at(lon, lat)?;
        let read = |r: &Raster<f64>| -> Option<f64> {
            let v = r.get(row, col).ok()?;
            (!r.is_nodata(v)).then_some(v)
        };
        Some(BandSample::new(
            Location::new(lon, lat),
            read(&self.nir)?,
            read(&self.red)?,
            read(&self.thermal)?,
        ))
    }

    /// Draw `n` uniform random locations in the part of `region` covered by
    /// the rasters and read the bands there.
    ///
    /// Locations landing on nodata are skipped, so fewer than `n` samples may
    /// come back. The same `seed` always yields the same locations.
    ///
    /// # Errors
    /// `DataUnavailable` if `region` does not overlap the raster extent.
    pub fn band_samples(&self, region: &BBox, n: usize, seed: u64) -> Result<Vec<BandSample>> {
        let area = region.intersection(&self.extent()).ok_or_else(|| {
            Error::DataUnavailable(format!(
                "region {} does not overlap raster extent {}",
                region,
                self.extent()
            ))
        })?;

        let mut rng = StdRng::seed_from_u64(seed);
        let samples: Vec<BandSample> = (0..n)
            .filter_map(|_| {
                let lon = rng.gen_range(area.min_lon..=area.max_lon);
                let lat = rng.gen_range(area.min_lat..=area.max_lat);
                self.band_sample_at(lon, lat)
            })
            .collect();

        debug!(requested = n, read = samples.len(), "read raster band samples");
        Ok(samples)
    }

    /// Continuous NDVI and LST fields over the whole grid.
    pub fn index_fields(&self) -> Result<(Raster<f64>, Raster<f64>)> {
        let ndvi = ndvi_raster(&self.nir, &self.red)?;
        let lst = lst_raster(&self.thermal, &ndvi)?;
        Ok((ndvi, lst))
    }
}
