//! In-memory band raster provider
//!
//! Wraps one scene's NIR/red/thermal rasters and samples them at seeded
//! random locations inside the requested region.

use chrono::NaiveDate;
use tracing::debug;
use uhi_algorithms::sampling::RasterBands;
use uhi_core::{Error, ImageryProvider, Result, Scene, SceneRequest};

#[derive(Debug, Clone)]
pub struct RasterProvider {
    bands: RasterBands,
    acquisition_date: NaiveDate,
    id: Option<String>,
    seed: u64,
}

impl RasterProvider {
    pub fn new(bands: RasterBands, acquisition_date: NaiveDate, seed: u64) -> Self {
        Self {
            bands,
            acquisition_date,
            id: None,
            seed,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn bands(&self) -> &RasterBands {
        &self.bands
    }
}

impl ImageryProvider for RasterProvider {
    fn name(&self) -> &str {
        "Band rasters"
    }

    fn fetch_scene(&self, request: &SceneRequest) -> Result<Scene> {
        if !request.date_range.contains(self.acquisition_date) {
            return Err(Error::DataUnavailable(format!(
                "scene acquired {} is outside {}",
                self.acquisition_date, request.date_range
            )));
        }

        let samples = self
            .bands
            .band_samples(&request.region, request.max_points, self.seed)?;
        debug!(samples = samples.len(), "sampled band rasters");

        Ok(Scene {
            id: self.id.clone(),
            acquisition_date: self.acquisition_date,
            samples,
        })
    }
}
