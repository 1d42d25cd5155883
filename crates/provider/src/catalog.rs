//! Scene catalog provider
//!
//! A catalog is a JSON document listing scenes already sampled at point
//! locations:
//!
//! ```json
//! {
//!   "name": "Landsat 8 Collection 2 L2",
//!   "scenes": [
//!     {
//!       "id": "LC08_140046_20240512",
//!       "acquisition_date": "2024-05-12",
//!       "cloud_cover": 4.3,
//!       "samples": [{ "lon": 85.81, "lat": 20.29, "nir": 0.31, "red": 0.12, "thermal": 10.4 }]
//!     }
//!   ]
//! }
//! ```
//!
//! For a request, scenes outside the date range or above the cloud-cover
//! limit are discarded and the least cloudy remaining one is used; equal
//! cloud cover prefers the most recent acquisition.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uhi_core::{BandSample, Error, ImageryProvider, Result, Scene, SceneRequest};

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogScene {
    pub id: String,
    pub acquisition_date: NaiveDate,
    /// Scene cloud cover in percent
    pub cloud_cover: f64,
    pub samples: Vec<BandSample>,
}

/// On-disk catalog document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub name: Option<String>,
    pub scenes: Vec<CatalogScene>,
}

#[derive(Debug, Clone)]
pub struct CatalogProvider {
    name: String,
    scenes: Vec<CatalogScene>,
}

impl CatalogProvider {
    pub fn new(catalog: Catalog) -> Self {
        let name = match catalog.name {
            Some(n) => format!("Scene catalog ({n})"),
            None => "Scene catalog".to_string(),
        };
        Self {
            name,
            scenes: catalog.scenes,
        }
    }

    /// Parse a catalog from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)
            .map_err(|e| Error::Computation(format!("invalid scene catalog: {e}")))?;
        Ok(Self::new(catalog))
    }

    /// Read a catalog file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let provider = Self::from_json(&json)?;
        info!(path = %path.display(), scenes = provider.scenes.len(), "loaded scene catalog");
        Ok(provider)
    }

    pub fn scenes(&self) -> &[CatalogScene] {
        &self.scenes
    }

    /// The scene a request would use, if any qualifies.
    pub fn select_scene(&self, request: &SceneRequest) -> Option<&CatalogScene> {
        self.scenes
            .iter()
            .filter(|s| request.date_range.contains(s.acquisition_date))
            .filter(|s| s.cloud_cover.is_finite() && s.cloud_cover <= request.max_cloud_cover)
            .min_by(|a, b| {
                a.cloud_cover
                    .total_cmp(&b.cloud_cover)
                    .then_with(|| b.acquisition_date.cmp(&a.acquisition_date))
            })
    }
}

impl ImageryProvider for CatalogProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_scene(&self, request: &SceneRequest) -> Result<Scene> {
        let scene = self.select_scene(request).ok_or_else(|| {
            Error::DataUnavailable(format!(
                "no scene between {} and {} with cloud cover <= {}%",
                request.date_range.start, request.date_range.end, request.max_cloud_cover
            ))
        })?;

        let samples: Vec<BandSample> = scene
            .samples
            .iter()
            .filter(|s| request.region.contains(s.location.lon, s.location.lat))
            .take(request.max_points)
            .copied()
            .collect();

        debug!(
            scene = %scene.id,
            cloud_cover = scene.cloud_cover,
            samples = samples.len(),
            "selected catalog scene"
        );

        Ok(Scene {
            id: Some(scene.id.clone()),
            acquisition_date: scene.acquisition_date,
            samples,
        })
    }
}
