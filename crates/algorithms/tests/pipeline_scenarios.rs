//! End-to-end analysis scenarios against a scripted imagery provider.

use std::cell::{Cell, RefCell};

use approx::assert_relative_eq;
use chrono::{NaiveDate, TimeZone, Utc};
use uhi_algorithms::imagery::{emissivity, C2, K1, K2, KELVIN_OFFSET, WAVELENGTH};
use uhi_algorithms::pipeline::{analyze, AnalysisRequest, FixedClock, PipelineConfig, ALGORITHMS};
use uhi_core::{
    BandSample, Error, ErrorKind, ImageryProvider, Location, Result, Scene, SceneRequest, Severity,
};

/// Returns a fixed scene (or nothing) and records every request.
struct ScriptedProvider {
    scene: Option<Scene>,
    calls: Cell<usize>,
    last_request: RefCell<Option<SceneRequest>>,
}

impl ScriptedProvider {
    fn with_scene(samples: Vec<BandSample>) -> Self {
        Self {
            scene: Some(Scene {
                id: Some("LC08_140046_20240512".into()),
                acquisition_date: NaiveDate::from_ymd_opt(2024, 5, 12).unwrap(),
                samples,
            }),
            calls: Cell::new(0),
            last_request: RefCell::new(None),
        }
    }

    fn empty() -> Self {
        Self {
            scene: None,
            calls: Cell::new(0),
            last_request: RefCell::new(None),
        }
    }
}

impl ImageryProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch_scene(&self, request: &SceneRequest) -> Result<Scene> {
        self.calls.set(self.calls.get() + 1);
        *self.last_request.borrow_mut() = Some(*request);
        self.scene.clone().ok_or_else(|| {
            Error::DataUnavailable(format!(
                "no imagery with cloud cover <= {}% for {}",
                request.max_cloud_cover, request.date_range
            ))
        })
    }
}

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap())
}

/// NIR reflectance giving `target` NDVI against a red reflectance of 0.1.
fn nir_for_ndvi(target: f64) -> f64 {
    0.1 * (1.0 + target) / (1.0 - target)
}

/// Thermal radiance whose emissivity-corrected LST is `target` °C.
fn thermal_for_lst(target: f64, ndvi: f64) -> f64 {
    let a = WAVELENGTH / C2 * emissivity(ndvi).ln();
    let bt = target / (1.0 - a * target);
    K1 / ((K2 / (bt + KELVIN_OFFSET)).exp() - 1.0)
}

const SCENARIO_A_LST: [f64; 12] = [45.0, 44.0, 43.0, 42.0, 41.0, 40.0, 25.0, 24.0, 23.0, 10.0, 9.0, 8.0];
const SCENARIO_A_NDVI: [f64; 3] = [0.05, 0.35, 0.7];

fn scenario_a_bands() -> Vec<BandSample> {
    SCENARIO_A_LST
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let ndvi = SCENARIO_A_NDVI[i / 4];
            BandSample::new(
                Location::new(85.78 + i as f64 * 0.005, 20.30),
                nir_for_ndvi(ndvi),
                0.1,
                thermal_for_lst(t, ndvi),
            )
        })
        .collect()
}

fn request(sample_count: usize) -> AnalysisRequest {
    AnalysisRequest {
        sample_count,
        lookback_days: 30,
    }
}

#[test]
fn scenario_a_twelve_points_three_zones() {
    let provider = ScriptedProvider::with_scene(scenario_a_bands());
    let report = analyze(&provider, &request(12), &PipelineConfig::default(), &clock()).unwrap();

    assert_eq!(report.points.len(), 12);
    for (p, &t) in report.points.iter().zip(&SCENARIO_A_LST) {
        assert_relative_eq!(p.lst, t, epsilon = 1e-6);
    }

    let zones: Vec<usize> = report.points.iter().map(|p| p.zone).collect();
    assert_eq!(zones, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]);

    let stats = &report.statistics;
    assert_eq!(stats.total_points, 12);
    assert_eq!(stats.zone_counts.values().copied().collect::<Vec<_>>(), vec![4, 4, 4]);
    assert_eq!(stats.avg_lst, 29.5);
    assert_eq!(stats.max_lst, 45.0);
    assert_eq!(stats.min_lst, 8.0);
    assert_eq!(stats.max_uhi_intensity, 15.5);
    assert_eq!(stats.avg_uhi_intensity, 0.0);

    assert_eq!(report.zones[0].severity, Severity::Critical);
    assert_eq!(report.zones[0].avg_lst, Some(43.5));
    assert_eq!(report.zones[2].avg_lst, Some(12.5));
}

#[test]
fn scenario_a_zone_means_are_ordered() {
    let provider = ScriptedProvider::with_scene(scenario_a_bands());
    let report = analyze(&provider, &request(12), &PipelineConfig::default(), &clock()).unwrap();

    let means: Vec<f64> = report.zones.iter().map(|z| z.avg_lst.unwrap()).collect();
    assert!(means.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn scenario_b_sample_count_below_minimum() {
    let provider = ScriptedProvider::with_scene(scenario_a_bands());
    let err = analyze(&provider, &request(5), &PipelineConfig::default(), &clock()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parameter);
    assert!(err.to_string().contains("sample_count"));
    assert_eq!(provider.calls.get(), 0);
}

#[test]
fn sample_count_above_maximum_skips_provider() {
    let provider = ScriptedProvider::with_scene(scenario_a_bands());
    let err = analyze(&provider, &request(501), &PipelineConfig::default(), &clock()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parameter);
    assert_eq!(provider.calls.get(), 0);
}

#[test]
fn scenario_c_no_scene_for_period() {
    let provider = ScriptedProvider::empty();
    let err = analyze(&provider, &request(50), &PipelineConfig::default(), &clock()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DataUnavailable);
    assert_ne!(err.kind(), ErrorKind::Parameter);
    assert!(err.to_string().contains("no imagery"));
    assert_eq!(provider.calls.get(), 1);
}

#[test]
fn all_points_implausible_is_data_unavailable() {
    let bands: Vec<BandSample> = (0..12)
        .map(|i| BandSample::new(Location::new(85.8, 20.3 + i as f64 * 0.001), 0.3, 0.1, -1.0))
        .collect();
    let provider = ScriptedProvider::with_scene(bands);
    let err = analyze(&provider, &request(12), &PipelineConfig::default(), &clock()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataUnavailable);
}

#[test]
fn fewer_valid_points_than_clusters() {
    let mut bands = scenario_a_bands();
    for b in bands.iter_mut().skip(2) {
        b.thermal = 0.0;
    }
    let provider = ScriptedProvider::with_scene(bands);
    let err = analyze(&provider, &request(12), &PipelineConfig::default(), &clock()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);
}

#[test]
fn provider_receives_lookback_request() {
    let provider = ScriptedProvider::with_scene(scenario_a_bands());
    let config = PipelineConfig::default();
    analyze(&provider, &request(12), &config, &clock()).unwrap();

    let sent = provider.last_request.borrow().unwrap();
    assert_eq!(sent.region, config.region);
    assert_eq!(sent.max_points, 12);
    assert_eq!(sent.max_cloud_cover, 20.0);
    assert_eq!(sent.date_range.end, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    assert_eq!(sent.date_range.start, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
}

#[test]
fn report_metadata() {
    let provider = ScriptedProvider::with_scene(scenario_a_bands());
    let report = analyze(&provider, &request(12), &PipelineConfig::default(), &clock()).unwrap();
    let meta = &report.metadata;

    assert_eq!(meta.data_source, "scripted");
    assert_eq!(meta.algorithms, ALGORITHMS.to_vec());
    assert_eq!(meta.generated_at, clock().0);
    assert_eq!(meta.scene_date, NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
    assert_eq!(meta.scene_id.as_deref(), Some("LC08_140046_20240512"));
    assert_eq!(meta.requested_points, 12);
    assert_eq!(meta.valid_points, 12);
    assert_eq!(meta.cluster_count, 3);
    assert_eq!(meta.seed, 42);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["metadata"]["scene_date"], "2024-05-12");
    assert_eq!(json["points"][0]["severity"], "Critical");
    assert_eq!(json["points"][11]["vegetation_category"], "Dense Vegetation");
    assert!(json["points"][0]["lon"].is_f64());
}

#[test]
fn repeated_runs_are_identical() {
    let provider = ScriptedProvider::with_scene(scenario_a_bands());
    let config = PipelineConfig::default();
    let first = analyze(&provider, &request(12), &config, &clock()).unwrap();
    let second = analyze(&provider, &request(12), &config, &clock()).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn points_outside_region_are_dropped_in_order() {
    let mut bands = scenario_a_bands();
    bands.insert(3, BandSample::new(Location::new(90.0, 20.3), 0.3, 0.1, 10.5));
    let provider = ScriptedProvider::with_scene(bands);
    let report = analyze(&provider, &request(13), &PipelineConfig::default(), &clock()).unwrap();

    assert_eq!(report.metadata.valid_points, 12);
    let lons: Vec<f64> = report.points.iter().map(|p| p.location.lon).collect();
    assert!(lons.windows(2).all(|w| w[0] < w[1]));
}
