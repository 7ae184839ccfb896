//! Recording analysis backend and a toy likelihood model
//!
//! The backend computes a made-up log-likelihood from the model parameters so
//! tests can check that values really flow through the plugin.

use skyfit_rs::model::SpatialModel;
use skyfit_rs::models::{gaussian_model, CircularGaussianModel};
use skyfit_rs::parameters::ParameterSet;
use skyfit_rs::plugin::{AnalysisBackend, BackendRequest, LikelihoodModel, RegionOfInterest};
use skyfit_rs::{Result, SkyFitError};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

/// Background-only log-likelihood reported by the mock backend
pub const BACKGROUND_LOG_LIKE: f64 = -1000.0;

/// CommonNorm the mock backend settles on when allowed to profile it
pub const PROFILED_NORM: f64 = 1.2;

/// Everything the mock backend has been asked to do
#[derive(Debug, Default)]
pub struct Recorder {
    pub requests: Vec<BackendRequest>,
    pub rois: Vec<RegionOfInterest>,
    pub common_norms: Vec<f64>,
    pub background_free: Vec<bool>,
    pub model_updates: Vec<Vec<(String, f64)>>,
    pub extended_peaks: Vec<f64>,
    pub written_maps: Vec<PathBuf>,
    /// Make `set_common_norm` fail, as a broken native session would
    pub reject_common_norm: bool,
}

pub type SharedRecorder = Rc<RefCell<Recorder>>;

pub struct MockBackend {
    recorder: SharedRecorder,
    channels: usize,
    common_norm: f64,
    background_free: bool,
    current: Vec<(String, f64)>,
}

impl AnalysisBackend for MockBackend {
    fn update_model(&mut self, model: &mut dyn LikelihoodModel) -> Result<()> {
        self.current = model.free_parameter_values();

        let mut recorder = self.recorder.borrow_mut();
        recorder.model_updates.push(self.current.clone());
        for index in 0..model.extended_source_count() {
            if let Some(source) = model.extended_source(index) {
                let ra0 = source.parameters().get("RA0").map(|p| p.value()).unwrap_or(0.0);
                let dec0 = source.parameters().get("Dec0").map(|p| p.value()).unwrap_or(0.0);
                recorder.extended_peaks.push(source.evaluate(ra0, dec0, 1.0));
            }
        }
        Ok(())
    }

    fn set_roi(&mut self, roi: &RegionOfInterest) -> Result<()> {
        self.recorder.borrow_mut().rois.push(*roi);
        Ok(())
    }

    fn set_common_norm(&mut self, value: f64) -> Result<()> {
        let mut recorder = self.recorder.borrow_mut();
        if recorder.reject_common_norm {
            return Err(SkyFitError::Backend(format!(
                "cannot set CommonNorm to {}",
                value
            )));
        }
        self.common_norm = value;
        recorder.common_norms.push(value);
        Ok(())
    }

    fn common_norm(&self) -> f64 {
        self.common_norm
    }

    fn set_background_norm_free(&mut self, free: bool) -> Result<()> {
        self.background_free = free;
        self.recorder.borrow_mut().background_free.push(free);
        Ok(())
    }

    fn log_like(&mut self, fit_common_norm: bool) -> Result<f64> {
        if fit_common_norm && self.background_free {
            self.common_norm = PROFILED_NORM;
        }
        let penalty: f64 = self.current.iter().map(|(_, v)| v * v).sum();
        Ok(BACKGROUND_LOG_LIKE + 10.0 * self.common_norm - penalty)
    }

    fn calc_ts(&mut self, fit_common_norm: bool) -> Result<f64> {
        Ok(2.0 * (self.log_like(fit_common_norm)? - BACKGROUND_LOG_LIKE))
    }

    fn top_hat_expected_excesses(&self, _ra: f64, _dec: f64, radius: f64) -> Result<Vec<f64>> {
        Ok((0..self.channels).map(|i| radius * (i + 1) as f64).collect())
    }

    fn top_hat_excesses(&self, _ra: f64, _dec: f64, radius: f64) -> Result<Vec<f64>> {
        Ok((0..self.channels).map(|i| 2.0 * radius * (i + 1) as f64).collect())
    }

    fn top_hat_backgrounds(&self, _ra: f64, _dec: f64, _radius: f64) -> Result<Vec<f64>> {
        Ok(vec![100.0; self.channels])
    }

    fn write_model_map(&self, path: &Path) -> Result<()> {
        self.recorder.borrow_mut().written_maps.push(path.to_path_buf());
        Ok(())
    }

    fn write_residual_map(&self, path: &Path) -> Result<()> {
        self.recorder.borrow_mut().written_maps.push(path.to_path_buf());
        Ok(())
    }
}

/// Factory closure producing mock backends that report to `recorder`
pub fn mock_factory(
    recorder: SharedRecorder,
) -> impl Fn(&BackendRequest, &mut dyn LikelihoodModel) -> Result<Box<dyn AnalysisBackend>> {
    move |request, _model| {
        recorder.borrow_mut().requests.push(request.clone());
        Ok(Box::new(MockBackend {
            recorder: Rc::clone(&recorder),
            channels: (request.max_channel - request.min_channel + 1) as usize,
            common_norm: 1.0,
            background_free: false,
            current: Vec::new(),
        }) as Box<dyn AnalysisBackend>)
    }
}

/// Factory that always fails, as when the native software is broken
pub fn failing_factory(
) -> impl Fn(&BackendRequest, &mut dyn LikelihoodModel) -> Result<Box<dyn AnalysisBackend>> {
    |_request, _model| Err(SkyFitError::Backend("liff library not loaded".to_string()))
}

/// One point source plus one extended Gaussian source
pub struct ToyModel {
    pub point: (f64, f64),
    pub flux_index: f64,
    pub extended: CircularGaussianModel,
}

impl ToyModel {
    pub fn new() -> Self {
        Self {
            point: (83.63, 22.01),
            flux_index: -2.6,
            extended: gaussian_model(84.0, 22.5, 0.3).unwrap(),
        }
    }
}

impl LikelihoodModel for ToyModel {
    fn point_source_count(&self) -> usize {
        1
    }

    fn point_source_position(&self, index: usize) -> Option<(f64, f64)> {
        (index == 0).then_some(self.point)
    }

    fn extended_source_count(&self) -> usize {
        1
    }

    fn extended_source(&mut self, index: usize) -> Option<&mut dyn SpatialModel> {
        if index == 0 {
            Some(&mut self.extended)
        } else {
            None
        }
    }

    fn free_parameter_values(&self) -> Vec<(String, f64)> {
        let mut values = vec![("index".to_string(), self.flux_index)];
        values.extend(
            self.extended
                .parameters()
                .free_values()
                .into_iter()
                .map(|(name, value)| (format!("ext.{}", name), value)),
        );
        values
    }
}

/// A pair of readable input files in a scratch directory
///
/// The directory is removed when the value is dropped.
pub struct InputFiles {
    pub maptree: PathBuf,
    pub response: PathBuf,
    _dir: TempDir,
}

impl InputFiles {
    pub fn create(tag: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix(&format!("skyfit-{}-", tag))
            .tempdir()
            .unwrap();

        let maptree = dir.path().join("maptree.root");
        let response = dir.path().join("response.root");
        std::fs::write(&maptree, b"maptree").unwrap();
        std::fs::write(&response, b"response").unwrap();

        Self {
            maptree,
            response,
            _dir: dir,
        }
    }
}
