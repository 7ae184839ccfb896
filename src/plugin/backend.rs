//! Seam to the observatory's native analysis library.
//!
//! The library does the actual binned-likelihood work. This crate only talks
//! to it through [`AnalysisBackend`]; bindings implement the trait and a
//! [`BackendFactory`] that builds an instance once the likelihood model is
//! known.

use crate::error::Result;
use crate::plugin::config::RegionOfInterest;
use crate::plugin::LikelihoodModel;
use std::path::{Path, PathBuf};

/// Everything the native library needs to load its data
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub maptree: PathBuf,
    pub response: PathBuf,
    /// `None` keeps the exposure stored in the map tree
    pub n_transits: Option<f64>,
    pub min_channel: u32,
    pub max_channel: u32,
    pub fullsky: bool,
}

/// A live analysis session of the native library
pub trait AnalysisBackend {
    /// Pull the current source parameters from the likelihood model
    fn update_model(&mut self, model: &mut dyn LikelihoodModel) -> Result<()>;

    /// Restrict the analysis to a region of interest
    fn set_roi(&mut self, roi: &RegionOfInterest) -> Result<()>;

    /// Set the background normalisation shared by all analysis bins
    fn set_common_norm(&mut self, value: f64) -> Result<()>;

    /// Current background normalisation
    fn common_norm(&self) -> f64;

    /// Let the backend profile the background normalisation during `log_like`
    fn set_background_norm_free(&mut self, free: bool) -> Result<()>;

    /// Log-likelihood for the current model
    fn log_like(&mut self, fit_common_norm: bool) -> Result<f64>;

    /// Test statistic `2 [logL(model) - logL(background only)]`
    fn calc_ts(&mut self, fit_common_norm: bool) -> Result<f64>;

    /// Model-predicted excess in a top-hat around `(ra, dec)`, one value per active bin
    fn top_hat_expected_excesses(&self, ra: f64, dec: f64, radius: f64) -> Result<Vec<f64>>;

    /// Observed excess in a top-hat around `(ra, dec)`, one value per active bin
    fn top_hat_excesses(&self, ra: f64, dec: f64, radius: f64) -> Result<Vec<f64>>;

    /// Background counts in a top-hat around `(ra, dec)`, one value per active bin
    fn top_hat_backgrounds(&self, ra: f64, dec: f64, radius: f64) -> Result<Vec<f64>>;

    fn write_model_map(&self, path: &Path) -> Result<()>;

    fn write_residual_map(&self, path: &Path) -> Result<()>;
}

/// Builds backend sessions
pub trait BackendFactory {
    fn open(
        &self,
        request: &BackendRequest,
        model: &mut dyn LikelihoodModel,
    ) -> Result<Box<dyn AnalysisBackend>>;
}

impl<F> BackendFactory for F
where
    F: Fn(&BackendRequest, &mut dyn LikelihoodModel) -> Result<Box<dyn AnalysisBackend>>,
{
    fn open(
        &self,
        request: &BackendRequest,
        model: &mut dyn LikelihoodModel,
    ) -> Result<Box<dyn AnalysisBackend>> {
        self(request, model)
    }
}
