//! # Likelihood plugins
//!
//! A plugin turns one dataset into a log-likelihood for the current state of
//! a source model. The joint-fit or sampling engine owns the model and hands
//! it to the plugin on every call; the plugin never keeps a reference.
//!
//! ## Core Components
//!
//! - [`LikelihoodModel`]: what a plugin needs to know about the source model
//! - [`LikelihoodPlugin`]: the interface every dataset plugin implements
//! - [`ObservatoryLike`]: plugin for a gamma-ray observatory whose analysis
//!   runs in a native library reached through [`AnalysisBackend`]
//! - [`ObservatoryConfig`]: serde configuration of that plugin
//! - [`ChannelDiagnostics`]: per-bin data/model comparison for display

use crate::error::Result;
use crate::model::SpatialModel;
use crate::parameters::ParameterSet;

pub mod backend;
pub mod config;
pub mod diagnostics;
pub mod observatory;

pub use backend::{AnalysisBackend, BackendFactory, BackendRequest};
pub use config::{sanitize_path, ObservatoryConfig, RegionOfInterest};
pub use diagnostics::ChannelDiagnostics;
pub use observatory::{NuisanceParams, ObservatoryLike, PluginState, COMMON_NORM};

/// The source model as seen by a likelihood plugin
pub trait LikelihoodModel {
    fn point_source_count(&self) -> usize;

    /// `(ra, dec)` in degrees, or `None` if `index` is out of range
    fn point_source_position(&self, index: usize) -> Option<(f64, f64)>;

    fn extended_source_count(&self) -> usize {
        0
    }

    /// Spatial model of an extended source
    fn extended_source(&mut self, _index: usize) -> Option<&mut dyn SpatialModel> {
        None
    }

    /// `(name, value)` of every free parameter, in a stable order
    fn free_parameter_values(&self) -> Vec<(String, f64)>;
}

/// A dataset that contributes a log-likelihood term to a joint fit
pub trait LikelihoodPlugin {
    /// Dataset name
    fn name(&self) -> &str;

    /// Prepare the plugin for `model`; must be called before `log_like`
    fn set_model(&mut self, model: &mut dyn LikelihoodModel) -> Result<()>;

    /// Log-likelihood with the current parameter values of `model`
    fn log_like(&mut self, model: &mut dyn LikelihoodModel) -> Result<f64>;

    /// Log-likelihood after profiling the plugin's own nuisance parameters
    fn inner_fit(&mut self, model: &mut dyn LikelihoodModel) -> Result<f64>;

    /// Nuisance parameters owned by the plugin
    fn nuisance_parameters(&self) -> &dyn ParameterSet;

    /// Set a nuisance parameter and propagate it to wherever it is used
    fn set_nuisance_value(&mut self, name: &str, value: f64) -> Result<()>;
}
