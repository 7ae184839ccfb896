//! Likelihood plugin for a ground-based gamma-ray observatory.

use crate::error::{Result, SkyFitError};
use crate::parameters::{Parameter, ParameterError, ParameterSet};
use crate::plugin::backend::{AnalysisBackend, BackendFactory, BackendRequest};
use crate::plugin::config::{ObservatoryConfig, RegionOfInterest};
use crate::plugin::diagnostics::ChannelDiagnostics;
use crate::plugin::{LikelihoodModel, LikelihoodPlugin};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the background normalisation nuisance parameter
pub const COMMON_NORM: &str = "CommonNorm";

const NUISANCE_NAMES: &[&str] = &[COMMON_NORM];

/// Nuisance parameters owned by the plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuisanceParams {
    pub common_norm: Parameter,
}

impl NuisanceParams {
    /// CommonNorm = 1.0 in [0.5, 1.5], fixed
    pub fn new() -> Result<Self> {
        Ok(Self {
            common_norm: Parameter::new(COMMON_NORM, 1.0, 0.5, 1.5, 0.01)?
                .with_fixed(true)
                .with_nuisance(true),
        })
    }
}

impl ParameterSet for NuisanceParams {
    fn names(&self) -> &'static [&'static str] {
        NUISANCE_NAMES
    }

    fn get(&self, name: &str) -> Option<&Parameter> {
        (name == COMMON_NORM).then_some(&self.common_norm)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        (name == COMMON_NORM).then_some(&mut self.common_norm)
    }
}

/// Everything needed to rebuild a plugin elsewhere
///
/// The backend session is not part of the state; it is opened again by the
/// next `set_model` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginState {
    pub config: ObservatoryConfig,
    pub nuisance: NuisanceParams,
    pub fit_common_norm: bool,
}

/// Bridges a likelihood model to the observatory's native analysis library
///
/// The plugin is created from an [`ObservatoryConfig`]; the backend session
/// is opened by [`set_model`](LikelihoodPlugin::set_model) once the source
/// model is known.
pub struct ObservatoryLike<F: BackendFactory> {
    config: ObservatoryConfig,
    factory: F,
    backend: Option<Box<dyn AnalysisBackend>>,
    nuisance: NuisanceParams,
    fit_common_norm: bool,
}

impl<F: BackendFactory> ObservatoryLike<F> {
    /// Create a plugin
    ///
    /// Input paths are expanded and made absolute, and both files must be
    /// readable. Fitting of CommonNorm starts deactivated.
    pub fn new(mut config: ObservatoryConfig, factory: F) -> Result<Self> {
        config.validate()?;
        config.resolve_paths()?;

        Ok(Self {
            config,
            factory,
            backend: None,
            nuisance: NuisanceParams::new()?,
            fit_common_norm: false,
        })
    }

    /// Rebuild a plugin from [`state`](Self::state) output
    pub fn from_state(state: PluginState, factory: F) -> Result<Self> {
        let mut plugin = Self::new(state.config, factory)?;
        plugin.nuisance = state.nuisance;
        plugin.fit_common_norm = state.fit_common_norm;
        Ok(plugin)
    }

    pub fn state(&self) -> PluginState {
        PluginState {
            config: self.config.clone(),
            nuisance: self.nuisance.clone(),
            fit_common_norm: self.fit_common_norm,
        }
    }

    pub fn config(&self) -> &ObservatoryConfig {
        &self.config
    }

    /// `true` once a backend session is open
    pub fn is_instanced(&self) -> bool {
        self.backend.is_some()
    }

    /// Define the region of interest used by full-sky analyses
    ///
    /// Takes effect at the next `set_model`.
    pub fn set_roi(&mut self, ra: f64, dec: f64, radius: f64, fixed: bool) -> Result<()> {
        self.config.roi = Some(RegionOfInterest::new(ra, dec, radius, fixed)?);
        Ok(())
    }

    /// Select the analysis bins to use
    ///
    /// An already open backend keeps its bins; the change applies to the next
    /// session.
    pub fn set_active_measurements(&mut self, min_channel: u32, max_channel: u32) -> Result<()> {
        if min_channel > max_channel {
            return Err(SkyFitError::InvalidConfig(format!(
                "min channel {} is above max channel {}",
                min_channel, max_channel
            )));
        }

        self.config.min_channel = min_channel;
        self.config.max_channel = max_channel;

        if self.is_instanced() {
            warn!(
                "{}: active measurements changed to {}..={}; the change takes effect only for a new likelihood session",
                self.config.name, min_channel, max_channel
            );
        }
        Ok(())
    }

    pub fn activate_common_norm(&mut self) {
        self.fit_common_norm = true;
    }

    pub fn deactivate_common_norm(&mut self) {
        self.fit_common_norm = false;
    }

    pub fn is_common_norm_fitted(&self) -> bool {
        self.fit_common_norm
    }

    fn backend_mut(&mut self) -> Result<&mut Box<dyn AnalysisBackend>> {
        let name = &self.config.name;
        self.backend
            .as_mut()
            .ok_or_else(|| SkyFitError::NotInstanced(name.clone()))
    }

    fn backend(&self) -> Result<&dyn AnalysisBackend> {
        self.backend
            .as_deref()
            .ok_or_else(|| SkyFitError::NotInstanced(self.config.name.clone()))
    }

    fn request(&self) -> BackendRequest {
        BackendRequest {
            maptree: self.config.maptree.clone(),
            response: self.config.response.clone(),
            n_transits: self.config.n_transits,
            min_channel: self.config.min_channel,
            max_channel: self.config.max_channel,
            fullsky: self.config.fullsky,
        }
    }

    fn open_backend(&self, model: &mut dyn LikelihoodModel) -> Result<Box<dyn AnalysisBackend>> {
        let mut backend = self.factory.open(&self.request(), model)?;

        if self.config.fullsky {
            let roi = self.config.roi.ok_or(SkyFitError::MissingRegionOfInterest)?;
            backend.set_roi(&roi)?;
        }

        backend.set_common_norm(self.nuisance.common_norm.value())?;
        Ok(backend)
    }

    /// Test statistic for the current model
    pub fn calc_ts(&mut self, model: &mut dyn LikelihoodModel) -> Result<f64> {
        let fit_common_norm = self.fit_common_norm;
        let backend = self.backend_mut()?;
        backend.update_model(model)?;
        backend.calc_ts(fit_common_norm)
    }

    /// Data/model comparison around every point source of `model`
    pub fn diagnostics(
        &self,
        model: &dyn LikelihoodModel,
        radius: f64,
    ) -> Result<Vec<ChannelDiagnostics>> {
        let backend = self.backend()?;

        (0..model.point_source_count())
            .map(|index| {
                let (ra, dec) = model.point_source_position(index).ok_or_else(|| {
                    SkyFitError::InvalidConfig(format!("point source {} has no position", index))
                })?;

                ChannelDiagnostics::from_counts(
                    (ra, dec, radius),
                    self.config.min_channel,
                    self.config.max_channel,
                    backend.top_hat_expected_excesses(ra, dec, radius)?,
                    backend.top_hat_excesses(ra, dec, radius)?,
                    backend.top_hat_backgrounds(ra, dec, radius)?,
                )
            })
            .collect()
    }

    pub fn write_model_map<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.backend()?.write_model_map(path.as_ref())
    }

    pub fn write_residual_map<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.backend()?.write_residual_map(path.as_ref())
    }
}

impl<F: BackendFactory> LikelihoodPlugin for ObservatoryLike<F> {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn set_model(&mut self, model: &mut dyn LikelihoodModel) -> Result<()> {
        match self.open_backend(model) {
            Ok(backend) => {
                info!(
                    "{}: likelihood session open (channels {}..={}, fullsky: {})",
                    self.config.name, self.config.min_channel, self.config.max_channel, self.config.fullsky
                );
                self.backend = Some(backend);
                Ok(())
            }
            Err(err) => {
                error!(
                    "{}: could not instance the analysis backend, check that the observatory software is working: {}",
                    self.config.name, err
                );
                Err(err)
            }
        }
    }

    fn log_like(&mut self, model: &mut dyn LikelihoodModel) -> Result<f64> {
        let fit_common_norm = self.fit_common_norm;
        let backend = self.backend_mut()?;
        backend.update_model(model)?;
        backend.log_like(fit_common_norm)
    }

    fn inner_fit(&mut self, model: &mut dyn LikelihoodModel) -> Result<f64> {
        let fit_common_norm = self.fit_common_norm;
        let backend = self.backend_mut()?;
        backend.set_background_norm_free(fit_common_norm)?;
        backend.update_model(model)?;
        let log_like = backend.log_like(fit_common_norm)?;
        let common_norm = backend.common_norm();

        self.nuisance.common_norm.set_value(common_norm)?;
        debug!("{}: inner fit CommonNorm = {}", self.config.name, common_norm);
        Ok(log_like)
    }

    fn nuisance_parameters(&self) -> &dyn ParameterSet {
        &self.nuisance
    }

    fn set_nuisance_value(&mut self, name: &str, value: f64) -> Result<()> {
        let param = self
            .nuisance
            .get_mut(name)
            .ok_or_else(|| ParameterError::ParameterNotFound {
                name: name.to_string(),
            })?;
        param.bounds().check(value)?;

        // Commit only once the backend has taken the value
        if let Some(backend) = self.backend.as_mut() {
            debug!("{}: forwarding {} = {}", self.config.name, name, value);
            backend.set_common_norm(value)?;
        }
        param.set_value(value)?;
        Ok(())
    }
}
