//! Parameter definition and implementation
//!
//! A [`Parameter`] is a named scalar with inclusive bounds, a step size for
//! the external optimizer, and `fixed`/`nuisance` flags. Models own their
//! parameters; only the fitting engine changes their values.

use crate::parameters::bounds::{Bounds, BoundsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when working with parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Bounds error: {0}")]
    BoundsError(#[from] BoundsError),

    #[error("Parameter '{name}' not found")]
    ParameterNotFound { name: String },

    #[error("Parameter '{name}' has a non-positive step size ({delta})")]
    InvalidStep { name: String, delta: f64 },

    #[error("Invalid energy scaling for parameter '{name}': {message}")]
    InvalidEnergyScaling { name: String, message: String },
}

/// A fit parameter
///
/// # Examples
///
/// ```
/// use skyfit_rs::parameters::Parameter;
///
/// let mut ra0 = Parameter::new("RA0", 1.0, 0.0, 360.0, 0.1).unwrap();
/// assert_eq!(ra0.name(), "RA0");
/// assert!(ra0.is_free());
///
/// ra0.set_value(83.63).unwrap();
/// assert!(ra0.set_value(400.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParameterRecord")]
pub struct Parameter {
    name: String,
    value: f64,
    init_value: f64,
    bounds: Bounds,
    /// Step size suggested to the optimizer
    delta: f64,
    fixed: bool,
    nuisance: bool,
    /// Tag of the dataset this parameter belongs to, if it is dataset specific
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dataset: Option<String>,
}

/// Serialized form of [`Parameter`], checked before it becomes one
#[derive(Deserialize)]
struct ParameterRecord {
    name: String,
    value: f64,
    init_value: f64,
    bounds: Bounds,
    delta: f64,
    fixed: bool,
    nuisance: bool,
    #[serde(default)]
    dataset: Option<String>,
}

impl TryFrom<ParameterRecord> for Parameter {
    type Error = ParameterError;

    fn try_from(record: ParameterRecord) -> Result<Self, Self::Error> {
        record.bounds.check(record.value)?;
        check_step(&record.name, record.delta)?;

        Ok(Self {
            name: record.name,
            value: record.value,
            init_value: record.init_value,
            bounds: record.bounds,
            delta: record.delta,
            fixed: record.fixed,
            nuisance: record.nuisance,
            dataset: record.dataset,
        })
    }
}

fn check_step(name: &str, delta: f64) -> Result<(), ParameterError> {
    if delta > 0.0 && delta.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::InvalidStep {
            name: name.to_string(),
            delta,
        })
    }
}

impl Parameter {
    /// Create a free, non-nuisance parameter
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the parameter
    /// * `value` - Initial value, must lie within `[min, max]`
    /// * `min` - Lower bound (inclusive)
    /// * `max` - Upper bound (inclusive)
    /// * `delta` - Step size for the optimizer, must be positive
    pub fn new(name: &str, value: f64, min: f64, max: f64, delta: f64) -> Result<Self, ParameterError> {
        let bounds = Bounds::new(min, max)?;
        bounds.check(value)?;
        check_step(name, delta)?;

        Ok(Self {
            name: name.to_string(),
            value,
            init_value: value,
            bounds,
            delta,
            fixed: false,
            nuisance: false,
            dataset: None,
        })
    }

    /// Builder-style setter for the fixed flag
    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    /// Builder-style setter for the nuisance flag
    pub fn with_nuisance(mut self, nuisance: bool) -> Self {
        self.nuisance = nuisance;
        self
    }

    /// Builder-style setter for the dataset tag
    pub fn with_dataset(mut self, dataset: &str) -> Self {
        self.dataset = Some(dataset.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the value of the parameter
    ///
    /// # Returns
    ///
    /// `Ok(())` if the value was set, or an error if it lies outside the bounds.
    /// The stored value is unchanged on error.
    pub fn set_value(&mut self, value: f64) -> Result<(), ParameterError> {
        self.bounds.check(value)?;
        self.value = value;
        Ok(())
    }

    pub fn init_value(&self) -> f64 {
        self.init_value
    }

    /// Reset the parameter to its initial value, clamped to the current bounds
    pub fn reset(&mut self) {
        self.value = self.bounds.clamp(self.init_value);
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn min(&self) -> f64 {
        self.bounds.min
    }

    pub fn max(&self) -> f64 {
        self.bounds.max
    }

    /// Replace the bounds, clamping the current value into them
    pub fn set_bounds(&mut self, min: f64, max: f64) -> Result<(), ParameterError> {
        let bounds = Bounds::new(min, max)?;
        self.bounds = bounds;
        self.value = bounds.clamp(self.value);
        Ok(())
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn set_delta(&mut self, delta: f64) -> Result<(), ParameterError> {
        check_step(&self.name, delta)?;
        self.delta = delta;
        Ok(())
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// `true` if the optimizer is allowed to vary this parameter
    pub fn is_free(&self) -> bool {
        !self.fixed
    }

    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    pub fn is_nuisance(&self) -> bool {
        self.nuisance
    }

    pub fn set_nuisance(&mut self, nuisance: bool) {
        self.nuisance = nuisance;
    }

    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }
}
