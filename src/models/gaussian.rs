//! Circular (isotropic) Gaussian on the sky.

use crate::error::{Result, SkyFitError};
use crate::model::{evaluate_positions, floor_density, SpatialModel, DEG2_PER_SR};
use crate::parameters::{resolve, Parameter, ParameterSet, SpatialParameter};
use crate::utils::angular_separation;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const NAMES: &[&str] = &["RA0", "Dec0", "sigma"];

/// Parameters of [`CircularGaussianModel`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianParams {
    /// Right ascension of the centre, degrees
    pub ra0: Parameter,
    /// Declination of the centre, degrees
    pub dec0: Parameter,
    /// Gaussian width, degrees
    pub sigma: SpatialParameter,
}

impl GaussianParams {
    /// Default parameter set: centre (1, 1), sigma 0.1 deg
    pub fn new() -> Result<Self> {
        Ok(Self {
            ra0: Parameter::new("RA0", 1.0, 0.0, 360.0, 0.1)?,
            dec0: Parameter::new("Dec0", 1.0, -90.0, 90.0, 0.1)?,
            sigma: SpatialParameter::new("sigma", 0.1, 0.0, 20.0, 0.01)?,
        })
    }

    fn validate_names(&self) -> Result<()> {
        for (field, expected) in [
            (self.ra0.name(), "RA0"),
            (self.dec0.name(), "Dec0"),
            (self.sigma.name(), "sigma"),
        ] {
            if field != expected {
                return Err(SkyFitError::ParameterNotFound(expected.to_string()));
            }
        }
        Ok(())
    }
}

impl ParameterSet for GaussianParams {
    fn names(&self) -> &'static [&'static str] {
        NAMES
    }

    fn get(&self, name: &str) -> Option<&Parameter> {
        match name {
            "RA0" => Some(&self.ra0),
            "Dec0" => Some(&self.dec0),
            "sigma" => Some(self.sigma.parameter()),
            _ => None,
        }
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        match name {
            "RA0" => Some(&mut self.ra0),
            "Dec0" => Some(&mut self.dec0),
            "sigma" => Some(self.sigma.parameter_mut()),
            _ => None,
        }
    }

    fn get_spatial_mut(&mut self, name: &str) -> Option<&mut SpatialParameter> {
        match name {
            "sigma" => Some(&mut self.sigma),
            _ => None,
        }
    }
}

/// Parameter values resolved at one energy
#[derive(Debug, Clone, Copy)]
struct CircularKernel {
    ra0: f64,
    dec0: f64,
    sigma: f64,
}

impl CircularKernel {
    fn density(&self, ra: f64, dec: f64) -> f64 {
        let distance = angular_separation(ra, dec, self.ra0, self.dec0);
        let variance = self.sigma * self.sigma;

        floor_density(
            DEG2_PER_SR / (2.0 * PI * variance) * (-0.5 * distance * distance / variance).exp(),
        )
    }
}

/// An isotropic 2-D Gaussian surface brightness
///
/// f(RA, Dec) = (180/pi)^2 * 1 / (2 pi sigma^2) * exp(-d^2 / (2 sigma^2))
///
/// where `d` is the great-circle distance from `(RA0, Dec0)`. The
/// normalisation is the flat-sky one, so the model integrates to one over
/// the sphere only while `sigma` is small.
///
/// # Examples
///
/// ```
/// use skyfit_rs::model::SpatialModel;
/// use skyfit_rs::models::CircularGaussianModel;
///
/// let mut model = CircularGaussianModel::new().unwrap();
/// model.parameters_mut().set_value("RA0", 180.0).unwrap();
/// model.parameters_mut().set_value("Dec0", 0.0).unwrap();
/// model.parameters_mut().set_value("sigma", 1.0).unwrap();
///
/// assert!(model.evaluate(180.0, 0.0, 1.0) > model.evaluate(181.0, 0.0, 1.0));
/// assert_eq!(model.ncalls(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircularGaussianModel {
    params: GaussianParams,
    #[serde(skip)]
    ncalls: u64,
}

impl CircularGaussianModel {
    pub const NAME: &'static str = "Gaussian";
    pub const FORMULA: &'static str = r"f({\rm RA, Dec}) = \left(\frac{180^\circ}{\pi}\right)^2 \frac{1}{2\pi\sigma^2} \exp\left(-\frac{{\rm angsep}^2({\rm RA, Dec, RA_0, Dec_0})}{2\sigma^2}\right)";

    /// Create a model with the default parameter set
    pub fn new() -> Result<Self> {
        Ok(Self::with_params(GaussianParams::new()?))
    }

    pub fn with_params(params: GaussianParams) -> Self {
        Self { params, ncalls: 0 }
    }

    /// Typed access to the parameters
    pub fn params(&self) -> &GaussianParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut GaussianParams {
        &mut self.params
    }

    fn kernel(&self, energy: f64) -> CircularKernel {
        CircularKernel {
            ra0: self.params.ra0.value(),
            dec0: self.params.dec0.value(),
            sigma: resolve(&self.params.sigma, energy),
        }
    }

    /// Serialize the parameter set to JSON (the call counter is not saved)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore a model from [`to_json`](Self::to_json) output
    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.params.validate_names()?;
        Ok(model)
    }
}

impl SpatialModel for CircularGaussianModel {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn formula(&self) -> &str {
        Self::FORMULA
    }

    fn parameters(&self) -> &dyn ParameterSet {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut dyn ParameterSet {
        &mut self.params
    }

    fn evaluate(&mut self, ra: f64, dec: f64, energy: f64) -> f64 {
        let density = self.kernel(energy).density(ra, dec);
        self.ncalls += 1;
        density
    }

    fn evaluate_grid(
        &mut self,
        ra: ArrayView1<'_, f64>,
        dec: ArrayView1<'_, f64>,
        energy: f64,
    ) -> Result<Array1<f64>> {
        let kernel = self.kernel(energy);
        let densities = evaluate_positions(ra, dec, |r, d| kernel.density(r, d))?;
        self.ncalls += 1;
        Ok(densities)
    }

    fn ncalls(&self) -> u64 {
        self.ncalls
    }
}
