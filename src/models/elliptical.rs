//! Elliptical (rotated, eccentric) Gaussian on the sky.

use crate::error::{Result, SkyFitError};
use crate::model::{evaluate_positions, floor_density, SpatialModel, DEG2_PER_SR, DENSITY_FLOOR};
use crate::parameters::{resolve, Parameter, ParameterSet, SpatialParameter};
use crate::utils::{bivariate_normal_pdf, elliptical_covariance, tangent_plane_offset};
use nalgebra::{Matrix2, Vector2};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

const NAMES: &[&str] = &["RA0", "Dec0", "sigma", "eccentricity", "angle"];

/// Parameters of [`EllipticalGaussianModel`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipticalGaussianParams {
    pub ra0: Parameter,
    pub dec0: Parameter,
    /// Semi-major axis scale, degrees
    pub sigma: SpatialParameter,
    pub eccentricity: SpatialParameter,
    /// Rotation of the major axis, degrees counter-clockwise from the RA axis
    pub angle: SpatialParameter,
}

impl EllipticalGaussianParams {
    pub fn new() -> Result<Self> {
        Ok(Self {
            ra0: Parameter::new("RA0", 1.0, 0.0, 360.0, 0.1)?,
            dec0: Parameter::new("Dec0", 1.0, -90.0, 90.0, 0.1)?,
            sigma: SpatialParameter::new("sigma", 0.1, 0.0, 10.0, 0.01)?,
            eccentricity: SpatialParameter::new("eccentricity", 0.7, 0.0, 1.0, 0.01)?,
            angle: SpatialParameter::new("angle", 0.0, 0.0, 180.0, 1.0)?,
        })
    }

    fn validate_names(&self) -> Result<()> {
        for (field, expected) in [
            (self.ra0.name(), "RA0"),
            (self.dec0.name(), "Dec0"),
            (self.sigma.name(), "sigma"),
            (self.eccentricity.name(), "eccentricity"),
            (self.angle.name(), "angle"),
        ] {
            if field != expected {
                return Err(SkyFitError::ParameterNotFound(expected.to_string()));
            }
        }
        Ok(())
    }
}

impl ParameterSet for EllipticalGaussianParams {
    fn names(&self) -> &'static [&'static str] {
        NAMES
    }

    fn get(&self, name: &str) -> Option<&Parameter> {
        match name {
            "RA0" => Some(&self.ra0),
            "Dec0" => Some(&self.dec0),
            _ => self.spatial(name).map(SpatialParameter::parameter),
        }
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        match name {
            "RA0" => Some(&mut self.ra0),
            "Dec0" => Some(&mut self.dec0),
            _ => self.get_spatial_mut(name).map(SpatialParameter::parameter_mut),
        }
    }

    fn get_spatial_mut(&mut self, name: &str) -> Option<&mut SpatialParameter> {
        match name {
            "sigma" => Some(&mut self.sigma),
            "eccentricity" => Some(&mut self.eccentricity),
            "angle" => Some(&mut self.angle),
            _ => None,
        }
    }
}

impl EllipticalGaussianParams {
    fn spatial(&self, name: &str) -> Option<&SpatialParameter> {
        match name {
            "sigma" => Some(&self.sigma),
            "eccentricity" => Some(&self.eccentricity),
            "angle" => Some(&self.angle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct EllipticalKernel {
    ra0: f64,
    dec0: f64,
    covariance: Matrix2<f64>,
}

impl EllipticalKernel {
    fn density(&self, ra: f64, dec: f64) -> f64 {
        let (x, y) = tangent_plane_offset(self.ra0, self.dec0, ra, dec);

        match bivariate_normal_pdf(&Vector2::new(x, y), &Vector2::zeros(), &self.covariance) {
            Some(pdf) => floor_density(DEG2_PER_SR * pdf),
            None => DENSITY_FLOOR,
        }
    }
}

/// An anisotropic 2-D Gaussian surface brightness
///
/// f(x) = (180/pi)^2 / (2 pi sqrt(det S)) * exp(-1/2 x^T S^-1 x)
///
/// with `S = R(angle) diag(sigma^2, sigma^2 (1 - e^2)) R(angle)^T` and `x` the
/// offset of `(RA, Dec)` from `(RA0, Dec0)` in the local tangent plane
/// (first axis along increasing RA, second along increasing Dec). The
/// offset's length equals the angular separation, so for `e = 0` this is
/// exactly [`CircularGaussianModel`](super::CircularGaussianModel).
///
/// This is not the same as a Gaussian in plain `(RA - RA0, Dec - Dec0)`
/// coordinates. The two agree near the equator and close to the source.
/// Away from the equator the RA offset shrinks by `cos(Dec)` in the tangent
/// plane, and a raw RA difference would also jump at the 0/360 wrap.
///
/// The rotation angle is a flat-sky quantity and is only meaningful close
/// to the source position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EllipticalGaussianModel {
    params: EllipticalGaussianParams,
    #[serde(skip)]
    ncalls: u64,
}

impl EllipticalGaussianModel {
    pub const NAME: &'static str = "Multivariate Gaussian";
    pub const FORMULA: &'static str = r"f(\vec{x}) = \left(\frac{180^\circ}{\pi}\right)^2 \frac{1}{2\pi\sqrt{\det\Sigma}} \exp\left(-\frac{1}{2}\vec{x}^\intercal\Sigma^{-1}\vec{x}\right), \quad \Sigma = U \, {\rm diag}(\sigma^2, \sigma^2(1-e^2)) \, U^\intercal, \quad U = \left(\begin{array}{cc}\cos\theta & -\sin\theta \\ \sin\theta & \cos\theta\end{array}\right)";

    pub fn new() -> Result<Self> {
        Ok(Self::with_params(EllipticalGaussianParams::new()?))
    }

    pub fn with_params(params: EllipticalGaussianParams) -> Self {
        Self { params, ncalls: 0 }
    }

    pub fn params(&self) -> &EllipticalGaussianParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut EllipticalGaussianParams {
        &mut self.params
    }

    fn kernel(&self, energy: f64) -> EllipticalKernel {
        let sigma = resolve(&self.params.sigma, energy);
        let eccentricity = resolve(&self.params.eccentricity, energy);
        let angle = resolve(&self.params.angle, energy).to_radians();

        EllipticalKernel {
            ra0: self.params.ra0.value(),
            dec0: self.params.dec0.value(),
            covariance: elliptical_covariance(sigma, eccentricity, angle),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.params.validate_names()?;
        Ok(model)
    }
}

impl SpatialModel for EllipticalGaussianModel {
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
