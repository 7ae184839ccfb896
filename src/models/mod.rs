//! Built-in spatial models for extended sources.
//!
//! This module provides closed-form sky-brightness densities that can be
//! used as the spatial component of a fitted source model.

use crate::error::Result;

mod elliptical;
mod gaussian;

// Re-export the models
pub use elliptical::{EllipticalGaussianModel, EllipticalGaussianParams};
pub use gaussian::{CircularGaussianModel, GaussianParams};

/// Create a circular Gaussian model
///
/// # Arguments
///
/// * `ra0` - Right ascension of the centre, degrees
/// * `dec0` - Declination of the centre, degrees
/// * `sigma` - Width, degrees
///
/// # Returns
///
/// * A circular Gaussian model, or an error if a value is outside its bounds
pub fn gaussian_model(ra0: f64, dec0: f64, sigma: f64) -> Result<CircularGaussianModel> {
    let mut params = GaussianParams::new()?;
    params.ra0.set_value(ra0)?;
    params.dec0.set_value(dec0)?;
    params.sigma.parameter_mut().set_value(sigma)?;
    Ok(CircularGaussianModel::with_params(params))
}

/// Create an elliptical Gaussian model
///
/// # Arguments
///
/// * `ra0` - Right ascension of the centre, degrees
/// * `dec0` - Declination of the centre, degrees
/// * `sigma` - Semi-major axis scale, degrees
/// * `eccentricity` - Eccentricity in `[0, 1)`
/// * `angle` - Rotation of the major axis, degrees
///
/// # Returns
///
/// * An elliptical Gaussian model, or an error if a value is outside its bounds
pub fn elliptical_gaussian_model(
    ra0: f64,
    dec0: f64,
    sigma: f64,
    eccentricity: f64,
    angle: f64,
) -> Result<EllipticalGaussianModel> {
    let mut params = EllipticalGaussianParams::new()?;
    params.ra0.set_value(ra0)?;
    params.dec0.set_value(dec0)?;
    params.sigma.parameter_mut().set_value(sigma)?;
    params.eccentricity.parameter_mut().set_value(eccentricity)?;
    params.angle.parameter_mut().set_value(angle)?;
    Ok(EllipticalGaussianModel::with_params(params))
}
