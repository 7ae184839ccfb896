//! Two-dimensional normal distribution helpers.

use nalgebra::{Matrix2, Vector2};
use std::f64::consts::PI;

/// Covariance of an elliptical Gaussian
///
/// `sigma` is the semi-major scale, `eccentricity` shrinks the minor axis to
/// `sigma * sqrt(1 - e^2)`, and `angle` (radians) rotates the major axis
/// counter-clockwise from the x axis: `R * diag(sigma^2, sigma^2 (1 - e^2)) * R^T`.
pub fn elliptical_covariance(sigma: f64, eccentricity: f64, angle: f64) -> Matrix2<f64> {
    let major = sigma * sigma;
    let minor = major * (1.0 - eccentricity * eccentricity);
    let (sin, cos) = angle.sin_cos();

    let rotation = Matrix2::new(cos, -sin, sin, cos);
    let principal = Matrix2::new(major, 0.0, 0.0, minor);
    rotation * principal * rotation.transpose()
}

/// Density of a bivariate normal distribution at `point`
///
/// Returns `None` when `covariance` is not positive definite.
pub fn bivariate_normal_pdf(
    point: &Vector2<f64>,
    mean: &Vector2<f64>,
    covariance: &Matrix2<f64>,
) -> Option<f64> {
    let det = covariance.determinant();
    let trace = covariance.trace();
    // Rounding can leave a singular matrix with a tiny positive determinant
    if !(covariance[(0, 0)] > 0.0) || !(det > f64::EPSILON * trace * trace) {
        return None;
    }

    let inverse = covariance.try_inverse()?;
    let diff = point - mean;
    let mahalanobis = diff.dot(&(inverse * diff));

    Some((-0.5 * mahalanobis).exp() / (2.0 * PI * det.sqrt()))
}
