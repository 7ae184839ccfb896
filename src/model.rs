//! Spatial model trait and shared evaluation helpers.
//!
//! A spatial model describes how the flux of an extended source is spread
//! over the sky: a surface-brightness density per unit solid angle, evaluated
//! at a sky position `(RA, Dec)` and an energy. Positions and widths are in
//! degrees; densities are per square degree after the `(180/pi)^2` Jacobian.

use crate::error::{Result, SkyFitError};
use crate::parameters::ParameterSet;
use ndarray::{Array1, ArrayView1};
use std::f64::consts::PI;

/// Smallest density a spatial model returns
///
/// Keeps `ln(density)` finite in downstream log-likelihood evaluations.
pub const DENSITY_FLOOR: f64 = 1e-30;

/// Square degrees per steradian, `(180/pi)^2`
pub const DEG2_PER_SR: f64 = (180.0 / PI) * (180.0 / PI);

/// A closed-form sky-brightness model
///
/// `evaluate` takes `&mut self` because every call bumps the model's call
/// counter. Evaluation itself has no other side effects.
pub trait SpatialModel {
    /// Human-readable model name
    fn name(&self) -> &str;

    /// Display formula (LaTeX), for reporting only
    fn formula(&self) -> &str;

    /// The model's parameters as a name -> parameter mapping
    fn parameters(&self) -> &dyn ParameterSet;

    /// Mutable access for the fitting or sampling engine
    fn parameters_mut(&mut self) -> &mut dyn ParameterSet;

    /// Density at one sky position and energy
    ///
    /// The result is finite and never below [`DENSITY_FLOOR`]. Parameter values are used
    /// as they are, bounds are the optimizer's responsibility.
    fn evaluate(&mut self, ra: f64, dec: f64, energy: f64) -> f64;

    /// Density at many sky positions sharing one energy
    ///
    /// Counts as a single call. Returns `DimensionMismatch` if `ra` and `dec`
    /// differ in length.
    fn evaluate_grid(
        &mut self,
        ra: ArrayView1<'_, f64>,
        dec: ArrayView1<'_, f64>,
        energy: f64,
    ) -> Result<Array1<f64>>;

    /// Number of evaluation calls made so far
    fn ncalls(&self) -> u64;
}

/// Keep a density within `[DENSITY_FLOOR, f64::MAX]`
///
/// NaN maps to the floor. `+inf` appears at the centre of a source whose
/// width squared underflows (sigma below about 1e-153 deg) and maps to
/// `f64::MAX`.
pub(crate) fn floor_density(density: f64) -> f64 {
    density.max(DENSITY_FLOOR).min(f64::MAX)
}

/// Evaluate `density` at every `(ra[i], dec[i])`
pub(crate) fn evaluate_positions<F>(
    ra: ArrayView1<'_, f64>,
    dec: ArrayView1<'_, f64>,
    density: F,
) -> Result<Array1<f64>>
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    if ra.len() != dec.len() {
        return Err(SkyFitError::DimensionMismatch(format!(
            "Expected RA and Dec of the same length, got {} and {}",
            ra.len(),
            dec.len()
        )));
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        let values: Vec<f64> = (0..ra.len())
            .into_par_iter()
            .map(|i| density(ra[i], dec[i]))
            .collect();
        Ok(Array1::from_vec(values))
    }

    #[cfg(not(feature = "parallel"))]
    {
        Ok(ndarray::Zip::from(&ra)
            .and(&dec)
            .map_collect(|&r, &d| density(r, d)))
    }
}
