//! Per-bin comparison of data and model around a point source.
//!
//! Produces the numbers behind the count-spectrum and residual panels of a
//! diagnostic figure. Drawing the figure is left to the caller.

use crate::error::{Result, SkyFitError};
use serde::{Deserialize, Serialize};

/// Counts and residuals in a top-hat around one source, per analysis bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDiagnostics {
    pub ra: f64,
    pub dec: f64,
    pub radius: f64,
    pub channels: Vec<u32>,
    /// Model-predicted excess
    pub model: Vec<f64>,
    /// Observed excess
    pub signal: Vec<f64>,
    pub background: Vec<f64>,
    /// Observed counts, `signal + background`
    pub total: Vec<f64>,
    pub model_plus_background: Vec<f64>,
    /// `(signal - model) / model`
    pub residuals: Vec<f64>,
    /// `sqrt(total) / model`; model variance keeps low-count bins usable
    pub residual_errors: Vec<f64>,
}

impl ChannelDiagnostics {
    /// Combine per-bin model, signal and background counts
    ///
    /// All three slices must have one entry per channel in
    /// `min_channel..=max_channel`.
    pub fn from_counts(
        (ra, dec, radius): (f64, f64, f64),
        min_channel: u32,
        max_channel: u32,
        model: Vec<f64>,
        signal: Vec<f64>,
        background: Vec<f64>,
    ) -> Result<Self> {
        let channels: Vec<u32> = (min_channel..=max_channel).collect();
        for (label, len) in [
            ("model", model.len()),
            ("signal", signal.len()),
            ("background", background.len()),
        ] {
            if len != channels.len() {
                return Err(SkyFitError::DimensionMismatch(format!(
                    "Expected {} {} values for channels {}..={}, got {}",
                    channels.len(),
                    label,
                    min_channel,
                    max_channel,
                    len
                )));
            }
        }

        let total: Vec<f64> = signal.iter().zip(&background).map(|(s, b)| s + b).collect();
        let model_plus_background = model.iter().zip(&background).map(|(m, b)| m + b).collect();
        let residuals = signal.iter().zip(&model).map(|(s, m)| (s - m) / m).collect();
        let residual_errors = total.iter().zip(&model).map(|(t, m)| t.sqrt() / m).collect();

        Ok(Self {
            ra,
            dec,
            radius,
            channels,
            model,
            signal,
            background,
            total,
            model_plus_background,
            residuals,
            residual_errors,
        })
    }

    /// Chi-square-like summary of the residuals, skipping bins where it is undefined
    pub fn residual_chi2(&self) -> f64 {
        self.residuals
            .iter()
            .zip(&self.residual_errors)
            .filter(|(r, e)| r.is_finite() && e.is_finite() && **e > 0.0)
            .map(|(r, e)| (r / e).powi(2))
            .sum()
    }
}
