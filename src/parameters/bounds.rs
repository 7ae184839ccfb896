//! Parameter bounds
//!
//! Inclusive `[min, max]` intervals attached to every fit parameter. The
//! evaluators never look at them; they are published so that the external
//! optimizer or sampler can honour them.

use serde::{Deserialize, Serialize};
use std::f64::{INFINITY, NEG_INFINITY};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when working with parameter bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    #[error("Invalid bounds: min ({min}) must not exceed max ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Parameter value {value} is outside bounds: [{min}, {max}]")]
    ValueOutsideBounds { value: f64, min: f64, max: f64 },
}

/// Inclusive bounds on a parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum allowed value
    pub min: f64,

    /// Maximum allowed value
    pub max: f64,
}

// JSON has no infinity, so open ends are written as null.
impl Serialize for Bounds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Bounds", 2)?;
        let min = if self.has_lower_bound() { Some(self.min) } else { None };
        let max = if self.has_upper_bound() { Some(self.max) } else { None };
        state.serialize_field("min", &min)?;
        state.serialize_field("max", &max)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct BoundsHelper {
            #[serde(default)]
            min: Option<f64>,

            #[serde(default)]
            max: Option<f64>,
        }

        let helper = BoundsHelper::deserialize(deserializer)?;
        Bounds::new(
            helper.min.unwrap_or(NEG_INFINITY),
            helper.max.unwrap_or(INFINITY),
        )
        .map_err(serde::de::Error::custom)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

impl Bounds {
    /// Create new bounds
    ///
    /// # Arguments
    ///
    /// * `min` - Minimum allowed value
    /// * `max` - Maximum allowed value
    ///
    /// # Returns
    ///
    /// New `Bounds` if `min <= max`, or an error otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use skyfit_rs::parameters::Bounds;
    ///
    /// let bounds = Bounds::new(-90.0, 90.0).unwrap();
    /// assert_eq!(bounds.min, -90.0);
    /// assert_eq!(bounds.max, 90.0);
    /// assert!(Bounds::new(1.0, 0.0).is_err());
    /// ```
    pub fn new(min: f64, max: f64) -> Result<Self, BoundsError> {
        // Written so that a NaN on either side is rejected too
        if !(min <= max) {
            return Err(BoundsError::InvalidBounds { min, max });
        }

        Ok(Self { min, max })
    }

    /// Bounds covering the whole real line
    pub fn unbounded() -> Self {
        Self {
            min: NEG_INFINITY,
            max: INFINITY,
        }
    }

    /// Check if a value lies inside the bounds (both ends included)
    pub fn is_within_bounds(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// `true` if both ends are finite
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn has_lower_bound(&self) -> bool {
        self.min.is_finite()
    }

    pub fn has_upper_bound(&self) -> bool {
        self.max.is_finite()
    }

    /// Clamp a value into the bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Check a value, returning a `ValueOutsideBounds` error if it does not fit
    pub fn check(&self, value: f64) -> Result<(), BoundsError> {
        if self.is_within_bounds(value) {
            Ok(())
        } else {
            Err(BoundsError::ValueOutsideBounds {
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}
