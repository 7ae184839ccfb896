//! # skyfit-rs
//!
//! `skyfit-rs` is a plugin layer for multi-mission astrophysical likelihood
//! fitting.
//!
//! The library provides:
//! - Closed-form spatial models for extended sources (circular and elliptical
//!   Gaussians on the sky) with energy-dependent parameters
//! - A bounded, named parameter system shared by models and plugins
//! - A likelihood plugin bridging a source model to a gamma-ray observatory's
//!   native analysis library
//!
//! ## Basic Usage
//!
//! ```
//! use skyfit_rs::model::SpatialModel;
//! use skyfit_rs::models::gaussian_model;
//!
//! let mut source = gaussian_model(83.63, 22.01, 0.2).unwrap();
//! let peak = source.evaluate(83.63, 22.01, 1.0);
//! let wing = source.evaluate(84.0, 22.01, 1.0);
//! assert!(peak > wing);
//! ```

// Public modules
pub mod error;

// Parameter system
pub mod parameters;

pub mod utils;

pub mod model;

pub mod models;

pub mod plugin;

// Re-exports for convenience
pub use error::{Result, SkyFitError};
pub use model::{SpatialModel, DENSITY_FLOOR};
pub use models::{CircularGaussianModel, EllipticalGaussianModel};
pub use plugin::{LikelihoodPlugin, ObservatoryLike};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
