//! # Parameter System
//!
//! Named, bounded fit parameters for spatial models and likelihood plugins.
//!
//! ## Core Components
//!
//! - [`Bounds`]: inclusive `[min, max]` limits published to the optimizer
//! - [`Parameter`]: value, bounds, step size, fixed and nuisance flags
//! - [`SpatialParameter`] and [`EnergyScaling`]: parameters whose effective
//!   value depends on energy, resolved with [`resolve`]
//! - [`ParameterSet`]: fixed name -> parameter mapping implemented by every model
//!
//! ## Example Usage
//!
//! ```rust
//! use skyfit_rs::parameters::{resolve, EnergyScaling, Parameter, SpatialParameter};
//!
//! let dec0 = Parameter::new("Dec0", 22.0, -90.0, 90.0, 0.1).unwrap();
//! assert_eq!(dec0.value(), 22.0);
//!
//! let sigma = SpatialParameter::new("sigma", 0.2, 0.0, 20.0, 0.01)
//!     .unwrap()
//!     .with_scaling(EnergyScaling::PowerLaw { pivot: 10.0, index: -0.5 })
//!     .unwrap();
//! let sigma_at_40 = resolve(&sigma, 40.0);
//! assert!((sigma_at_40 - 0.1).abs() < 1e-12);
//! ```

pub mod bounds;
pub mod parameter;
pub mod set;
pub mod spatial;

// Re-export key types
pub use bounds::{Bounds, BoundsError};
pub use parameter::{Parameter, ParameterError};
pub use set::ParameterSet;
pub use spatial::{resolve, EnergyScaling, SpatialParameter};
