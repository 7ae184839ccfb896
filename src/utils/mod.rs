//! Utility functions shared by the spatial models.
//!
//! - Celestial-sphere geometry (angular separation, tangent-plane offsets)
//! - Bivariate normal density and elliptical covariance construction

pub mod gaussian2d;
pub mod sphere;

pub use gaussian2d::{bivariate_normal_pdf, elliptical_covariance};
pub use sphere::{angular_separation, position_angle, tangent_plane_offset};
