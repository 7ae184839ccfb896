//! Celestial-sphere geometry
//!
//! All angles in and out of this module are in degrees unless a name says
//! otherwise.

/// Compute angular separation between two sky positions in degrees.
///
/// The result is in `[0, 180]`, symmetric in its arguments, and zero only
/// when the positions coincide.
pub fn angular_separation(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let delta_ra = (ra2 - ra1).to_radians();
    let (sin_dec1, cos_dec1) = dec1.to_radians().sin_cos();
    let (sin_dec2, cos_dec2) = dec2.to_radians().sin_cos();
    let (sin_dra, cos_dra) = delta_ra.sin_cos();

    // Vincenty formula, stable at both small and antipodal separations
    let term1 = (cos_dec2 * sin_dra).powi(2);
    let term2 = (cos_dec1 * sin_dec2 - sin_dec1 * cos_dec2 * cos_dra).powi(2);
    let numerator = (term1 + term2).sqrt();
    let denominator = sin_dec1 * sin_dec2 + cos_dec1 * cos_dec2 * cos_dra;

    numerator.atan2(denominator).to_degrees()
}

/// Position angle of `(ra, dec)` as seen from `(ra0, dec0)`, in radians,
/// measured from north through east.
pub fn position_angle(ra0: f64, dec0: f64, ra: f64, dec: f64) -> f64 {
    let delta_ra = (ra - ra0).to_radians();
    let (sin_dec0, cos_dec0) = dec0.to_radians().sin_cos();
    let (sin_dec, cos_dec) = dec.to_radians().sin_cos();

    let y = delta_ra.sin() * cos_dec;
    let x = cos_dec0 * sin_dec - sin_dec0 * cos_dec * delta_ra.cos();
    y.atan2(x)
}

/// Offset of `(ra, dec)` from `(ra0, dec0)` in the local tangent plane.
///
/// Returns `(x, y)` in degrees with `x` pointing toward increasing RA and `y`
/// toward increasing Dec. The projection is azimuthal equidistant, so
/// `hypot(x, y)` equals [`angular_separation`].
pub fn tangent_plane_offset(ra0: f64, dec0: f64, ra: f64, dec: f64) -> (f64, f64) {
    let distance = angular_separation(ra0, dec0, ra, dec);
    if distance == 0.0 {
        return (0.0, 0.0);
    }

    let (sin_pa, cos_pa) = position_angle(ra0, dec0, ra, dec).sin_cos();
    (distance * sin_pa, distance * cos_pa)
}
