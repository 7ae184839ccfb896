//! Tests for the elliptical Gaussian spatial model

use approx::assert_relative_eq;
use ndarray::array;
use skyfit_rs::model::{SpatialModel, DEG2_PER_SR, DENSITY_FLOOR};
use skyfit_rs::models::{elliptical_gaussian_model, gaussian_model, EllipticalGaussianModel};
use skyfit_rs::parameters::{EnergyScaling, ParameterSet};
use std::f64::consts::PI;

#[test]
fn test_reduces_to_circular() {
    let mut ellipse = elliptical_gaussian_model(83.63, 22.01, 0.4, 0.0, 0.0).unwrap();
    let mut circle = gaussian_model(83.63, 22.01, 0.4).unwrap();

    for &(ra, dec) in &[(83.63, 22.01), (84.1, 22.01), (83.63, 21.2), (82.9, 22.6)] {
        assert_relative_eq!(
            ellipse.evaluate(ra, dec, 1.0),
            circle.evaluate(ra, dec, 1.0),
            max_relative = 1e-10
        );
    }
}

#[test]
fn test_axis_lengths() {
    // Unrotated: major axis along RA with sigma, minor along Dec with sigma * sqrt(1 - e^2)
    let sigma: f64 = 1.0;
    let e: f64 = 0.8;
    let minor = sigma * (1.0 - e * e).sqrt();
    let mut model = elliptical_gaussian_model(180.0, 0.0, sigma, e, 0.0).unwrap();

    let peak = model.evaluate(180.0, 0.0, 1.0);
    let at_major_sigma = model.evaluate(180.0 + sigma, 0.0, 1.0);
    let at_minor_sigma = model.evaluate(180.0, minor, 1.0);

    assert_relative_eq!(peak, DEG2_PER_SR / (2.0 * PI * sigma * minor), max_relative = 1e-12);
    assert_relative_eq!(at_major_sigma / peak, (-0.5f64).exp(), max_relative = 1e-9);
    assert_relative_eq!(at_minor_sigma / peak, (-0.5f64).exp(), max_relative = 1e-9);
}

#[test]
fn test_rotation_by_half_turn_is_identity() {
    let mut a = elliptical_gaussian_model(180.0, 0.0, 0.5, 0.6, 20.0).unwrap();
    let mut b = elliptical_gaussian_model(180.0, 0.0, 0.5, 0.6, 160.0).unwrap();
    let mut c = elliptical_gaussian_model(180.0, 0.0, 0.5, 0.6, 0.0).unwrap();
    c.parameters_mut().set_value("angle", 180.0).unwrap();
    let mut d = elliptical_gaussian_model(180.0, 0.0, 0.5, 0.6, 0.0).unwrap();

    // 20 and 160 degrees mirror each other across the RA axis
    assert_relative_eq!(
        a.evaluate(180.3, 0.2, 1.0),
        b.evaluate(180.3, -0.2, 1.0),
        max_relative = 1e-9
    );
    assert_relative_eq!(
        c.evaluate(180.3, 0.2, 1.0),
        d.evaluate(180.3, 0.2, 1.0),
        max_relative = 1e-9
    );
}

#[test]
fn test_energy_dependent_angle() {
    let mut model = elliptical_gaussian_model(180.0, 0.0, 1.0, 0.9, 45.0).unwrap();
    model
        .parameters_mut()
        .get_spatial_mut("angle")
        .unwrap()
        .set_scaling(EnergyScaling::PowerLaw {
            pivot: 1.0,
            index: 1.0,
        })
        .unwrap();

    // At twice the pivot energy the major axis is along Dec
    let along_ra = model.evaluate(180.5, 0.0, 2.0);
    let along_dec = model.evaluate(180.0, 0.5, 2.0);
    assert!(along_dec > along_ra);
}

#[test]
fn test_degenerate_shape_returns_floor() {
    let mut model = elliptical_gaussian_model(180.0, 0.0, 1.0, 1.0, 30.0).unwrap();
    assert_eq!(model.evaluate(180.0, 0.0, 1.0), DENSITY_FLOOR);

    let mut model = elliptical_gaussian_model(180.0, 0.0, 0.0, 0.5, 30.0).unwrap();
    assert_eq!(model.evaluate(180.1, 0.0, 1.0), DENSITY_FLOOR);
}

#[test]
fn test_grid_evaluation() {
    let mut model = elliptical_gaussian_model(120.0, -45.0, 0.3, 0.5, 60.0).unwrap();
    let ra = array![120.0, 120.2, 119.7];
    let dec = array![-45.0, -44.9, -45.3];

    let grid = model.evaluate_grid(ra.view(), dec.view(), 3.0).unwrap();
    assert_eq!(grid.len(), 3);
    assert_eq!(model.ncalls(), 1);
    for i in 0..3 {
        assert_eq!(grid[i], model.evaluate(ra[i], dec[i], 3.0));
    }
}

#[test]
fn test_display_strings() {
    let model = EllipticalGaussianModel::new().unwrap();
    assert_eq!(model.name(), "Multivariate Gaussian");
    assert!(model.formula().contains(r"\Sigma"));
}

#[test]
fn test_from_json_rejects_invalid_parameters() {
    let json = elliptical_gaussian_model(120.0, -45.0, 0.3, 0.5, 60.0)
        .unwrap()
        .to_json()
        .unwrap();

    let too_eccentric = json.replace("\"value\": 0.5", "\"value\": 1.5");
    assert_ne!(too_eccentric, json);
    assert!(EllipticalGaussianModel::from_json(&too_eccentric).is_err());
}
