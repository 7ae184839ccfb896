//! Example evaluating extended-source spatial models
//!
//! Builds a circular and an elliptical Gaussian around the Crab position,
//! evaluates both on a small grid, gives the ellipse an energy-dependent
//! width and saves the model as JSON.

use ndarray::Array1;
use skyfit_rs::error::Result;
use skyfit_rs::model::SpatialModel;
use skyfit_rs::models::{elliptical_gaussian_model, gaussian_model, EllipticalGaussianModel};
use skyfit_rs::parameters::{EnergyScaling, ParameterSet};

fn main() -> Result<()> {
    let (ra0, dec0) = (83.63, 22.01);

    let mut circle = gaussian_model(ra0, dec0, 0.2)?;
    let mut ellipse = elliptical_gaussian_model(ra0, dec0, 0.3, 0.8, 35.0)?;

    println!("{}: {}", circle.name(), circle.formula());
    println!("{}: {}", ellipse.name(), ellipse.formula());

    // A one-degree strip along RA through the source
    let ra = Array1::linspace(ra0 - 0.5, ra0 + 0.5, 11);
    let dec = Array1::from_elem(ra.len(), dec0);

    let circle_values = circle.evaluate_grid(ra.view(), dec.view(), 1.0)?;
    let ellipse_values = ellipse.evaluate_grid(ra.view(), dec.view(), 1.0)?;

    println!("\n{:>8} {:>14} {:>14}", "RA", "circular", "elliptical");
    for i in 0..ra.len() {
        println!(
            "{:>8.3} {:>14.6e} {:>14.6e}",
            ra[i], circle_values[i], ellipse_values[i]
        );
    }

    // The source shrinks with energy: sigma(E) = sigma * (E / 1 TeV)^-0.5
    ellipse
        .parameters_mut()
        .get_spatial_mut("sigma")
        .expect("sigma is a spatial parameter")
        .set_scaling(EnergyScaling::PowerLaw {
            pivot: 1.0,
            index: -0.5,
        })?;

    println!("\nPeak density by energy:");
    for energy in [0.5, 1.0, 4.0, 16.0] {
        println!("  E = {:>5.1} TeV: {:.6e}", energy, ellipse.evaluate(ra0, dec0, energy));
    }

    let json = ellipse.to_json()?;
    let restored = EllipticalGaussianModel::from_json(&json)?;
    println!(
        "\nRestored {} with {} parameters; evaluations so far: {}",
        restored.name(),
        restored.parameters().len(),
        ellipse.ncalls()
    );

    Ok(())
}
