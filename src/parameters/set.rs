//! Fixed, named parameter sets
//!
//! Every model declares its parameters as a plain struct built once at
//! construction. [`ParameterSet`] exposes such a struct to the fitting engine
//! as an ordered name -> parameter mapping without letting it add or remove
//! entries.

use crate::parameters::parameter::{Parameter, ParameterError};
use crate::parameters::spatial::SpatialParameter;

/// Read/write access by name to a fixed set of parameters
pub trait ParameterSet {
    /// Parameter names, in declaration order
    fn names(&self) -> &'static [&'static str];

    /// Get a parameter by name
    fn get(&self, name: &str) -> Option<&Parameter>;

    /// Get a mutable parameter by name
    fn get_mut(&mut self, name: &str) -> Option<&mut Parameter>;

    /// Get a mutable energy-dependent parameter by name
    ///
    /// Returns `None` for names that exist but are not energy dependent.
    fn get_spatial_mut(&mut self, _name: &str) -> Option<&mut SpatialParameter> {
        None
    }

    /// Number of parameters in the set
    fn len(&self) -> usize {
        self.names().len()
    }

    fn is_empty(&self) -> bool {
        self.names().is_empty()
    }

    fn contains(&self, name: &str) -> bool {
        self.names().contains(&name)
    }

    /// Iterate over the parameters in declaration order
    fn iter(&self) -> Box<dyn Iterator<Item = &Parameter> + '_> {
        Box::new(self.names().iter().filter_map(move |name| self.get(name)))
    }

    /// Set the value of a parameter by name
    fn set_value(&mut self, name: &str, value: f64) -> Result<(), ParameterError> {
        self.get_mut(name)
            .ok_or_else(|| ParameterError::ParameterNotFound {
                name: name.to_string(),
            })?
            .set_value(value)
    }

    /// `(name, value)` of every free parameter, in declaration order
    fn free_values(&self) -> Vec<(String, f64)> {
        self.iter()
            .filter(|p| p.is_free())
            .map(|p| (p.name().to_string(), p.value()))
            .collect()
    }

    /// Names of the nuisance parameters, in declaration order
    fn nuisance_names(&self) -> Vec<String> {
        self.iter()
            .filter(|p| p.is_nuisance())
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Reset every parameter to its initial value
    fn reset(&mut self) {
        for &name in self.names() {
            if let Some(param) = self.get_mut(name) {
                param.reset();
            }
        }
    }
}
