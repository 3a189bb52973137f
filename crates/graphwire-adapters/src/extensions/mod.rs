//! Extension handler adapters.

mod parameters;

pub use parameters::ParametersExtension;
