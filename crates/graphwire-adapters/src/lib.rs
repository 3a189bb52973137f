//! Infrastructure adapters for graphwire.
//!
//! This crate implements the ports defined in `graphwire-core::application::ports`.
//! It contains all filesystem access.

pub mod capabilities;
pub mod extensions;
pub mod locator;

// Re-export commonly used adapters
pub use capabilities::{load_capability_manifest, parse_capability_manifest};
pub use extensions::ParametersExtension;
pub use locator::{LocalFileLocator, MemoryLocator};
