//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `graphwire-adapters` implement
//! the driven ones.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented elsewhere
//!   - `ResourceLocator`: Finding and reading import resources
//!   - `ExtensionHandler`: Consuming one extension namespace
//!   - `ContainerBuilder`: Writing into the graph under construction
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (The CLI drives `GraphCompiler` directly)

pub mod output;

pub use output::{ContainerBuilder, ExtensionHandler, ResourceLocator};
