//! Application layer for graphwire.
//!
//! This layer contains:
//! - **Services**: The compilation pass (loader, extensions, wiring, compiler)
//! - **Ports**: Interface definitions (traits) for collaborators
//! - **Errors**: Orchestration error types
//!
//! The application layer coordinates the domain layer but contains no
//! compilation rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    DEFAULT_MAX_IMPORT_DEPTH, DEFAULT_PREFIX, ExtensionRegistry, GraphCompiler, JsonFileLoader,
    LoadState, TagWiringCompiler,
};

// Re-export port traits (for adapter implementation)
pub use ports::{ContainerBuilder, ExtensionHandler, ResourceLocator};

pub use error::ApplicationError;
