//! Application services - orchestrate the compilation pass.
//!
//! The loader, extension registry and tag wiring pass each own one stage;
//! `GraphCompiler` runs them in order.

pub mod compiler;
pub mod extensions;
pub mod loader;
pub mod wiring;

pub use compiler::GraphCompiler;
pub use extensions::ExtensionRegistry;
pub use loader::{DEFAULT_MAX_IMPORT_DEPTH, JsonFileLoader, LoadState};
pub use wiring::{Binding, DEFAULT_PREFIX, TagWiringCompiler, WIRING_RULES, WiringRule};
