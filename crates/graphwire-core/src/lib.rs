//! Domain and application layers of the graphwire service-definition
//! compiler. JSON documents describing a graph of services go in; a
//! validated, inheritance-flattened, tag-wired [`domain::CompiledGraph`]
//! comes out.
//!
//! ## Layers
//!
//! ```text
//! graphwire-cli ──drives──▶ application::GraphCompiler
//!                              │ loader → extensions → inheritance → wiring
//!                              ▼
//!                      application::ports ◀──implements── graphwire-adapters
//!                              │                           (locators, manifest,
//!                              ▼                            parameters extension)
//!                           domain (documents, references, definitions, graph)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use graphwire_core::prelude::*;
//!
//! let mut compiler = GraphCompiler::new(Box::new(locator));
//! compiler.register_extension(Box::new(handler))?;
//!
//! let graph = compiler.compile("config/services.json")?;
//! let mailer = graph.get("mailer")?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

/// Everything a host needs to run a compilation.
pub mod prelude {
    pub use crate::application::{
        ExtensionRegistry, GraphCompiler, TagWiringCompiler,
        ports::{ContainerBuilder, ExtensionHandler, ResourceLocator},
    };
    pub use crate::domain::{
        Alias, Capability, CapabilityRegistry, ClassDescriptor, CompiledGraph, DefinitionGraph,
        MethodCall, Reference, Scalar, ServiceDefinition, Tag, Value,
    };
    pub use crate::error::{GraphError, GraphResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
