// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for graphwire.
//!
//! Pure compilation rules: parsing a document, the reference grammar,
//! definition building, the graph arena, inheritance and the capability
//! registry. Loading files, dispatching extensions and running passes are
//! the application layer's job.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: Documents arrive as text, never as paths
//! - **No logging**: Errors carry all the context a caller needs
//! - **Serde only for shape**: `serde_json` decodes, `Serialize` exports
//! - **Closed unions**: References, callables and scalars are enums
//!
pub mod builder;
pub mod capability;
pub mod definition;
pub mod document;
pub mod error;
pub mod graph;
pub mod parameters;
pub mod reference;
pub mod schema;
pub mod value;

pub use builder::{BuiltEntry, build_entry};
pub use capability::{Capability, CapabilityRegistry, ClassDescriptor};
pub use definition::{Alias, Callable, Decoration, Deprecation, MethodCall, ServiceDefinition, Tag};
pub use document::{Document, IMPORTS, PARAMETERS, RESERVED_SECTIONS, SERVICES};
pub use error::{DomainError, ErrorCategory, ErrorKind};
pub use graph::{CompiledGraph, DefinitionGraph, TaggedIds};
pub use parameters::{Parameters, resolve_placeholders};
pub use reference::{Reference, resolve_str, resolve_value};
pub use schema::{DEFINITION_KEYS, check_definition_keys, check_section};
pub use value::{Scalar, Value};
