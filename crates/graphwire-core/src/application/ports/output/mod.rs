//! Driven (output) ports.
//!
//! These traits define what the application needs from its collaborators.
//! The `graphwire-adapters` crate provides locator and extension
//! implementations; the graph arena implements [`ContainerBuilder`] here.

use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};

use crate::domain::{
    Alias, DefinitionGraph, MethodCall, Parameters, ServiceDefinition, TaggedIds, Value,
};
use crate::error::GraphResult;

/// Port for finding and reading import resources.
///
/// Implemented by:
/// - `graphwire_adapters::locator::LocalFileLocator` (production)
/// - `graphwire_adapters::locator::MemoryLocator` (testing)
///
/// ## Design Notes
///
/// - `locate` returns a canonical path, so the same file reached through
///   different relative paths compares equal
/// - Errors are import errors; the loader decides whether to ignore them
#[cfg_attr(test, mockall::automock)]
pub trait ResourceLocator: Send + Sync {
    /// Resolve `resource` relative to `current_dir` (the importing
    /// document's directory), or to the locator's own roots when `None`.
    fn locate<'a>(&self, resource: &str, current_dir: Option<&'a Path>) -> GraphResult<PathBuf>;

    /// Read a located resource.
    fn read(&self, path: &Path) -> GraphResult<String>;
}

/// Port for one extension namespace.
///
/// Implemented by:
/// - `graphwire_adapters::extensions::ParametersExtension`
/// - any host-provided handler
pub trait ExtensionHandler: Send + Sync {
    /// Top-level document key this handler consumes.
    fn namespace(&self) -> &str;

    /// Called once per compilation with every block written under
    /// [`ExtensionHandler::namespace`], in load order.
    fn load(
        &self,
        configs: &[Map<String, JsonValue>],
        container: &mut dyn ContainerBuilder,
    ) -> GraphResult<()>;
}

/// Port for writing into the graph under construction.
///
/// Implemented by:
/// - [`DefinitionGraph`]
pub trait ContainerBuilder {
    fn set_parameter(&mut self, name: &str, value: Value);

    fn parameter(&self, name: &str) -> Option<&Value>;

    fn parameters(&self) -> &Parameters;

    /// True if `id` names a definition or an alias.
    fn has(&self, id: &str) -> bool;

    fn set_definition(&mut self, id: &str, definition: ServiceDefinition);

    fn set_alias(&mut self, id: &str, alias: Alias);

    fn definition(&self, id: &str) -> Option<&ServiceDefinition>;

    /// Follow aliases to the id they finally point at.
    fn resolve_alias<'a>(&'a self, id: &'a str) -> &'a str;

    /// Append a deferred call to the definition named by `id`.
    fn add_method_call(&mut self, id: &str, call: MethodCall) -> GraphResult<()>;

    fn find_tagged_service_ids(&self, tag: &str) -> TaggedIds;

    /// Queue a configuration block for an extension namespace.
    fn load_from_extension(&mut self, namespace: &str, config: Map<String, JsonValue>);

    fn extension_configs(&self, namespace: &str) -> &[Map<String, JsonValue>];

    /// Record a document the graph was built from.
    fn add_resource(&mut self, path: PathBuf);
}

impl ContainerBuilder for DefinitionGraph {
    fn set_parameter(&mut self, name: &str, value: Value) {
        DefinitionGraph::set_parameter(self, name, value);
    }

    fn parameter(&self, name: &str) -> Option<&Value> {
        DefinitionGraph::parameter(self, name)
    }

    fn parameters(&self) -> &Parameters {
        DefinitionGraph::parameters(self)
    }

    fn has(&self, id: &str) -> bool {
        DefinitionGraph::has(self, id)
    }

    fn set_definition(&mut self, id: &str, definition: ServiceDefinition) {
        DefinitionGraph::set_definition(self, id, definition);
    }

    fn set_alias(&mut self, id: &str, alias: Alias) {
        DefinitionGraph::set_alias(self, id, alias);
    }

    fn definition(&self, id: &str) -> Option<&ServiceDefinition> {
        DefinitionGraph::definition(self, id)
    }

    fn resolve_alias<'a>(&'a self, id: &'a str) -> &'a str {
        DefinitionGraph::resolve_alias(self, id)
    }

    fn add_method_call(&mut self, id: &str, call: MethodCall) -> GraphResult<()> {
        Ok(DefinitionGraph::add_method_call(self, id, call)?)
    }

    fn find_tagged_service_ids(&self, tag: &str) -> TaggedIds {
        DefinitionGraph::find_tagged_service_ids(self, tag)
    }

    fn load_from_extension(&mut self, namespace: &str, config: Map<String, JsonValue>) {
        DefinitionGraph::load_from_extension(self, namespace, config);
    }

    fn extension_configs(&self, namespace: &str) -> &[Map<String, JsonValue>] {
        DefinitionGraph::extension_configs(self, namespace)
    }

    fn add_resource(&mut self, path: PathBuf) {
        DefinitionGraph::add_resource(self, path);
    }
}
