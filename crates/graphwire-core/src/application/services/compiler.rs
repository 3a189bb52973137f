//! Graph compiler - main application orchestrator.
//!
//! One compilation pass:
//! 1. Load every entry document and its imports
//! 2. Run extension handlers
//! 3. Flatten `parent` inheritance
//! 4. Wire tagged definitions into their dispatchers
//! 5. Freeze the graph
//!
//! The graph is owned by the pass. On any error it is dropped, so a caller
//! only ever sees a complete [`CompiledGraph`].

use tracing::{info, instrument};

use crate::{
    application::{
        ports::{ExtensionHandler, ResourceLocator},
        services::{
            extensions::ExtensionRegistry,
            loader::{JsonFileLoader, LoadState},
            wiring::TagWiringCompiler,
        },
    },
    domain::{CompiledGraph, DefinitionGraph},
    error::GraphResult,
};

pub struct GraphCompiler {
    loader: JsonFileLoader,
    extensions: ExtensionRegistry,
    wiring: TagWiringCompiler,
}

impl GraphCompiler {
    /// Create a compiler reading documents through `locator`, with the
    /// default import depth and wiring prefix and no extensions.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use graphwire_core::application::{GraphCompiler, ports::*};
    ///
    /// let compiler = GraphCompiler::new(locator); // impl ResourceLocator
    /// let graph = compiler.compile("services.json")?;
    /// ```
    pub fn new(locator: Box<dyn ResourceLocator>) -> Self {
        Self {
            loader: JsonFileLoader::new(locator),
            extensions: ExtensionRegistry::new(),
            wiring: TagWiringCompiler::default(),
        }
    }

    pub fn with_max_import_depth(mut self, depth: usize) -> Self {
        self.loader = self.loader.with_max_depth(depth);
        self
    }

    pub fn with_wiring(mut self, wiring: TagWiringCompiler) -> Self {
        self.wiring = wiring;
        self
    }

    /// Register an extension handler for its namespace.
    pub fn register_extension(&mut self, handler: Box<dyn ExtensionHandler>) -> GraphResult<()> {
        self.extensions.register(handler)
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    pub fn wiring(&self) -> &TagWiringCompiler {
        &self.wiring
    }

    /// Compile one entry document.
    pub fn compile(&self, resource: &str) -> GraphResult<CompiledGraph> {
        self.compile_all(&[resource])
    }

    /// Compile several entry documents into one graph, in order.
    ///
    /// Ids must be unique across all of them.
    #[instrument(skip_all, fields(entries = resources.len()))]
    pub fn compile_all<S: AsRef<str>>(&self, resources: &[S]) -> GraphResult<CompiledGraph> {
        let mut graph = DefinitionGraph::new();
        let mut state = LoadState::new();

        for resource in resources {
            self.loader.load(
                resource.as_ref(),
                None,
                &mut state,
                &mut graph,
                &self.extensions,
            )?;
        }
        info!(
            documents = state.loaded_count(),
            definitions = graph.definitions().count(),
            "Documents loaded"
        );

        self.extensions.process(&mut graph)?;

        let flattened = graph.resolve_inheritance()?;
        info!(flattened, "Inheritance resolved");

        let bindings = self.wiring.process(&mut graph)?;

        let compiled = graph.freeze();
        info!(
            definitions = compiled.len(),
            aliases = compiled.aliases().len(),
            bindings,
            "Compilation completed successfully"
        );
        Ok(compiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::MockResourceLocator;
    use crate::domain::{ErrorKind, Reference, Value};
    use std::path::{Path, PathBuf};

    fn single_file(body: &'static str) -> MockResourceLocator {
        let mut mock = MockResourceLocator::new();
        mock.expect_locate()
            .returning(|resource, _| Ok(Path::new("/conf").join(resource)));
        mock.expect_read().returning(move |_| Ok(body.to_string()));
        mock
    }

    #[test]
    fn compiles_a_single_document() {
        let compiler = GraphCompiler::new(Box::new(single_file(
            r#"{"services": {"a": {"class": "X", "arguments": ["@b"]}, "b": {"class": "Y"}}}"#,
        )));
        let graph = compiler.compile("app.json").unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(
            graph.get("a").unwrap().arguments(),
            &[Value::Reference(Reference::strict("b"))]
        );
        assert_eq!(
            graph.resources().collect::<Vec<_>>(),
            [PathBuf::from("/conf/app.json").as_path()]
        );
    }

    #[test]
    fn inheritance_runs_before_wiring() {
        let compiler = GraphCompiler::new(Box::new(single_file(
            r#"{"services": {
                "common.command_pipeline": {"class": "Pipeline"},
                "base": {"class": "Base", "abstract": true, "public": false},
                "child": {"parent": "base", "public": true,
                          "tags": [{"name": "common.command_filter"}]}
            }}"#,
        )));
        let graph = compiler.compile("app.json").unwrap();
        let child = graph.get("child").unwrap();
        assert_eq!(child.class(), Some("Base"));
        assert_eq!(child.parent(), None);
        assert_eq!(
            graph.get("common.command_pipeline").unwrap().method_calls().len(),
            1
        );
    }

    #[test]
    fn failure_yields_no_graph() {
        let compiler = GraphCompiler::new(Box::new(single_file(
            r#"{"services": {"child": {"parent": "ghost"}}}"#,
        )));
        let err = compiler.compile("app.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Inheritance);
    }
}
