//! JSON file loader: documents in, definitions, parameters and extension
//! blocks out.
//!
//! For each document, in this order:
//! 1. Shape-check reserved sections, reject unknown extension namespaces
//! 2. Load imports (recursively, relative to the document's directory)
//! 3. Set parameters
//! 4. Queue extension blocks
//! 5. Build and register services

use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{ContainerBuilder, ResourceLocator},
        services::extensions::ExtensionRegistry,
    },
    domain::{
        BuiltEntry, Document, DomainError, ErrorKind, RESERVED_SECTIONS, build_entry,
        check_section, resolve_value,
    },
    error::GraphResult,
};

/// Default bound on import nesting.
pub const DEFAULT_MAX_IMPORT_DEPTH: usize = 32;

/// Bookkeeping for one compilation pass.
#[derive(Debug, Default)]
pub struct LoadState {
    /// Documents currently being loaded, outermost first.
    in_progress: Vec<PathBuf>,
    /// Documents already merged into the graph.
    loaded: HashSet<PathBuf>,
}

impl LoadState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

/// Loads JSON service files through a [`ResourceLocator`].
pub struct JsonFileLoader {
    locator: Box<dyn ResourceLocator>,
    max_depth: usize,
}

impl JsonFileLoader {
    pub fn new(locator: Box<dyn ResourceLocator>) -> Self {
        Self {
            locator,
            max_depth: DEFAULT_MAX_IMPORT_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Load `resource` and everything it imports into `container`.
    ///
    /// `current_dir` is the directory relative resources resolve against;
    /// `None` lets the locator use its own roots.
    #[instrument(skip_all, fields(resource = %resource))]
    pub fn load(
        &self,
        resource: &str,
        current_dir: Option<&Path>,
        state: &mut LoadState,
        container: &mut dyn ContainerBuilder,
        extensions: &ExtensionRegistry,
    ) -> GraphResult<()> {
        let path = self.locator.locate(resource, current_dir)?;

        if state.in_progress.contains(&path) {
            let chain = state
                .in_progress
                .iter()
                .chain(std::iter::once(&path))
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(ApplicationError::ImportCycle { chain }.into());
        }
        if state.in_progress.len() >= self.max_depth {
            return Err(ApplicationError::ImportDepthExceeded {
                resource: resource.to_string(),
                limit: self.max_depth,
            }
            .into());
        }
        if state.loaded.contains(&path) {
            debug!(path = %path.display(), "Already loaded, skipping");
            return Ok(());
        }

        let text = self.locator.read(&path)?;
        container.add_resource(path.clone());

        let file = path.display().to_string();
        let Some(document) = Document::parse(&text, file)? else {
            debug!(path = %path.display(), "Empty document");
            state.loaded.insert(path);
            return Ok(());
        };

        state.in_progress.push(path.clone());
        let result = self.load_document(&document, path.parent(), state, container, extensions);
        state.in_progress.pop();
        state.loaded.insert(path);
        result
    }

    fn load_document(
        &self,
        document: &Document,
        dir: Option<&Path>,
        state: &mut LoadState,
        container: &mut dyn ContainerBuilder,
        extensions: &ExtensionRegistry,
    ) -> GraphResult<()> {
        let file = document.file();

        for section in RESERVED_SECTIONS {
            if let Some(value) = document.section(section) {
                check_section(section, value, file)?;
            }
        }
        for (namespace, _) in document.extensions() {
            if !extensions.has(namespace) {
                return Err(
                    ApplicationError::unknown_extension(namespace, file, extensions.namespaces())
                        .into(),
                );
            }
        }

        self.load_imports(document, dir, state, container, extensions)?;

        if let Some(JsonValue::Object(parameters)) = document.parameters() {
            for (name, value) in parameters {
                container.set_parameter(name, resolve_value(value));
            }
        }

        for (namespace, value) in document.extensions() {
            let config = value.as_object().cloned().unwrap_or_default();
            container.load_from_extension(namespace, config);
        }

        if let Some(JsonValue::Object(services)) = document.services() {
            for (id, entry) in services {
                if container.has(id) {
                    return Err(DomainError::DuplicateId {
                        id: id.clone(),
                        file: file.to_string(),
                    }
                    .into());
                }
                match build_entry(id, entry, file)? {
                    BuiltEntry::Definition(definition) => {
                        debug!(id = %id, class = ?definition.class(), "Definition");
                        container.set_definition(id, definition);
                    }
                    BuiltEntry::Alias(alias) => {
                        debug!(id = %id, target = %alias.target, "Alias");
                        container.set_alias(id, alias);
                    }
                }
            }
        }

        Ok(())
    }

    fn load_imports(
        &self,
        document: &Document,
        dir: Option<&Path>,
        state: &mut LoadState,
        container: &mut dyn ContainerBuilder,
        extensions: &ExtensionRegistry,
    ) -> GraphResult<()> {
        let Some(JsonValue::Array(imports)) = document.imports() else {
            return Ok(());
        };
        let file = document.file();

        for import in imports {
            let Some(import) = import.as_object() else {
                return Err(invalid_import(file, "each entry of \"imports\" must be an object"));
            };
            let Some(resource) = import.get("resource").and_then(JsonValue::as_str) else {
                return Err(invalid_import(
                    file,
                    "an import needs a \"resource\" key holding a string",
                ));
            };
            let ignore_errors = match import.get("ignore_errors") {
                None | Some(JsonValue::Null) => false,
                Some(JsonValue::Bool(b)) => *b,
                Some(_) => {
                    return Err(invalid_import(file, "\"ignore_errors\" must be a boolean"));
                }
            };

            debug!(from = %file, resource = %resource, "Import");
            match self.load(resource, dir, state, container, extensions) {
                Err(e) if ignore_errors && e.kind() == ErrorKind::Import => {
                    warn!(from = %file, resource = %resource, error = %e, "Ignoring failed import");
                }
                other => other?,
            }
        }
        Ok(())
    }
}

fn invalid_import(file: &str, reason: &str) -> crate::error::GraphError {
    DomainError::InvalidImport {
        file: file.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
