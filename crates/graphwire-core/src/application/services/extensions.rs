//! Extension registry: namespace to handler.
//!
//! The loader asks the registry whether a top-level key is known; after
//! loading, [`ExtensionRegistry::process`] hands each handler every block
//! queued for its namespace.

use indexmap::IndexMap;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{ContainerBuilder, ExtensionHandler},
    },
    error::GraphResult,
};

#[derive(Default)]
pub struct ExtensionRegistry {
    handlers: IndexMap<String, Box<dyn ExtensionHandler>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. A namespace can only be claimed once.
    pub fn register(&mut self, handler: Box<dyn ExtensionHandler>) -> GraphResult<()> {
        let namespace = handler.namespace().to_string();
        if self.handlers.contains_key(&namespace) {
            return Err(ApplicationError::DuplicateExtension { namespace }.into());
        }
        debug!(namespace = %namespace, "Registered extension");
        self.handlers.insert(namespace, handler);
        Ok(())
    }

    pub fn has(&self, namespace: &str) -> bool {
        self.handlers.contains_key(namespace)
    }

    /// Registered namespaces, in registration order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run every handler that received at least one block. Returns how many
    /// handlers ran.
    #[instrument(skip_all)]
    pub fn process(&self, container: &mut dyn ContainerBuilder) -> GraphResult<usize> {
        let mut ran = 0;
        for (namespace, handler) in &self.handlers {
            let configs = container.extension_configs(namespace).to_vec();
            if configs.is_empty() {
                continue;
            }
            debug!(namespace = %namespace, blocks = configs.len(), "Loading extension");
            handler.load(&configs, container)?;
            ran += 1;
        }
        if ran > 0 {
            info!(extensions = ran, "Extensions processed");
        }
        Ok(ran)
    }
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.handlers.keys()).finish()
    }
}
