//! Parameters extension: exposes a namespace's configuration as parameters.
//!
//! With namespace `mailer`, the block `{"transport": "smtp", "port": 25}`
//! sets `mailer.transport` and `mailer.port`. Later blocks override earlier
//! ones key by key. Strings go through the reference grammar.

use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use graphwire_core::{
    application::ports::{ContainerBuilder, ExtensionHandler},
    domain::resolve_value,
    error::GraphResult,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParametersExtension {
    namespace: String,
}

impl ParametersExtension {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }
}

impl ExtensionHandler for ParametersExtension {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn load(
        &self,
        configs: &[Map<String, JsonValue>],
        container: &mut dyn ContainerBuilder,
    ) -> GraphResult<()> {
        for config in configs {
            for (key, value) in config {
                let name = format!("{}.{}", self.namespace, key);
                debug!(parameter = %name, "Extension parameter");
                container.set_parameter(&name, resolve_value(value));
            }
        }
        Ok(())
    }
}
