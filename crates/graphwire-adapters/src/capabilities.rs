//! Capability manifest loader.
//!
//! Reads the JSON manifest that declares which classes play which dispatch
//! roles, and turns it into a [`CapabilityRegistry`] for tag wiring.
//!
//! # Manifest format
//!
//! ```json
//! {
//!   "classes": {
//!     "App\\Handler\\RegisterUserHandler": ["command_handler"],
//!     "App\\Listener\\Mailer": ["event_subscriber", "query_handler"]
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, instrument};

use graphwire_core::{
    domain::{Capability, CapabilityRegistry, ClassDescriptor},
    error::{GraphError, GraphResult},
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default)]
    classes: IndexMap<String, Vec<String>>,
}

/// Read and parse a manifest file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_capability_manifest(path: &Path) -> GraphResult<CapabilityRegistry> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        GraphError::configuration(format!(
            "capability manifest {} cannot be read: {e}",
            path.display()
        ))
    })?;
    parse_capability_manifest(&text, &path.display().to_string())
}

/// Parse manifest text, attributing errors to `source`.
pub fn parse_capability_manifest(text: &str, source: &str) -> GraphResult<CapabilityRegistry> {
    let manifest: Manifest = serde_json::from_str(text).map_err(|e| {
        GraphError::configuration(format!("capability manifest {source} is malformed: {e}"))
    })?;

    let mut registry = CapabilityRegistry::new();
    for (class, names) in manifest.classes {
        let mut descriptor = ClassDescriptor::new(class);
        for name in &names {
            descriptor = descriptor.with(name.parse::<Capability>()?);
        }
        registry.register(descriptor);
    }
    debug!(classes = registry.len(), "Capability manifest loaded");
    Ok(registry)
}
