//! Resource locator adapters.

mod local;
mod memory;

pub use local::LocalFileLocator;
pub use memory::MemoryLocator;

use graphwire_core::{application::ApplicationError, error::GraphResult};

/// Strip a `file://` prefix; reject any other `scheme://` resource.
pub(crate) fn local_resource(resource: &str) -> GraphResult<&str> {
    if let Some(path) = resource.strip_prefix("file://") {
        return Ok(path);
    }
    match resource.split_once("://") {
        Some((scheme, _))
            if !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) =>
        {
            Err(ApplicationError::NotLocal {
                resource: resource.to_string(),
            }
            .into())
        }
        _ => Ok(resource),
    }
}
