//! Document parser: raw text to an ordered map of top-level sections.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::domain::error::DomainError;

pub const IMPORTS: &str = "imports";
pub const PARAMETERS: &str = "parameters";
pub const SERVICES: &str = "services";

/// Top-level keys handled by the loader itself; every other key is an
/// extension namespace.
pub const RESERVED_SECTIONS: [&str; 3] = [IMPORTS, PARAMETERS, SERVICES];

/// One decoded service file.
///
/// Sections keep the order they were written in. A document is never
/// mutated after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    file: String,
    sections: IndexMap<String, JsonValue>,
}

impl Document {
    /// Parse `input`, attributing errors to `file`.
    ///
    /// Returns `Ok(None)` for an empty document (blank input or a bare JSON
    /// `null`): that is not an error and loads nothing.
    pub fn parse(input: &str, file: impl Into<String>) -> Result<Option<Self>, DomainError> {
        let file = file.into();
        if input.trim().is_empty() {
            return Ok(None);
        }

        let decoded: JsonValue =
            serde_json::from_str(input).map_err(|e| DomainError::Parse {
                file: file.clone(),
                reason: e.to_string(),
            })?;

        match decoded {
            JsonValue::Null => Ok(None),
            JsonValue::Object(map) => Ok(Some(Self {
                file,
                sections: map.into_iter().collect(),
            })),
            _ => Err(DomainError::InvalidDocument { file }),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn section(&self, name: &str) -> Option<&JsonValue> {
        self.sections.get(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn imports(&self) -> Option<&JsonValue> {
        self.section(IMPORTS)
    }

    pub fn parameters(&self) -> Option<&JsonValue> {
        self.section(PARAMETERS)
    }

    pub fn services(&self) -> Option<&JsonValue> {
        self.section(SERVICES)
    }

    /// Non-reserved sections, in document order.
    pub fn extensions(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.sections()
            .filter(|(name, _)| !RESERVED_SECTIONS.contains(name))
    }
}
