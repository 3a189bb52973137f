//! Schema validator: container shapes and per-definition key allow-list.

use serde_json::{Map, Value as JsonValue};

use crate::domain::error::DomainError;

/// Every key a structured `services` entry may use.
pub const DEFINITION_KEYS: [&str; 21] = [
    "alias",
    "parent",
    "class",
    "shared",
    "synthetic",
    "lazy",
    "public",
    "abstract",
    "deprecated",
    "factory",
    "file",
    "arguments",
    "properties",
    "configurator",
    "calls",
    "tags",
    "decorates",
    "decoration_inner_name",
    "decoration_priority",
    "autowire",
    "autowiring_types",
];

/// Container type a top-level section must decode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionShape {
    Object,
    Sequence,
}

impl SectionShape {
    pub fn of(section: &str) -> Option<Self> {
        match section {
            "parameters" | "services" => Some(Self::Object),
            "imports" => Some(Self::Sequence),
            _ => None,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Object => "an object",
            Self::Sequence => "an array",
        }
    }

    fn accepts(self, value: &JsonValue) -> bool {
        match self {
            Self::Object => value.is_object(),
            Self::Sequence => value.is_array(),
        }
    }
}

/// Check that a reserved section holds the expected container type.
pub fn check_section(section: &str, value: &JsonValue, file: &str) -> Result<(), DomainError> {
    match SectionShape::of(section) {
        Some(shape) if !shape.accepts(value) => Err(DomainError::InvalidSection {
            section: section.to_string(),
            expected: shape.describe(),
            file: file.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Reject any key outside [`DEFINITION_KEYS`].
pub fn check_definition_keys(
    id: &str,
    entry: &Map<String, JsonValue>,
    file: &str,
) -> Result<(), DomainError> {
    match entry.keys().find(|k| !DEFINITION_KEYS.contains(&k.as_str())) {
        Some(key) => Err(DomainError::UnsupportedKey {
            key: key.clone(),
            id: id.to_string(),
            file: file.to_string(),
            allowed: DEFINITION_KEYS.join("\", \""),
        }),
        None => Ok(()),
    }
}
