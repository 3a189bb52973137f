//! Reference grammar: turns sigil-prefixed strings into typed references.
//!
//! | Prefix   | Result                                   |
//! |----------|------------------------------------------|
//! | `@=expr` | [`Reference::Expression`], source as-is  |
//! | `@@id`   | [`Reference::Literal`], one `@` stripped |
//! | `@?id`   | [`Reference::Optional`]                  |
//! | `@id`    | [`Reference::Strict`]                    |
//! | other    | plain string, unchanged                  |
//!
//! Prefixes are tested in the order above. A trailing `=` is removed after
//! the prefix; on an optional or strict reference it marks the reference
//! non-strict.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

use crate::domain::value::{Value, number_to_scalar};

/// A string interpreted through the reference grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reference {
    /// Must resolve, or the host fails.
    Strict { id: String, strict: bool },
    /// Resolves to null when the target is missing.
    Optional { id: String, strict: bool },
    /// Inline expression evaluated later by the host.
    Expression { source: String },
    /// Escaped at-sign; the text is used verbatim.
    Literal { value: String },
}

impl Reference {
    pub fn strict(id: impl Into<String>) -> Self {
        Self::Strict {
            id: id.into(),
            strict: true,
        }
    }

    pub fn optional(id: impl Into<String>) -> Self {
        Self::Optional {
            id: id.into(),
            strict: true,
        }
    }

    pub fn expression(source: impl Into<String>) -> Self {
        Self::Expression {
            source: source.into(),
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    /// Mark a service reference non-strict. Expressions and literals carry
    /// no strictness and are returned unchanged.
    pub fn non_strict(self) -> Self {
        match self {
            Self::Strict { id, .. } => Self::Strict { id, strict: false },
            Self::Optional { id, .. } => Self::Optional { id, strict: false },
            other => other,
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(
            self,
            Self::Strict { strict: true, .. } | Self::Optional { strict: true, .. }
        )
    }
}

impl fmt::Display for Reference {
    /// Renders the reference back in sigil form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let eq = |strict: &bool| if *strict { "" } else { "=" };
        match self {
            Self::Strict { id, strict } => write!(f, "@{id}{}", eq(strict)),
            Self::Optional { id, strict } => write!(f, "@?{id}{}", eq(strict)),
            Self::Expression { source } => write!(f, "@={source}"),
            Self::Literal { value } => write!(f, "@{value}"),
        }
    }
}

/// Interpret one string through the grammar.
pub fn resolve_str(raw: &str) -> Value {
    if let Some(source) = raw.strip_prefix("@=") {
        return Value::Reference(Reference::expression(source));
    }
    if raw.starts_with("@@") {
        let literal = &raw[1..];
        return Value::Reference(Reference::literal(
            literal.strip_suffix('=').unwrap_or(literal),
        ));
    }

    let (optional, rest) = if let Some(rest) = raw.strip_prefix("@?") {
        (true, rest)
    } else if let Some(rest) = raw.strip_prefix('@') {
        (false, rest)
    } else {
        return Value::String(raw.to_string());
    };

    let (id, strict) = match rest.strip_suffix('=') {
        Some(id) => (id.to_string(), false),
        None => (rest.to_string(), true),
    };

    Value::Reference(if optional {
        Reference::Optional { id, strict }
    } else {
        Reference::Strict { id, strict }
    })
}

/// Resolve a decoded JSON value, recursing through sequences and objects.
///
/// Key order and nesting are preserved.
pub fn resolve_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => number_to_scalar(n).into(),
        serde_json::Value::String(s) => resolve_str(s),
        serde_json::Value::Array(items) => Value::List(items.iter().map(resolve_value).collect()),
        serde_json::Value::Object(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), resolve_value(v)))
                .collect::<IndexMap<_, _>>(),
        ),
    }
}
