//! Application layer errors.
//!
//! These errors represent failures in orchestration (locating and reading
//! imports, recursion bounds, extension dispatch), not compilation rules.
//! Rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ErrorKind;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// No candidate location holds the resource.
    #[error("The file \"{resource}\" does not exist (looked in: {searched})")]
    ResourceNotFound { resource: String, searched: String },

    /// The resource names a remote location.
    #[error("This is not a local file \"{resource}\"")]
    NotLocal { resource: String },

    /// The resource exists but could not be read.
    #[error("Unable to read {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    /// A document imports itself, directly or through other documents.
    #[error("Circular import detected: {chain}")]
    ImportCycle { chain: String },

    /// Import nesting went past the configured bound.
    #[error("Import depth limit of {limit} exceeded while importing \"{resource}\"")]
    ImportDepthExceeded { resource: String, limit: usize },

    /// A top-level key has no registered handler.
    #[error(
        "There is no extension able to load the configuration for \"{namespace}\" (in {file}). Looked for namespace \"{namespace}\", found {available}"
    )]
    UnknownExtension {
        namespace: String,
        file: String,
        available: String,
    },

    /// Two handlers claimed the same namespace.
    #[error("An extension is already registered for namespace \"{namespace}\"")]
    DuplicateExtension { namespace: String },
}

impl ApplicationError {
    /// Build [`ApplicationError::UnknownExtension`], listing registered
    /// namespaces or "none".
    pub fn unknown_extension<'a>(
        namespace: &str,
        file: &str,
        registered: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let names: Vec<String> = registered.into_iter().map(|n| format!("\"{n}\"")).collect();
        Self::UnknownExtension {
            namespace: namespace.to_string(),
            file: file.to_string(),
            available: if names.is_empty() {
                "none".to_string()
            } else {
                names.join(", ")
            },
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ResourceNotFound { resource, .. } => vec![
                format!("Check the path of \"{}\"", resource),
                "Imports are resolved relative to the importing file".into(),
                "Set \"ignore_errors\": true on the import to make it optional".into(),
            ],
            Self::NotLocal { .. } => vec!["Only local files can be imported".into()],
            Self::Unreadable { path, .. } => vec![
                format!("Failed to read: {}", path.display()),
                "Check that you have read permissions".into(),
            ],
            Self::ImportCycle { .. } => {
                vec!["Remove one of the imports that closes the cycle".into()]
            }
            Self::ImportDepthExceeded { .. } => vec![
                "Flatten the import tree".into(),
                "Or raise loader.max_import_depth in the configuration".into(),
            ],
            Self::UnknownExtension { namespace, .. } => vec![
                format!("Register a handler for \"{}\"", namespace),
                "Or remove the section from the file".into(),
            ],
            Self::DuplicateExtension { .. } => {
                vec!["Register each extension namespace once".into()]
            }
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ResourceNotFound { .. } => ErrorCategory::NotFound,
            Self::NotLocal { .. }
            | Self::ImportCycle { .. }
            | Self::ImportDepthExceeded { .. }
            | Self::UnknownExtension { .. } => ErrorCategory::Validation,
            Self::Unreadable { .. } => ErrorCategory::Internal,
            Self::DuplicateExtension { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ResourceNotFound { .. } | Self::NotLocal { .. } | Self::Unreadable { .. } => {
                ErrorKind::Import
            }
            Self::ImportCycle { .. } | Self::ImportDepthExceeded { .. } => ErrorKind::Recursion,
            Self::UnknownExtension { .. } => ErrorKind::UnknownExtension,
            Self::DuplicateExtension { .. } => ErrorKind::Configuration,
        }
    }
}
