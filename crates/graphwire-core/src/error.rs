//! The error type returned by every public core operation.
//!
//! Domain and application errors pass through unchanged; [`GraphError::kind`]
//! reports the same [`ErrorKind`] whichever layer raised it.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, ErrorKind};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    /// Compilation rule violations.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Orchestration failures: imports, recursion, extensions.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Bad compiler setup, e.g. an unusable capability manifest.
    #[error("{message}")]
    Configuration { message: String },

    /// A broken invariant inside graphwire itself.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl GraphError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { .. } => {
                vec!["Check the wiring.capabilities setting and the manifest it names".into()]
            }
            Self::Internal { .. } => vec![
                "Report it at https://github.com/cosecruz/graphwire/issues with the documents involved"
                    .into(),
            ],
        }
    }

    /// Coarse class used by front ends to pick an exit code.
    pub fn category(&self) -> ErrorCategory {
        use crate::domain::ErrorCategory as Domain;

        match self {
            Self::Domain(e) => match e.category() {
                Domain::Validation => ErrorCategory::Validation,
                Domain::NotFound => ErrorCategory::NotFound,
                Domain::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Position in the compiler's error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) => e.kind(),
            Self::Application(e) => e.kind(),
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

pub type GraphResult<T> = Result<T, GraphError>;
