// ============================================================================
// domain/error.rs - COMPILATION RULE VIOLATIONS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so a host can keep the last failure next to a cached graph)
/// - Categorizable (for CLI display)
/// - Locatable (every variant names the offending id, section or file)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Parse Errors
    // ========================================================================
    #[error("The service file \"{file}\" is not valid JSON: {reason}")]
    Parse { file: String, reason: String },

    // ========================================================================
    // Schema Errors
    // ========================================================================
    #[error("The service file \"{file}\" is not valid. It should contain an object. Check your JSON syntax")]
    InvalidDocument { file: String },

    #[error("The \"{section}\" key should contain {expected} in {file}. Check your JSON syntax")]
    InvalidSection {
        section: String,
        expected: &'static str,
        file: String,
    },

    #[error(
        "The configuration key \"{key}\" is unsupported for service definition \"{id}\" in \"{file}\". Allowed configuration keys are \"{allowed}\""
    )]
    UnsupportedKey {
        key: String,
        id: String,
        file: String,
        allowed: String,
    },

    #[error("Invalid service definition \"{id}\" in {file}: {reason}")]
    InvalidDefinition {
        id: String,
        file: String,
        reason: String,
    },

    #[error(
        "A \"tags\" attribute must be of a scalar-type for service \"{id}\", tag \"{tag}\", attribute \"{attribute}\" in {file}. Check your JSON syntax"
    )]
    InvalidTagAttribute {
        id: String,
        tag: String,
        attribute: String,
        file: String,
    },

    #[error("Invalid import in {file}: {reason}")]
    InvalidImport { file: String, reason: String },

    #[error("The service \"{id}\" defined in {file} is already defined")]
    DuplicateId { id: String, file: String },

    #[error(
        "The value of the \"decorates\" option for the \"{id}\" service in {file} must be the id of the service without the \"@\" prefix (replace \"{value}\" with \"{suggestion}\")"
    )]
    InvalidDecorates {
        id: String,
        file: String,
        value: String,
        suggestion: String,
    },

    // ========================================================================
    // Reference Errors
    // ========================================================================
    #[error(
        "The value of the \"{option}\" option for the \"{id}\" service in {file} must be the id of the service without the \"@\" prefix (replace \"{value}\" with \"{suggestion}\")"
    )]
    InvalidFactoryReference {
        option: &'static str,
        id: String,
        file: String,
        value: String,
        suggestion: String,
    },

    // ========================================================================
    // Inheritance Errors
    // ========================================================================
    #[error("The service \"{id}\" has a dependency on a non-existent parent service \"{parent}\"")]
    MissingParent { id: String, parent: String },

    #[error("Circular parent chain detected: {chain}")]
    ParentCycle { chain: String },

    // ========================================================================
    // Parameter Errors
    // ========================================================================
    #[error("You have requested a non-existent parameter \"{name}\"")]
    ParameterNotFound { name: String },

    #[error("Circular reference detected for parameter \"{name}\"")]
    ParameterCycle { name: String },

    #[error("Parameter \"{name}\" cannot be embedded in \"{value}\": it is not a scalar")]
    ParameterNotScalar { name: String, value: String },

    // ========================================================================
    // Wiring Errors
    // ========================================================================
    #[error("{rule}")]
    Wiring { id: String, rule: String },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    #[error("Service not found: {id}")]
    ServiceNotFound { id: String },

    // ========================================================================
    // Capability Errors
    // ========================================================================
    #[error(
        "Unknown capability \"{name}\". Known capabilities are \"command_handler\", \"query_handler\" and \"event_subscriber\""
    )]
    UnknownCapability { name: String },
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidDefinition`].
    pub fn definition(id: &str, file: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            id: id.to_string(),
            file: file.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`DomainError::Wiring`].
    pub fn wiring(id: &str, rule: impl Into<String>) -> Self {
        Self::Wiring {
            id: id.to_string(),
            rule: rule.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Parse { file, .. } => vec![
                format!("Check the JSON syntax of {}", file),
                "An empty file is allowed; a truncated one is not".into(),
            ],
            Self::UnsupportedKey { key, id, .. } => vec![
                format!("Remove or rename \"{}\" in service \"{}\"", key, id),
                "Run: graphwire check <file> after editing".into(),
            ],
            Self::InvalidFactoryReference { suggestion, .. }
            | Self::InvalidDecorates { suggestion, .. } => vec![
                format!("Use \"{}\" instead", suggestion),
                "The \"@\" sigil is only valid in arguments, properties and calls".into(),
            ],
            Self::DuplicateId { id, .. } => vec![
                format!("Service id \"{}\" must be unique across all imported files", id),
                "Rename one of the definitions or remove the duplicate import".into(),
            ],
            Self::MissingParent { parent, .. } => vec![
                format!("Define a service named \"{}\" or fix the \"parent\" key", parent),
            ],
            Self::ParentCycle { .. } => vec!["Break the cycle in the \"parent\" chain".into()],
            Self::ParameterNotFound { name } => vec![
                format!("Define \"{}\" under \"parameters\"", name),
                "Write %% for a literal percent sign".into(),
            ],
            Self::Wiring { id, .. } => vec![
                format!("Check the definition of \"{}\"", id),
                "Tagged handlers and subscribers must be public and concrete".into(),
                "Register the class in the capability manifest".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ServiceNotFound { .. } => ErrorCategory::NotFound,
            _ => ErrorCategory::Validation,
        }
    }

    /// Position of this error in the compiler's error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { .. } => ErrorKind::Parse,
            Self::InvalidDocument { .. }
            | Self::InvalidSection { .. }
            | Self::UnsupportedKey { .. }
            | Self::InvalidDefinition { .. }
            | Self::InvalidTagAttribute { .. }
            | Self::InvalidImport { .. }
            | Self::DuplicateId { .. }
            | Self::InvalidDecorates { .. } => ErrorKind::Schema,
            Self::InvalidFactoryReference { .. } => ErrorKind::InvalidFactoryReference,
            Self::MissingParent { .. } | Self::ParentCycle { .. } => ErrorKind::Inheritance,
            Self::ParameterNotFound { .. }
            | Self::ParameterCycle { .. }
            | Self::ParameterNotScalar { .. } => ErrorKind::Parameter,
            Self::Wiring { .. } => ErrorKind::Wiring,
            Self::ServiceNotFound { .. } => ErrorKind::NotFound,
            Self::UnknownCapability { .. } => ErrorKind::Configuration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

/// The compiler's error taxonomy, shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parse,
    Schema,
    Import,
    Recursion,
    UnknownExtension,
    InvalidFactoryReference,
    Inheritance,
    Parameter,
    Wiring,
    NotFound,
    Configuration,
    Internal,
}
