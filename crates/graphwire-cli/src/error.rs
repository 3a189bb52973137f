//! CLI errors: the message, hints for fixing it, and the exit code.

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use graphwire_core::error::GraphError;

pub use graphwire_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration value could not be read or rendered.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// A compilation error from `graphwire-core` or an adapter.
    #[error("Compilation failed: {0}")]
    Core(#[from] GraphError),

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The compiled graph could not be written out.
    #[error("Failed to write {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Hints shown under the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["See `graphwire <COMMAND> --help` for accepted values".into()],
            Self::ConfigError { .. } => vec![
                "`graphwire config list` shows the effective settings".into(),
                "`graphwire config path` shows where the config file is read from".into(),
            ],
            Self::Core(core) => core.suggestions(),
            Self::IoError { .. } => vec!["Re-run with -vv to see the failing operation".into()],
            Self::WriteFailed { path, .. } => vec![match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => {
                    format!("Make sure {} exists and is writable", dir.display())
                }
                _ => format!("Make sure {} is writable", path.display()),
            }],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => ErrorCategory::from(core.category()),
            Self::IoError { .. } | Self::WriteFailed { .. } => ErrorCategory::Internal,
        }
    }

    /// Process exit code; see the table in `main.rs`.
    pub fn exit_code(&self) -> u8 {
        self.category() as u8
    }

    /// Render the error for stderr. `verbose` adds the cause chain, `color`
    /// adds ANSI styling.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let mut out = format!(
            "\n{} {}\n",
            paint(color, "error:", |t| t.red().bold().to_string()),
            self
        );

        // a core error is its own first source
        let first_cause = match self {
            Self::Core(core) => core.source(),
            _ => self.source(),
        };

        if verbose {
            let mut cause = first_cause;
            while let Some(err) = cause {
                out.push_str(&format!(
                    "  {} {err}\n",
                    paint(color, "caused by:", |t| t.dimmed().to_string())
                ));
                cause = err.source();
            }
        }

        for hint in self.suggestions() {
            out.push_str(&format!("  {} {hint}\n", paint(color, "hint:", |t| t.yellow().bold().to_string())));
        }

        if !verbose && first_cause.is_some() {
            out.push_str(&paint(color, "  (run with -v to see the cause)\n", |t| t.dimmed().to_string()));
        }

        out
    }

    /// Emit the error as a tracing event at a level matching its category.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(category = ?self.category(), "{self}")
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(category = ?self.category(), "{self}")
            }
        }
    }
}

fn paint(color: bool, text: &str, style: fn(&str) -> String) -> String {
    if color { style(text) } else { text.to_string() }
}

/// Error classes, each carrying its exit code as the discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCategory {
    Internal = 1,
    /// Bad arguments or invalid documents.
    UserError = 2,
    NotFound = 3,
    Configuration = 4,
}

impl From<CoreCategory> for ErrorCategory {
    fn from(category: CoreCategory) -> Self {
        match category {
            CoreCategory::Validation => Self::UserError,
            CoreCategory::NotFound => Self::NotFound,
            CoreCategory::Configuration => Self::Configuration,
            CoreCategory::Internal => Self::Internal,
        }
    }
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
///
/// Two concrete impls are provided:
/// - `Result<T, std::io::Error>` → `CliError::IoError`
/// - `Result<T, GraphError>`     → `CliError::Core`
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, GraphError> {
    /// Core errors already name the file and id involved, so the context
    /// only goes to the debug log.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| {
            tracing::debug!(context = %f().into(), "Core error");
            CliError::Core(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphwire_core::application::ApplicationError;
    use graphwire_core::domain::DomainError;
    use std::io;

    fn core(err: impl Into<GraphError>) -> CliError {
        CliError::Core(err.into())
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn invalid_documents_are_user_errors() {
        let err = core(DomainError::UnsupportedKey {
            key: "colour".into(),
            id: "paint".into(),
            file: "services.json".into(),
            allowed: "class".into(),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_resources_exit_three() {
        let err = core(ApplicationError::ResourceNotFound {
            resource: "services.json".into(),
            searched: ".".into(),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn configuration_errors_exit_four() {
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
        assert_eq!(
            core(ApplicationError::DuplicateExtension {
                namespace: "kernel".into()
            })
            .exit_code(),
            4
        );
    }

    #[test]
    fn io_errors_are_internal() {
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
    }

    // ── suggestions ───────────────────────────────────────────────────────

    #[test]
    fn core_suggestions_pass_through() {
        let missing = DomainError::ServiceNotFound { id: "x".into() };
        assert_eq!(core(missing.clone()).suggestions(), missing.suggestions());
    }

    #[test]
    fn write_failure_names_parent_directory() {
        let err = CliError::WriteFailed {
            path: PathBuf::from("/tmp/out/graph.json"),
            source: io::Error::other("denied"),
        };
        assert!(err.suggestions()[0].contains("/tmp/out"));
    }

    // ── render ────────────────────────────────────────────────────────

    #[test]
    fn plain_render_has_message_and_hints() {
        let err = CliError::InvalidInput {
            message: "empty".into(),
            source: None,
        };
        let s = err.render(false, false);
        assert!(s.contains("error: Invalid input: empty"));
        assert!(s.contains("hint: See `graphwire <COMMAND> --help`"));
        assert!(!s.contains("\u{1b}["));
        assert!(!s.contains("run with -v"));
    }

    #[test]
    fn verbose_render_shows_cause() {
        let err = CliError::IoError {
            message: "writing".into(),
            source: io::Error::other("disk full"),
        };
        assert!(err.render(true, false).contains("caused by: disk full"));
        assert!(err.render(false, false).contains("run with -v"));
    }

    #[test]
    fn colored_render_uses_ansi() {
        let err = CliError::ConfigError {
            message: "x".into(),
            source: None,
        };
        assert!(err.render(false, true).contains("\u{1b}["));
    }

    // ── IntoCli ───────────────────────────────────────────────────────────

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading manifest");
        assert!(matches!(cli, Err(CliError::IoError { ref message, .. }) if message == "reading manifest"));
    }

    #[test]
    fn into_cli_core_error() {
        let result: Result<(), GraphError> = Err(GraphError::configuration("bad"));
        assert!(matches!(
            result.with_cli_context(|| "compiling"),
            Err(CliError::Core(_))
        ));
    }
}
