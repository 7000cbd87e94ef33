//! Error handling for the ggami CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining
//! - Exit code mapping

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use ggami_core::error::GgamiError;

pub use ggami_core::error::ErrorCategory as CoreCategory;

use crate::config::AppConfig;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input that clap could not catch.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The target directory exists and `--force` was not given.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// A `--spec` request file could not be read or parsed.
    #[error("Invalid project file '{path}': {reason}")]
    InvalidSpecFile { path: PathBuf, reason: String },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// `ggami config get` with a key that does not exist.
    #[error("Unknown configuration key '{key}'")]
    UnknownConfigKey { key: String },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `ggami-core`.
    #[error("Generation failed: {0}")]
    Core(#[from] GgamiError),

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Output could not be serialised.
    #[error("Failed to serialise output: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,
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
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message } => vec![
                format!("Check your input: {message}"),
                "Use --help for usage information".into(),
            ],

            Self::ProjectExists { path } => vec![
                format!("The directory '{}' already exists", path.display()),
                "Use --force to replace it".into(),
                "Choose a different project name or --path".into(),
            ],

            Self::InvalidSpecFile { path, .. } => vec![
                format!("Check '{}'", path.display()),
                "Project files use the .toml or .json extension".into(),
                "Keys are camelCase: projectName, modules, structured, models, dbType, rbac".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                format!("Check your config file at {}", AppConfig::config_path().display()),
                "Use 'ggami init --force' to recreate a default config".into(),
            ],

            Self::UnknownConfigKey { .. } => {
                let mut out = vec!["Known keys:".to_string()];
                out.extend(AppConfig::KEYS.iter().map(|k| format!("  • {k}")));
                out
            }

            Self::Core(core) => core.suggestions(),

            Self::IoError { .. } => vec![
                "Check file permissions and available disk space".into(),
                "Make sure the parent directory exists".into(),
            ],

            Self::Serialization(_) | Self::Cancelled => vec![],
        }
    }

    /// Category used for the exit code and log severity.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. }
            | Self::ProjectExists { .. }
            | Self::InvalidSpecFile { .. }
            | Self::UnknownConfigKey { .. }
            | Self::Cancelled => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } | Self::Serialization(_) => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "\u{2717}".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "\u{2192}".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {self}\n"));

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::debug!("User error: {}", self),
            ErrorCategory::NotFound => tracing::debug!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
///
/// There is deliberately no blanket impl; it would overlap the concrete ones.
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

impl<T> IntoCli<T> for Result<T, GgamiError> {
    /// Core errors already carry their own context; the message is dropped.
    fn with_cli_context<F, S>(self, _f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(CliError::Core)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use ggami_core::{
        application::ApplicationError,
        domain::{DomainError, ValidationError},
    };

    use super::*;

    fn step_failed(cause: GgamiError) -> CliError {
        CliError::Core(
            ApplicationError::StepFailed {
                step: "ResolveModules",
                cause: Box::new(cause),
                rollback_failures: vec![],
            }
            .into(),
        )
    }

    // ── suggestions ───────────────────────────────────────────────────────

    #[test]
    fn project_exists_suggests_force() {
        let err = CliError::ProjectExists {
            path: PathBuf::from("/tmp/test"),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("--force")));
    }

    #[test]
    fn unknown_module_suggests_listing() {
        let err = step_failed(DomainError::UnknownModule { id: "zzz".into() }.into());
        assert!(err.suggestions().iter().any(|s| s.contains("ggami modules")));
    }

    #[test]
    fn unknown_config_key_lists_keys() {
        let err = CliError::UnknownConfigKey { key: "x.y".into() };
        let suggestions = err.suggestions();
        assert!(suggestions.iter().any(|s| s.contains("defaults.language")));
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn exit_code_user_error() {
        assert_eq!(
            CliError::InvalidInput {
                message: "x".into()
            }
            .exit_code(),
            2
        );
        let invalid_name: GgamiError = ValidationError::InvalidProjectName {
            name: "9lives".into(),
        }
        .into();
        assert_eq!(step_failed(invalid_name).exit_code(), 2);
    }

    #[test]
    fn exit_code_not_found() {
        let err = step_failed(DomainError::UnknownModule { id: "zzz".into() }.into());
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn exit_code_configuration() {
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
        let core = GgamiError::Configuration {
            message: "bad".into(),
        };
        assert_eq!(CliError::Core(core).exit_code(), 4);
    }

    #[test]
    fn exit_code_internal() {
        let err = CliError::IoError {
            message: "x".into(),
            source: io::Error::other("boom"),
        };
        assert_eq!(err.exit_code(), 1);
    }

    // ── formatting ────────────────────────────────────────────────────────

    #[test]
    fn plain_format_has_no_ansi() {
        let err = CliError::ProjectExists {
            path: PathBuf::from("/tmp/blog"),
        };
        let out = err.format_plain(false);
        assert!(out.contains("Error: Project already exists at /tmp/blog"));
        assert!(out.contains("Suggestions:"));
        assert!(out.contains("--verbose"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn verbose_plain_format_shows_causes() {
        let err = CliError::IoError {
            message: "writing config".into(),
            source: io::Error::other("disk full"),
        };
        let out = err.format_plain(true);
        assert!(out.contains("Caused by: disk full"));
        assert!(!out.contains("--verbose"));
    }

    // ── IntoCli ───────────────────────────────────────────────────────────

    #[test]
    fn io_context_is_kept() {
        let r: Result<(), io::Error> = Err(io::Error::other("nope"));
        let err = r.with_cli_context(|| "reading project file").unwrap_err();
        assert!(matches!(err, CliError::IoError { ref message, .. } if message == "reading project file"));
    }

    #[test]
    fn core_errors_pass_through() {
        let r: Result<(), GgamiError> = Err(GgamiError::Internal {
            message: "bug".into(),
        });
        let err = r.with_cli_context(|| "ignored").unwrap_err();
        assert!(matches!(err, CliError::Core(GgamiError::Internal { .. })));
    }
}
