//! Application layer errors.
//!
//! These errors represent failures in orchestration: I/O, rendering and the
//! pipeline's own step/rollback bookkeeping. Request problems are
//! `DomainError` from `crate::domain`.

use std::fmt::Write as _;
use std::path::PathBuf;

use thiserror::Error;

use crate::error::{ErrorCategory, GgamiError};

/// A compensating action that itself failed during rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackFailure {
    pub step: &'static str,
    pub reason: String,
}

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// No embedded template with that name.
    #[error("Template '{name}' not found")]
    TemplateNotFound { name: String },

    /// Template rendering failed.
    #[error("Template rendering failed for '{template}': {reason}")]
    RenderingFailed { template: String, reason: String },

    /// Shared adapter state was poisoned by a panicking thread.
    #[error("Filesystem state lock poisoned")]
    LockPoisoned,

    /// A step that needs the working directory ran before it existed.
    #[error("Step '{step}' requires a working directory but none was created")]
    MissingTempDir { step: &'static str },

    /// A pipeline step failed; everything before it has been rolled back.
    #[error(
        "step '{step}' failed: {cause}{}",
        describe_rollback_failures(.rollback_failures)
    )]
    StepFailed {
        step: &'static str,
        cause: Box<GgamiError>,
        rollback_failures: Vec<RollbackFailure>,
    },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

fn describe_rollback_failures(failures: &[RollbackFailure]) -> String {
    let mut out = String::new();
    for f in failures {
        let _ = write!(out, " (rollback of '{}' also failed: {})", f.step, f.reason);
    }
    out
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory is writable".into(),
            ],
            Self::TemplateNotFound { name } => vec![
                format!("No embedded template named '{}'", name),
                "This is a bug in the template set, please report it".into(),
            ],
            Self::StepFailed {
                cause,
                rollback_failures,
                ..
            } => {
                let mut s = cause.suggestions();
                if !rollback_failures.is_empty() {
                    s.push("Some cleanup failed; remove leftover ggami-gen-* temp dirs".into());
                }
                s
            }
            Self::RollbackFailed { path, .. } => vec![
                format!("Leftover files may remain at: {}", path.display()),
                "Remove them manually".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::StepFailed { cause, .. } => cause.category(),
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. }
            | Self::RenderingFailed { .. }
            | Self::MissingTempDir { .. }
            | Self::LockPoisoned
            | Self::RollbackFailed { .. } => ErrorCategory::Internal,
        }
    }

    /// The error that started a failed pipeline run, unwrapping `StepFailed`.
    pub fn root_cause(&self) -> Option<&GgamiError> {
        match self {
            Self::StepFailed { cause, .. } => Some(cause),
            _ => None,
        }
    }
}
