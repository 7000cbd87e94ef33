//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the generation pipeline needs from the outside
//! world. The `ggami-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::{Delimiters, Permissions};
use crate::error::GgamiResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `ggami_adapters::filesystem::LocalFilesystem` (production)
/// - `ggami_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Paths are absolute; the pipeline joins them onto its temp dir
/// - Permissions are capability-based, not Unix-specific
/// - `rename` may fail across devices; callers fall back to `copy_dir_all`
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> GgamiResult<()>;

    /// Write content to a file, creating or truncating it.
    fn write_file(&self, path: &Path, content: &str, permissions: Permissions)
    -> GgamiResult<()>;

    /// Read a whole file as UTF-8.
    fn read_file(&self, path: &Path) -> GgamiResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents. Missing paths are not an error.
    fn remove_dir_all(&self, path: &Path) -> GgamiResult<()>;

    /// Move `from` to `to` in one operation.
    fn rename(&self, from: &Path, to: &Path) -> GgamiResult<()>;

    /// Recursively copy the tree at `from` into `to` (created if missing).
    fn copy_dir_all(&self, from: &Path, to: &Path) -> GgamiResult<()>;

    /// Create a fresh, uniquely named directory for scratch work.
    fn create_temp_dir(&self, prefix: &str) -> GgamiResult<PathBuf>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `ggami_adapters::renderer::MiniJinjaRenderer` (embedded template set)
pub trait TemplateRenderer: Send + Sync {
    /// Render the named template with `data`.
    ///
    /// # Arguments
    ///
    /// * `template` - Template name, e.g. `structured/model.go`
    /// * `data` - Values visible to the template
    /// * `delimiters` - Placeholder syntax used by this template
    fn render(&self, template: &str, data: &Value, delimiters: Delimiters) -> GgamiResult<String>;
}
