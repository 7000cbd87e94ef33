//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use ggami_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::Permissions,
    error::{GgamiError, GgamiResult},
};
use tracing::debug;
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone)]
pub struct LocalFilesystem {
    temp_root: PathBuf,
}

impl LocalFilesystem {
    /// Create a new local filesystem adapter using the OS temp dir.
    pub fn new() -> Self {
        Self {
            temp_root: std::env::temp_dir(),
        }
    }

    /// Create scratch directories under `root` instead of the OS temp dir.
    pub fn with_temp_root(root: impl Into<PathBuf>) -> Self {
        Self {
            temp_root: root.into(),
        }
    }

    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> GgamiResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str, permissions: Permissions) -> GgamiResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))?;
        set_permissions(path, permissions)
    }

    fn read_file(&self, path: &Path) -> GgamiResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> GgamiResult<()> {
        match std::fs::remove_dir_all(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other.map_err(|e| map_io_error(path, e, "remove directory")),
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> GgamiResult<()> {
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> GgamiResult<()> {
        for entry in WalkDir::new(from) {
            let entry = entry.map_err(|e| GgamiError::from(ApplicationError::FilesystemError {
                path: e.path().unwrap_or(from).to_path_buf(),
                reason: format!("Failed to walk directory: {}", e),
            }))?;

            let rel = entry.path().strip_prefix(from).map_err(|e| {
                GgamiError::from(ApplicationError::FilesystemError {
                    path: entry.path().to_path_buf(),
                    reason: format!("Failed to relativize path: {}", e),
                })
            })?;
            let target = to.join(rel);

            if entry.file_type().is_dir() {
                self.create_dir_all(&target)?;
            } else {
                std::fs::copy(entry.path(), &target)
                    .map_err(|e| map_io_error(&target, e, "copy file"))?;
            }
        }
        debug!(from = %from.display(), to = %to.display(), "Tree copied");
        Ok(())
    }

    fn create_temp_dir(&self, prefix: &str) -> GgamiResult<PathBuf> {
        std::fs::create_dir_all(&self.temp_root)
            .map_err(|e| map_io_error(&self.temp_root, e, "create temp root"))?;
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(&self.temp_root)
            .map_err(|e| map_io_error(&self.temp_root, e, "create temp directory"))?
            .keep();
        debug!(path = %dir.display(), "Temp dir created");
        Ok(dir)
    }
}

#[cfg(unix)]
fn set_permissions(path: &Path, permissions: Permissions) -> GgamiResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = permissions.unix_mode();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .map_err(|e| map_io_error(path, e, "set permissions"))
}

#[cfg(not(unix))]
fn set_permissions(path: &Path, permissions: Permissions) -> GgamiResult<()> {
    // No executable bit here; only read-only maps across.
    if permissions.writable() {
        return Ok(());
    }
    let metadata = std::fs::metadata(path).map_err(|e| map_io_error(path, e, "get metadata"))?;
    let mut perms = metadata.permissions();
    perms.set_readonly(true);
    std::fs::set_permissions(path, perms).map_err(|e| map_io_error(path, e, "set permissions"))
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> GgamiError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dirs_are_unique_and_prefixed() {
        let root = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::with_temp_root(root.path());

        let a = fs.create_temp_dir("ggami-gen-").unwrap();
        let b = fs.create_temp_dir("ggami-gen-").unwrap();

        assert_ne!(a, b);
        assert!(a.is_dir() && b.is_dir());
        let name = a.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("ggami-gen-"));
    }

    #[test]
    fn temp_dir_creates_missing_root_and_outlives_handle() {
        let root = tempfile::tempdir().unwrap();
        let scratch = root.path().join("nested").join("scratch");
        let fs = LocalFilesystem::with_temp_root(&scratch);

        let dir = fs.create_temp_dir("ggami-gen-").unwrap();

        assert_eq!(dir.parent(), Some(scratch.as_path()));
        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn temp_dir_under_a_file_fails() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let fs = LocalFilesystem::with_temp_root(&blocker);

        let err = fs.create_temp_dir("ggami-gen-").unwrap_err();
        assert!(matches!(
            err,
            GgamiError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn write_read_roundtrip_with_mode() {
        let root = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let file = root.path().join("main.go");

        fs.write_file(&file, "package main\n", Permissions::read_write())
            .unwrap();
        assert_eq!(fs.read_file(&file).unwrap(), "package main\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&file).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o644);
        }
    }

    #[test]
    fn write_without_parent_fails() {
        let root = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();

        let err = fs
            .write_file(
                &root.path().join("missing/main.go"),
                "",
                Permissions::default(),
            )
            .unwrap_err();
        assert!(err.to_string().contains("Failed to write file"));
    }

    #[test]
    fn copy_dir_all_copies_nested_tree() {
        let root = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let src = root.path().join("src");
        let dst = root.path().join("dst");

        fs.create_dir_all(&src.join("templates/partials")).unwrap();
        fs.write_file(&src.join("go.mod"), "module x\n", Permissions::default())
            .unwrap();
        fs.write_file(
            &src.join("templates/partials/nav.html"),
            "<nav></nav>",
            Permissions::default(),
        )
        .unwrap();

        fs.copy_dir_all(&src, &dst).unwrap();

        assert_eq!(fs.read_file(&dst.join("go.mod")).unwrap(), "module x\n");
        assert_eq!(
            fs.read_file(&dst.join("templates/partials/nav.html")).unwrap(),
            "<nav></nav>"
        );
        assert!(src.exists(), "copy must not move the source");
    }

    #[test]
    fn remove_missing_dir_is_ok() {
        let root = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();

        fs.remove_dir_all(&root.path().join("never-created")).unwrap();
    }

    #[test]
    fn rename_moves_directory() {
        let root = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let from = root.path().join("a");
        let to = root.path().join("b");
        fs.create_dir_all(&from).unwrap();

        fs.rename(&from, &to).unwrap();
        assert!(!fs.exists(&from));
        assert!(fs.exists(&to));
    }
}
