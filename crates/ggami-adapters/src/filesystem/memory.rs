//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use ggami_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::Permissions,
    error::GgamiResult,
};
use uuid::Uuid;

/// In-memory filesystem for testing.
///
/// Cheap to clone; clones share state, so a test can keep one handle while
/// the service owns another. Failures can be injected with
/// [`fail_writes_to`](Self::fail_writes_to) and
/// [`fail_renames_from`](Self::fail_renames_from).
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    executables: HashSet<PathBuf>,
    read_only: HashSet<PathBuf>,
    failing_writes: Vec<String>,
    failing_renames: Vec<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Read a file's content (testing helper).
    pub fn file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.executables.contains(path))
    }

    /// Check if a file is marked read-only.
    pub fn is_read_only(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.read_only.contains(path))
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// List files under `root`, relative to it, sorted.
    pub fn list_files_under(&self, root: &Path) -> Vec<PathBuf> {
        self.list_files()
            .into_iter()
            .filter_map(|p| p.strip_prefix(root).ok().map(Path::to_path_buf))
            .collect()
    }

    /// Make every write to a path ending with `suffix` fail.
    pub fn fail_writes_to(&self, suffix: impl Into<String>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing_writes.push(suffix.into());
        }
    }

    /// Make renames of anything under `prefix` fail, as across devices.
    pub fn fail_renames_from(&self, prefix: impl Into<PathBuf>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing_renames.push(prefix.into());
        }
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            *inner = MemoryFilesystemInner::default();
        }
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFilesystemInner {
    fn insert_dir_chain(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn remove_tree(&mut self, path: &Path) {
        self.directories.retain(|p| !p.starts_with(path));
        self.files.retain(|p, _| !p.starts_with(path));
        self.executables.retain(|p| !p.starts_with(path));
        self.read_only.retain(|p| !p.starts_with(path));
    }

    fn copy_tree(&mut self, from: &Path, to: &Path) {
        let rebase = |p: &Path| p.strip_prefix(from).ok().map(|rel| to.join(rel));

        let dirs: Vec<_> = self.directories.iter().filter_map(|p| rebase(p)).collect();
        let files: Vec<_> = self
            .files
            .iter()
            .filter_map(|(p, c)| rebase(p).map(|t| (t, c.clone())))
            .collect();
        let executables: Vec<_> = self.executables.iter().filter_map(|p| rebase(p)).collect();
        let read_only: Vec<_> = self.read_only.iter().filter_map(|p| rebase(p)).collect();

        if self.directories.contains(from) {
            self.insert_dir_chain(to);
        } else if let Some(parent) = to.parent() {
            self.insert_dir_chain(parent);
        }
        self.directories.extend(dirs);
        self.files.extend(files);
        self.executables.extend(executables);
        self.read_only.extend(read_only);
    }
}

fn fs_error(path: &Path, reason: &str) -> ggami_core::error::GgamiError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> GgamiResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        inner.insert_dir_chain(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str, permissions: Permissions) -> GgamiResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        let path_str = path.to_string_lossy();
        if inner.failing_writes.iter().any(|s| path_str.ends_with(s.as_str())) {
            return Err(fs_error(path, "Failed to write file: injected failure"));
        }

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(fs_error(path, "Parent directory does not exist"));
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        if permissions.executable_flag() {
            inner.executables.insert(path.to_path_buf());
        } else {
            inner.executables.remove(path);
        }
        if permissions.writable() {
            inner.read_only.remove(path);
        } else {
            inner.read_only.insert(path.to_path_buf());
        }
        Ok(())
    }

    fn read_file(&self, path: &Path) -> GgamiResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| fs_error(path, "Failed to read file: not found"))
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
    }

    fn remove_dir_all(&self, path: &Path) -> GgamiResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        inner.remove_tree(path);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> GgamiResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        if inner.failing_renames.iter().any(|p| from.starts_with(p)) {
            return Err(fs_error(from, "Failed to rename: injected failure"));
        }
        if !inner.directories.contains(from) && !inner.files.contains_key(from) {
            return Err(fs_error(from, "Failed to rename: not found"));
        }
        if inner.directories.contains(to) || inner.files.contains_key(to) {
            return Err(fs_error(to, "Failed to rename: destination exists"));
        }

        inner.copy_tree(from, to);
        inner.remove_tree(from);
        Ok(())
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> GgamiResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        if !inner.directories.contains(from) {
            return Err(fs_error(from, "Failed to copy: source directory not found"));
        }
        inner.copy_tree(from, to);
        Ok(())
    }

    fn create_temp_dir(&self, prefix: &str) -> GgamiResult<PathBuf> {
        let dir = PathBuf::from("/tmp").join(format!("{}{}", prefix, Uuid::new_v4().simple()));
        self.create_dir_all(&dir)?;
        Ok(dir)
    }
}
