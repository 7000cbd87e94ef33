//! Promotion of the finished temp dir to the requested target path.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::PipelineContext,
    error::GgamiResult,
};

/// Move the temp dir to the final path.
///
/// An existing directory at the final path is moved aside first and only
/// deleted once the new tree is in place; if promotion fails it is moved
/// back, so the final path is either the new tree or exactly what was there
/// before. A direct rename is tried first. When that fails (typically across
/// devices) the tree is copied into a staging directory next to the final
/// path and renamed from there.
pub fn promote(ctx: &mut PipelineContext, fs: &dyn Filesystem) -> GgamiResult<()> {
    let temp = ctx
        .temp_dir()
        .map(Path::to_path_buf)
        .ok_or(ApplicationError::MissingTempDir { step: "Finalize" })?;
    let final_dir = ctx.final_dir().to_path_buf();

    if let Some(parent) = final_dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs.create_dir_all(parent)?;
    }

    let backup = if fs.exists(&final_dir) {
        let backup = sibling(&final_dir, "ggami-backup")?;
        debug!(from = %final_dir.display(), to = %backup.display(), "Moving existing target aside");
        fs.rename(&final_dir, &backup)?;
        Some(backup)
    } else {
        None
    };

    match move_tree(fs, &temp, &final_dir) {
        Ok(()) => {
            if let Some(backup) = backup {
                if let Err(e) = fs.remove_dir_all(&backup) {
                    warn!(path = %backup.display(), error = %e, "Could not remove previous target");
                }
            }
            ctx.take_temp_dir();
            info!(path = %final_dir.display(), "Project installed");
            Ok(())
        }
        Err(e) => {
            if let Some(backup) = backup {
                if let Err(restore) = fs.rename(&backup, &final_dir) {
                    warn!(
                        backup = %backup.display(),
                        error = %restore,
                        "Could not restore previous target"
                    );
                }
            }
            Err(e)
        }
    }
}

fn move_tree(fs: &dyn Filesystem, temp: &Path, final_dir: &Path) -> GgamiResult<()> {
    match fs.rename(temp, final_dir) {
        Ok(()) => return Ok(()),
        Err(e) => debug!(error = %e, "Rename failed, falling back to copy"),
    }

    let staging = sibling(final_dir, "ggami-staging")?;
    let staged = fs
        .copy_dir_all(temp, &staging)
        .and_then(|()| fs.rename(&staging, final_dir));
    if let Err(e) = staged {
        if let Err(cleanup) = fs.remove_dir_all(&staging) {
            warn!(path = %staging.display(), error = %cleanup, "Staging dir leaked");
        }
        return Err(e);
    }

    if let Err(e) = fs.remove_dir_all(temp) {
        warn!(path = %temp.display(), error = %e, "Temp dir leaked");
    }
    Ok(())
}

/// `<dir>.<tag>-<uuid>` next to `dir`.
fn sibling(dir: &Path, tag: &str) -> GgamiResult<PathBuf> {
    let name = dir
        .file_name()
        .ok_or_else(|| ApplicationError::FilesystemError {
            path: dir.to_path_buf(),
            reason: "target path has no final component".into(),
        })?
        .to_string_lossy();
    Ok(dir.with_file_name(format!("{}.{}-{}", name, tag, Uuid::new_v4().simple())))
}
