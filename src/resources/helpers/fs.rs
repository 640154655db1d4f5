//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Hidden sibling of `path` used to stage a replacement.
///
/// Staging next to the target keeps the final rename on one filesystem, and
/// the leading `.` keeps the staged file out of candidate scans.
#[must_use]
pub fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "target".into(), |n| n.to_string_lossy());
    let tmp = format!(".{name}.themeconf_tmp");
    path.parent()
        .map_or_else(|| PathBuf::from(&tmp), |parent| parent.join(&tmp))
}

/// Remove an existing file or symlink at `path`, including broken symlinks.
///
/// Does nothing if `path` does not exist.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<()> {
    if path.symlink_metadata().is_ok() {
        std::fs::remove_file(path)
            .with_context(|| format!("remove existing: {}", path.display()))?;
    }
    Ok(())
}

/// Replace `target` with `staged` in a single rename.
///
/// On failure the staged file is removed and `target` is left untouched.
///
/// # Errors
///
/// Returns an error if the rename fails.
pub fn commit_staged(staged: &Path, target: &Path) -> Result<()> {
    if let Err(e) = std::fs::rename(staged, target) {
        let _ = std::fs::remove_file(staged);
        return Err(e)
            .with_context(|| format!("rename {} to {}", staged.display(), target.display()));
    }
    Ok(())
}

/// Write `content` to `path` atomically (stage to a sibling, then rename).
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    let tmp = temp_sibling(path);
    std::fs::write(&tmp, content).with_context(|| format!("write {}", tmp.display()))?;
    commit_staged(&tmp, path)
}
