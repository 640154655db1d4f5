//! Symlink resource with atomic replacement.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::helpers::fs::{commit_staged, remove_existing, temp_sibling};
use super::{Resource, ResourceState};

/// A symlink at a materialized location pointing at a theme file.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The theme file (what the symlink points to).
    pub source: PathBuf,
    /// The materialized location (where the symlink lives).
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Resource for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        if !self.source.exists() {
            return Ok(ResourceState::Invalid {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }

        if let Some(parent) = self.target.parent()
            && !parent.as_os_str().is_empty()
            && !parent.is_dir()
        {
            return Ok(ResourceState::Invalid {
                reason: format!("parent directory does not exist: {}", parent.display()),
            });
        }

        match std::fs::symlink_metadata(&self.target) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ResourceState::Missing),
            Err(e) => {
                Err(e).with_context(|| format!("reading metadata: {}", self.target.display()))
            }
            Ok(meta) if !meta.file_type().is_symlink() => Ok(ResourceState::Invalid {
                reason: if meta.is_dir() {
                    "target is a real directory".to_string()
                } else {
                    "target is a regular file, not a symlink".to_string()
                },
            }),
            Ok(_) => {
                let existing = std::fs::read_link(&self.target)
                    .with_context(|| format!("reading link: {}", self.target.display()))?;
                if paths_equal(&existing, &self.source) {
                    Ok(ResourceState::Correct)
                } else {
                    Ok(ResourceState::Incorrect {
                        current: format!("points to {}", existing.display()),
                    })
                }
            }
        }
    }

    /// Point the target at the source.
    ///
    /// A new link is created under a hidden sibling name and renamed over the
    /// target, so the target is never observed missing or half-written.
    fn apply(&self) -> Result<()> {
        let staged = temp_sibling(&self.target);
        remove_existing(&staged)?;
        create_symlink(&self.source, &staged)?;
        commit_staged(&staged, &self.target)
            .with_context(|| format!("replace link: {}", self.target.display()))?;
        Ok(())
    }
}

/// Compare two paths for equality, handling UNC prefix normalization on Windows.
fn paths_equal(a: &Path, b: &Path) -> bool {
    let normalize = |p: &Path| -> PathBuf {
        #[cfg(windows)]
        {
            let s = p.to_string_lossy();
            if let Some(stripped) = s.strip_prefix(r"\\?\") {
                return PathBuf::from(stripped);
            }
        }
        p.to_path_buf()
    };

    normalize(a) == normalize(b)
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    std::os::unix::fs::symlink(target, link).with_context(|| {
        format!(
            "creating symlink {} -> {}",
            link.display(),
            target.display()
        )
    })?;

    #[cfg(windows)]
    std::os::windows::fs::symlink_file(target, link).with_context(|| {
        format!(
            "creating symlink {} -> {}",
            link.display(),
            target.display()
        )
    })?;

    Ok(())
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        source: PathBuf,
        other: PathBuf,
        target: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("dark-any.conf");
        let other = dir.path().join("light-any.conf");
        std::fs::write(&source, "dark").unwrap();
        std::fs::write(&other, "light").unwrap();
        std::fs::create_dir(dir.path().join("cfg")).unwrap();
        let target = dir.path().join("cfg/conf");
        Fixture {
            _dir: dir,
            source,
            other,
            target,
        }
    }

    #[test]
    fn missing_then_applied_then_correct() {
        let f = fixture();
        let res = SymlinkResource::new(f.source.clone(), f.target.clone());
        assert_eq!(res.current_state().unwrap(), ResourceState::Missing);
        res.apply().unwrap();
        assert_eq!(res.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(std::fs::read_link(&f.target).unwrap(), f.source);
        assert!(!temp_sibling(&f.target).exists());
    }

    #[test]
    fn replaces_existing_link() {
        let f = fixture();
        std::os::unix::fs::symlink(&f.other, &f.target).unwrap();
        let res = SymlinkResource::new(f.source.clone(), f.target.clone());
        assert!(matches!(
            res.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
        res.apply().unwrap();
        assert_eq!(std::fs::read_link(&f.target).unwrap(), f.source);
        assert_eq!(std::fs::read_to_string(&f.target).unwrap(), "dark");
    }

    #[test]
    fn replaces_broken_link() {
        let f = fixture();
        std::os::unix::fs::symlink(f.target.with_file_name("gone"), &f.target).unwrap();
        let res = SymlinkResource::new(f.source.clone(), f.target.clone());
        assert!(matches!(
            res.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
        res.apply().unwrap();
        assert_eq!(res.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn refuses_regular_file() {
        let f = fixture();
        std::fs::write(&f.target, "user content").unwrap();
        let res = SymlinkResource::new(f.source.clone(), f.target.clone());
        assert!(matches!(
            res.current_state().unwrap(),
            ResourceState::Invalid { reason } if reason.contains("regular file")
        ));
    }

    #[test]
    fn refuses_missing_parent() {
        let f = fixture();
        let res = SymlinkResource::new(f.source.clone(), f.target.with_file_name("nope/conf"));
        assert!(matches!(
            res.current_state().unwrap(),
            ResourceState::Invalid { reason } if reason.contains("parent")
        ));
    }

    #[test]
    fn missing_source_is_invalid() {
        let f = fixture();
        let res = SymlinkResource::new(f.source.with_file_name("x.conf"), f.target.clone());
        assert!(matches!(
            res.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
    }

    #[test]
    fn description_shows_both_paths() {
        let res = SymlinkResource::new(PathBuf::from("/s"), PathBuf::from("/t"));
        assert_eq!(res.description(), "/t -> /s");
    }
}
