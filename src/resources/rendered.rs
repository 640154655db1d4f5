//! Rendered template output written into an app's `generated/` directory.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::helpers::fs::write_atomic;
use super::{Resource, ResourceState};

/// A file whose content is fully determined by a rendered template.
#[derive(Debug, Clone)]
pub struct RenderedFileResource {
    /// Output path.
    pub path: PathBuf,
    /// Desired content.
    pub content: String,
}

impl RenderedFileResource {
    /// Create a new rendered file resource.
    #[must_use]
    pub const fn new(path: PathBuf, content: String) -> Self {
        Self { path, content }
    }
}

impl Resource for RenderedFileResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn current_state(&self) -> Result<ResourceState> {
        if self.path.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: "output path is a directory".to_string(),
            });
        }
        match std::fs::read_to_string(&self.path) {
            Ok(existing) if existing == self.content => Ok(ResourceState::Correct),
            Ok(_) => Ok(ResourceState::Incorrect {
                current: "content differs".to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ResourceState::Missing),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    fn apply(&self) -> Result<()> {
        write_atomic(&self.path, &self.content)
    }
}
