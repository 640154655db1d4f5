//! Configuration root discovery and registry loading.
pub mod registry;
pub mod toml_loader;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub use registry::{AppEntry, AppLocation, Registry};

/// Directory under the config root holding palette color files.
pub const PALETTES_DIR: &str = "palettes";

/// Loaded configuration for one invocation.
#[derive(Debug)]
pub struct Config {
    /// Configuration root (`app_registry.toml`, `apps/`, `palettes/`).
    pub root: PathBuf,
    /// Registered applications.
    pub registry: Registry,
}

impl Config {
    /// Load the registry under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRoot`] if `root` does not exist,
    /// [`ConfigError::MissingAppsDir`] if `root/apps` is missing or empty, or
    /// any error from [`Registry::load`].
    pub fn load(root: &Path, home: &Path) -> Result<Self, ConfigError> {
        if !root.is_dir() {
            return Err(ConfigError::MissingRoot(root.to_path_buf()));
        }

        let apps_dir = root.join(registry::APPS_DIR);
        let has_apps = std::fs::read_dir(&apps_dir)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
        if !has_apps {
            return Err(ConfigError::MissingAppsDir(apps_dir));
        }

        let registry = Registry::load(root, home)?;
        Ok(Self {
            root: root.to_path_buf(),
            registry,
        })
    }

    /// Directory holding the palette color files.
    #[must_use]
    pub fn palettes_dir(&self) -> PathBuf {
        self.root.join(PALETTES_DIR)
    }
}
