//! Non-fatal checks of the registry against the config tree.
use std::path::Path;

use super::registry::{APPS_DIR, AppLocation, REGISTRY_FILE, Registry};
use crate::platform::Platform;

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration source (e.g., "app_registry.toml", "apps/").
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for configuration validators.
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self, root: &Path, platform: &Platform) -> Vec<ValidationWarning>;

    /// Return a human-readable name for this validator.
    fn name(&self) -> &'static str;
}

/// Checks the registry against the `apps/` tree.
///
/// None of these problems stop a run; they usually mean a typo in the
/// registry or an application that is not installed.
#[derive(Debug)]
pub struct RegistryValidator<'a> {
    registry: &'a Registry,
}

impl<'a> RegistryValidator<'a> {
    /// Create a validator for `registry`.
    #[must_use]
    pub const fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }
}

impl ConfigValidator for RegistryValidator<'_> {
    fn validate(&self, root: &Path, platform: &Platform) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if !self.registry.found {
            warnings.push(ValidationWarning::new(
                REGISTRY_FILE,
                root.display().to_string(),
                "registry missing or has no [app] table; no apps will be themed",
            ));
        }

        for app in self.registry.iter() {
            if !app.dir.is_dir() {
                warnings.push(ValidationWarning::new(
                    REGISTRY_FILE,
                    &app.name,
                    format!("no theme directory at {}", app.dir.display()),
                ));
            }

            if !platform.supports(&app.platforms) {
                continue;
            }

            if let AppLocation::Dir(dir) = &app.location
                && !dir.is_dir()
            {
                warnings.push(ValidationWarning::new(
                    REGISTRY_FILE,
                    &app.name,
                    format!("config_dir does not exist: {}", dir.display()),
                ));
            }
        }

        if let Ok(entries) = std::fs::read_dir(root.join(APPS_DIR)) {
            let mut unregistered: Vec<String> = entries
                .filter_map(Result::ok)
                .filter(|e| e.path().is_dir())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|name| self.registry.get(name).is_none())
                .collect();
            unregistered.sort();
            for name in unregistered {
                warnings.push(ValidationWarning::new(
                    APPS_DIR,
                    &name,
                    "directory has no registry entry",
                ));
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "registry"
    }
}
