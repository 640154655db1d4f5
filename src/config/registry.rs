//! Application registry loaded from `app_registry.toml`.
//!
//! ```toml
//! [app.kitty]
//! config_dir = "~/.config/kitty"
//!
//! [app.nvim]
//! config_map = { "theme.lua" = "~/.config/nvim/lua/theme.lua" }
//! required = false
//! platforms = ["linux", "macos"]
//! ```
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::toml_loader;
use crate::error::ConfigError;
use crate::platform::Os;
use crate::theme::Source;

/// File name of the registry under the config root.
pub const REGISTRY_FILE: &str = "app_registry.toml";

/// Directory under the config root holding one directory per application.
pub const APPS_DIR: &str = "apps";

#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    app: Option<BTreeMap<String, AppSpec>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AppSpec {
    config_dir: Option<String>,
    config_map: Option<BTreeMap<String, String>>,
    #[serde(default = "default_required")]
    required: bool,
    #[serde(default)]
    platforms: Vec<String>,
    separator: Option<String>,
}

const fn default_required() -> bool {
    true
}

/// Where an application's active theme files are materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppLocation {
    /// Every tail is linked as `<dir>/<tail>`.
    Dir(PathBuf),
    /// Only the listed tails are linked, each to its own path.
    Map(BTreeMap<String, PathBuf>),
}

/// One registered application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    /// Application name (also its directory name under `apps/`).
    pub name: String,
    /// Whether the app is themed when no apps are named explicitly.
    pub required: bool,
    /// Materialization location.
    pub location: AppLocation,
    /// Platforms the app is themed on; empty means all.
    pub platforms: Vec<Os>,
    /// Separator between key and value in rendered templates.
    pub separator: String,
    /// `<root>/apps/<name>`.
    pub dir: PathBuf,
}

impl AppEntry {
    /// Internal directory holding files of the given source.
    #[must_use]
    pub fn source_dir(&self, source: Source) -> PathBuf {
        self.dir.join(source.dir_name())
    }

    /// Materialized location of `tail`, if this app links it at all.
    #[must_use]
    pub fn target_for(&self, tail: &str) -> Option<PathBuf> {
        match &self.location {
            AppLocation::Dir(dir) => Some(dir.join(tail)),
            AppLocation::Map(map) => map.get(tail).cloned(),
        }
    }
}

/// All registered applications, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    apps: BTreeMap<String, AppEntry>,
    /// `false` when `app_registry.toml` was missing or had no `[app]` table.
    pub found: bool,
}

impl Registry {
    /// Load the registry under `root`, expanding `~` against `home`.
    ///
    /// A missing registry file yields an empty registry with `found == false`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
    /// any application has an invalid location or platform list.
    pub fn load(root: &Path, home: &Path) -> Result<Self, ConfigError> {
        let file: Option<RegistryFile> = toml_loader::load_config(&root.join(REGISTRY_FILE))?;
        Self::from_file(file.unwrap_or_default(), root, home)
    }

    /// Parse registry TOML text (used by tests and tooling).
    ///
    /// # Errors
    ///
    /// Same as [`Registry::load`].
    pub fn parse(content: &str, root: &Path, home: &Path) -> Result<Self, ConfigError> {
        let file: RegistryFile = toml_loader::parse_config(&root.join(REGISTRY_FILE), content)?;
        Self::from_file(file, root, home)
    }

    fn from_file(file: RegistryFile, root: &Path, home: &Path) -> Result<Self, ConfigError> {
        let Some(specs) = file.app else {
            return Ok(Self::default());
        };
        let apps_dir = root.join(APPS_DIR);
        let mut apps = BTreeMap::new();
        for (name, spec) in specs {
            let entry = build_entry(&name, spec, &apps_dir, home)?;
            apps.insert(name, entry);
        }
        Ok(Self { apps, found: true })
    }

    /// Look up an application by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AppEntry> {
        self.apps.get(name)
    }

    /// Iterate over all applications in name order.
    pub fn iter(&self) -> impl Iterator<Item = &AppEntry> {
        self.apps.values()
    }

    /// Number of registered applications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// `true` if no applications are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Choose the applications to theme.
    ///
    /// With no names, every `required` app is chosen.  Named apps are chosen
    /// in the order given, duplicates dropped, regardless of `required`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownApp`] for the first name not in the registry.
    pub fn select(&self, names: &[String]) -> Result<Vec<&AppEntry>, ConfigError> {
        if names.is_empty() {
            return Ok(self.apps.values().filter(|a| a.required).collect());
        }
        let mut chosen: Vec<&AppEntry> = Vec::with_capacity(names.len());
        for name in names {
            let app = self
                .get(name)
                .ok_or_else(|| ConfigError::UnknownApp(name.clone()))?;
            if !chosen.iter().any(|a| a.name == app.name) {
                chosen.push(app);
            }
        }
        Ok(chosen)
    }
}

fn build_entry(
    name: &str,
    spec: AppSpec,
    apps_dir: &Path,
    home: &Path,
) -> Result<AppEntry, ConfigError> {
    let location = match (spec.config_dir, spec.config_map) {
        (Some(_), Some(_)) => {
            return Err(ConfigError::ConflictingLocation {
                app: name.to_string(),
            });
        }
        (None, None) => {
            return Err(ConfigError::MissingLocation {
                app: name.to_string(),
            });
        }
        (Some(dir), None) => AppLocation::Dir(expand_home(&dir, home)),
        (None, Some(map)) => AppLocation::Map(
            map.into_iter()
                .map(|(tail, path)| {
                    let path = expand_home(&path, home);
                    (tail, path)
                })
                .collect(),
        ),
    };

    let platforms = spec
        .platforms
        .iter()
        .map(|p| {
            p.parse::<Os>().map_err(|_| ConfigError::UnknownPlatform {
                app: name.to_string(),
                platform: p.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AppEntry {
        name: name.to_string(),
        required: spec.required,
        location,
        platforms,
        separator: spec.separator.unwrap_or_else(|| " ".to_string()),
        dir: apps_dir.join(name),
    })
}

/// Expand a leading `~` to `home`.
#[must_use]
pub fn expand_home(raw: &str, home: &Path) -> PathBuf {
    if raw == "~" {
        return home.to_path_buf();
    }
    raw.strip_prefix("~/")
        .map_or_else(|| PathBuf::from(raw), |rest| home.join(rest))
}
