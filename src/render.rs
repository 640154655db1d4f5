//! Template rendering for `templates/<scheme>-<palette>.<tail>.toml` files.
//!
//! A template is a flat TOML table mapping config keys to lookups:
//!
//! ```toml
//! background = "bg"
//! foreground = "fg"
//! cursor = "accent.blue"
//! theme_name = "palette"
//! ```
//!
//! Each entry renders, in file order, to `key<separator>value`.  The lookups
//! `scheme` and `palette` resolve to the bound values; anything else is a
//! dotted path into `palettes/<palette>/colors.json`, tried first under the
//! object named after the scheme and then at the top level.
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ApplyError;
use crate::theme::{NamingTuple, Palette};

/// Name of the color file inside each palette directory.
pub const COLORS_FILE: &str = "colors.json";

/// Renders a template file for a given scheme and palette.
pub trait TemplateRenderer: Send + Sync + std::fmt::Debug {
    /// Render `template` with `bindings`, joining keys and values with `separator`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError::Render`] if the template cannot be read or
    /// parsed, or a lookup cannot be resolved.
    fn render(
        &self,
        template: &Path,
        bindings: &NamingTuple,
        separator: &str,
    ) -> Result<String, ApplyError>;
}

/// Default renderer backed by per-palette `colors.json` files.
#[derive(Debug, Clone)]
pub struct TomlTemplateRenderer {
    palettes_dir: PathBuf,
}

impl TomlTemplateRenderer {
    /// Create a renderer reading palettes from `palettes_dir`.
    #[must_use]
    pub const fn new(palettes_dir: PathBuf) -> Self {
        Self { palettes_dir }
    }

    /// Render template `content` (already read from disk).
    ///
    /// # Errors
    ///
    /// Returns a message describing the first problem found.
    pub fn render_str(
        &self,
        content: &str,
        bindings: &NamingTuple,
        separator: &str,
    ) -> Result<String, String> {
        let table: toml::Table = toml::from_str(content).map_err(|e| e.message().to_string())?;
        let mut colors: Option<Value> = None;
        let mut out = String::new();

        for (key, value) in &table {
            let lookup = value
                .as_str()
                .ok_or_else(|| format!("value of '{key}' must be a string lookup"))?;
            let resolved = match lookup {
                "scheme" => bindings.scheme.as_str().to_string(),
                "palette" => bindings.palette.as_str().to_string(),
                path => {
                    if colors.is_none() {
                        colors = Some(self.load_colors(&bindings.palette)?);
                    }
                    let colors = colors.as_ref().ok_or("palette colors unavailable")?;
                    lookup_color(colors, bindings, path)?
                }
            };
            let _ = writeln!(out, "{key}{separator}{resolved}");
        }
        Ok(out)
    }

    fn load_colors(&self, palette: &Palette) -> Result<Value, String> {
        let Palette::Named(name) = palette else {
            return Err("palette is 'any'; color lookups need a named palette".to_string());
        };
        let path = self.palettes_dir.join(name).join(COLORS_FILE);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("reading {}: {e}", path.display()))?;
        serde_json::from_str(&content).map_err(|e| format!("parsing {}: {e}", path.display()))
    }
}

impl TemplateRenderer for TomlTemplateRenderer {
    fn render(
        &self,
        template: &Path,
        bindings: &NamingTuple,
        separator: &str,
    ) -> Result<String, ApplyError> {
        let to_err = |reason: String| ApplyError::Render {
            template: template.to_path_buf(),
            reason,
        };
        let content = std::fs::read_to_string(template).map_err(|e| to_err(e.to_string()))?;
        self.render_str(&content, bindings, separator).map_err(to_err)
    }
}

fn lookup_color(colors: &Value, bindings: &NamingTuple, path: &str) -> Result<String, String> {
    let scoped = bindings
        .scheme
        .is_concrete()
        .then(|| colors.get(bindings.scheme.as_str()))
        .flatten()
        .and_then(|scope| walk(scope, path));
    let value = scoped
        .or_else(|| walk(colors, path))
        .ok_or_else(|| format!("unknown color '{path}' in palette '{}'", bindings.palette))?;
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            Err(format!("color '{path}' is not a scalar"))
        }
    }
}

fn walk<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(root, |node, key| node.get(key))
}
