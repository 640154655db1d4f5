//! Domain-specific error types for the theme engine.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`],
//! [`NamingError`]) while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ThemeconfError
//! ├── Config(ConfigError)  — registry problems, unknown apps (fatal)
//! ├── Naming(NamingError)  — malformed or ambiguous theme file names
//! └── Apply(ApplyError)    — per-application materialization failures
//! ```
//!
//! Failing to infer the active theme is not an error: inference returns
//! `None` and the resolver falls back to `any`.  A tail with no matching
//! candidate is not an error either.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the theme engine.
#[derive(Error, Debug)]
pub enum ThemeconfError {
    /// Registry or command-line configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Theme file naming error.
    #[error("Naming error: {0}")]
    Naming(#[from] NamingError),

    /// Failure while materializing one application's theme.
    #[error("Apply error: {0}")]
    Apply(#[from] ApplyError),
}

/// Errors in the application registry or in which applications were requested.
///
/// Every variant aborts the run before anything is applied.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An application sets both `config_dir` and `config_map`.
    #[error("app '{app}' sets both config_dir and config_map")]
    ConflictingLocation {
        /// Application name.
        app: String,
    },

    /// An application sets neither `config_dir` nor `config_map`.
    #[error("app '{app}' sets neither config_dir nor config_map")]
    MissingLocation {
        /// Application name.
        app: String,
    },

    /// An application was requested by name but is not in the registry.
    #[error("app '{0}' is not in the registry")]
    UnknownApp(String),

    /// The configuration root does not exist.
    #[error("config root does not exist: {}", .0.display())]
    MissingRoot(PathBuf),

    /// The `apps/` directory under the configuration root is missing or empty.
    #[error("no apps found under {}", .0.display())]
    MissingAppsDir(PathBuf),

    /// A platform name in an application's `platforms` list is not recognised.
    #[error("app '{app}' lists unknown platform '{platform}'")]
    UnknownPlatform {
        /// Application name.
        app: String,
        /// Offending platform name.
        platform: String,
    },

    /// The registry file could not be read.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The registry file is not valid TOML or has the wrong shape.
    #[error("invalid registry {}: {message}", path.display())]
    Parse {
        /// Path to the registry file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

/// Errors in theme file names and theme requests.
#[derive(Error, Debug)]
pub enum NamingError {
    /// A name does not follow `<scheme>-<palette>.<tail>`.
    #[error("malformed theme name '{name}': {reason}")]
    Malformed {
        /// The offending name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A file name carries the `auto` tag, which is only valid in requests.
    #[error("'{name}' uses 'auto', which is only valid in a request")]
    AutoInFileName {
        /// The offending file name.
        name: String,
    },

    /// Two files of the same source claim the same tail and tuple.
    #[error(
        "app '{app}': {} and {} both provide {tuple} for tail '{tail}'",
        first.display(),
        second.display()
    )]
    Ambiguous {
        /// Application name.
        app: String,
        /// Tail both files provide.
        tail: String,
        /// Rendered naming tuple both files carry.
        tuple: String,
        /// File seen first.
        first: PathBuf,
        /// File seen second.
        second: PathBuf,
    },
}

/// Per-application failures while materializing a theme.
///
/// These never abort the run; other applications proceed and the failure is
/// reported in the run summary.
#[derive(Error, Debug)]
pub enum ApplyError {
    /// A materialized location is occupied by something that must not be replaced.
    #[error("refusing to replace {}: {reason}", target.display())]
    TargetRefused {
        /// Materialized location.
        target: PathBuf,
        /// Why it was refused.
        reason: String,
    },

    /// Writing a link or rendered file failed.
    #[error("failed to write {}: {reason}", target.display())]
    Write {
        /// Path being written.
        target: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// A template could not be rendered.
    #[error("failed to render {}: {reason}", template.display())]
    Render {
        /// Template path.
        template: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// A reload script failed to start or exited non-zero.
    #[error("reload script {} failed: {reason}", script.display())]
    Script {
        /// Script path.
        script: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// One or more tails failed; reload scripts were not run.
    #[error("{} tail(s) failed: {}", failures.len(), failures.join("; "))]
    Tails {
        /// One message per failed tail.
        failures: Vec<String>,
    },
}
