//! Top-level subcommand orchestration (`set`, `status`, `version`).
pub mod set;
pub mod status;
pub mod version;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::config::validation::{ConfigValidator as _, RegistryValidator};
use crate::logging::Logger;
use crate::platform::Platform;
use crate::tasks::{self, Context, Task};

/// Environment variable overriding the configuration root.
pub const ROOT_ENV: &str = "THEMECONF_ROOT";

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Detected platform.
    pub platform: Platform,
    /// Loaded configuration.
    pub config: Config,
}

impl CommandSetup {
    /// Detect the platform, locate the root, and load the registry.
    ///
    /// Registry problems that do not prevent a run are logged as warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory is unknown, or the root or
    /// registry is missing or invalid.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let platform = Platform::detect();
        let home = tasks::home_dir()?;
        let root = resolve_root(
            global.root.as_deref(),
            std::env::var_os(ROOT_ENV),
            std::env::var_os("XDG_CONFIG_HOME"),
            &home,
        );

        log.stage("Loading configuration");
        log.debug(&format!("root: {}", root.display()));
        let config = Config::load(&root, &home)?;
        log.info(&format!(
            "{} app(s) registered in {}",
            config.registry.len(),
            root.display()
        ));

        let warnings = RegistryValidator::new(&config.registry).validate(&root, &platform);
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.source, warning.item, warning.message
                ));
            }
        }

        Ok(Self { platform, config })
    }
}

/// Pick the configuration root.
///
/// Order: `--root`, then `$THEMECONF_ROOT`, then
/// `$XDG_CONFIG_HOME/themeconf`, then `~/.config/themeconf`.  The result is
/// canonicalized when it exists.
#[must_use]
pub fn resolve_root(
    explicit: Option<&Path>,
    env_root: Option<OsString>,
    xdg_config: Option<OsString>,
    home: &Path,
) -> PathBuf {
    let root = explicit
        .map(Path::to_path_buf)
        .or_else(|| env_root.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| {
            xdg_config
                .filter(|v| !v.is_empty())
                .map_or_else(|| home.join(".config"), PathBuf::from)
                .join("themeconf")
        });
    dunce::canonicalize(&root).unwrap_or(root)
}

/// Execute every task in order, print the summary, and bail if any task
/// failed or the run was interrupted.
///
/// # Errors
///
/// Returns an error if one or more applications recorded a failure, or the
/// run was cancelled.
pub fn run_apps_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        tasks::execute(task, ctx);
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} application(s) failed");
    }
    if ctx.is_cancelled() {
        anyhow::bail!("interrupted");
    }
    Ok(())
}
