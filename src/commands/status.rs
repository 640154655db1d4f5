//! Command: show what each application currently links.
use std::path::PathBuf;

use anyhow::Result;

use super::CommandSetup;
use crate::cli::{GlobalOpts, StatusOpts};
use crate::config::{AppEntry, Config};
use crate::logging::{Log, Logger};
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::platform::Platform;
use crate::theme::{NamingTuple, StateInspector, scan};

/// Inferred state of one tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailStatus {
    /// Tail name.
    pub tail: String,
    /// Materialized location, if the app links this tail.
    pub target: Option<PathBuf>,
    /// Tuple of the linked file, if it could be inferred.
    pub current: Option<NamingTuple>,
}

/// Inferred state of one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStatusReport {
    /// Application name.
    pub app: String,
    /// `false` when the app is restricted to other platforms.
    pub supported: bool,
    /// Per-tail state, in tail order.
    pub tails: Vec<TailStatus>,
    /// Tuple shared by every known tail, if they agree.
    pub app_wide: Option<NamingTuple>,
}

/// Run the status command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or an app cannot be scanned.
pub fn run(global: &GlobalOpts, opts: &StatusOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let reports = inspect(&setup.config, &opts.apps, &setup.platform, &SystemFileSystemOps)?;
    print(&reports, log);
    Ok(())
}

/// Infer the current state of the named applications (all when empty).
///
/// # Errors
///
/// Returns an error if a named app is unknown or an app cannot be scanned.
pub fn inspect(
    config: &Config,
    names: &[String],
    platform: &Platform,
    fs: &dyn FileSystemOps,
) -> Result<Vec<AppStatusReport>> {
    let apps: Vec<&AppEntry> = if names.is_empty() {
        config.registry.iter().collect()
    } else {
        config.registry.select(names)?
    };
    let inspector = StateInspector::new(fs);

    apps.into_iter()
        .map(|app| {
            if !platform.supports(&app.platforms) {
                return Ok(AppStatusReport {
                    app: app.name.clone(),
                    supported: false,
                    tails: Vec::new(),
                    app_wide: None,
                });
            }
            let scan = scan(app, fs)?;
            let state = inspector.infer(app, scan.configs.tails());
            let tails = scan
                .configs
                .tails()
                .map(|tail| TailStatus {
                    tail: tail.to_string(),
                    target: app.target_for(tail),
                    current: state.tail(tail).cloned(),
                })
                .collect();
            Ok(AppStatusReport {
                app: app.name.clone(),
                supported: true,
                tails,
                app_wide: state.app_wide().cloned(),
            })
        })
        .collect()
}

fn print(reports: &[AppStatusReport], log: &dyn Log) {
    for report in reports {
        log.stage(&report.app);
        if !report.supported {
            log.info("not supported on this platform");
            continue;
        }
        if report.tails.is_empty() {
            log.info("no theme files");
            continue;
        }
        for tail in &report.tails {
            let current = tail
                .current
                .as_ref()
                .map_or_else(|| "unknown".to_string(), ToString::to_string);
            match &tail.target {
                Some(target) => log.info(&format!(
                    "{}: {current} ({})",
                    tail.tail,
                    target.display()
                )),
                None => log.info(&format!("{}: not linked (not in config_map)", tail.tail)),
            }
        }
        if let Some(app_wide) = &report.app_wide {
            log.info(&format!("app-wide: {app_wide}"));
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::operations::MockFileSystemOps;
    use crate::platform::Os;
    use std::path::Path;

    fn config(registry: &str) -> Config {
        Config {
            root: PathBuf::from("/cfg"),
            registry: crate::config::Registry::parse(
                registry,
                Path::new("/cfg"),
                Path::new("/home/u"),
            )
            .unwrap(),
        }
    }

    #[test]
    fn reports_per_tail_and_app_wide_state() {
        let config = config("[app.kitty]\nconfig_dir = \"/k\"\n");
        let fs = MockFileSystemOps::new()
            .with_files_in(
                "/cfg/apps/kitty/user",
                &[
                    "dark-any.kitty.conf",
                    "dark-any.colors.conf",
                    "light-any.kitty.conf",
                ],
            )
            .with_symlink("/k/kitty.conf", "/cfg/apps/kitty/user/dark-any.kitty.conf")
            .with_symlink("/k/colors.conf", "/cfg/apps/kitty/user/dark-any.colors.conf");

        let reports = inspect(&config, &[], &Platform::new(Os::Linux), &fs).unwrap();
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.tails.len(), 2);
        assert_eq!(report.tails[0].tail, "colors.conf");
        assert_eq!(report.tails[0].current, Some("dark-any".parse().unwrap()));
        assert_eq!(report.app_wide, Some("dark-any".parse().unwrap()));
    }

    #[test]
    fn unlinked_tail_is_unknown() {
        let config = config("[app.kitty]\nconfig_dir = \"/k\"\n");
        let fs = MockFileSystemOps::new()
            .with_files_in("/cfg/apps/kitty/user", &["dark-any.kitty.conf"]);

        let reports = inspect(&config, &[], &Platform::new(Os::Linux), &fs).unwrap();
        assert_eq!(reports[0].tails[0].current, None);
        assert_eq!(reports[0].app_wide, None);
    }

    #[test]
    fn other_platform_is_not_scanned() {
        let config = config("[app.reg]\nconfig_dir = \"/r\"\nplatforms = [\"windows\"]\n");
        let fs = MockFileSystemOps::new();

        let reports = inspect(&config, &[], &Platform::new(Os::Linux), &fs).unwrap();
        assert!(!reports[0].supported);
    }

    #[test]
    fn includes_optional_apps_when_listing_all() {
        let config = config("[app.a]\nconfig_dir = \"/a\"\nrequired = false\n");
        let fs = MockFileSystemOps::new();
        let reports = inspect(&config, &[], &Platform::new(Os::Linux), &fs).unwrap();
        assert_eq!(reports.len(), 1);
    }
}
