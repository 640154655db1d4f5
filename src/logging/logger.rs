//! Structured logger with dry-run awareness and summary collection.
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{AppStatus, Log, RunEntry};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and per-application summary.
///
/// Messages go through [`tracing`]; the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) also appends them to
/// `$XDG_CACHE_HOME/themeconf/<command>.log`.
#[derive(Debug)]
pub struct Logger {
    apps: Mutex<Vec<RunEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// written by the subscriber's file layer.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger reporting `log_file` (or none) in its summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            apps: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded application entries.
    #[must_use]
    pub fn entries(&self) -> Vec<RunEntry> {
        self.apps.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record an application outcome for the summary.
    pub fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.apps.lock() {
            guard.push(RunEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed applications.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.apps.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|t| t.status == AppStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded applications.
    pub fn print_summary(&self) {
        let apps = self.entries();
        if apps.is_empty() {
            return;
        }

        self.info("");
        self.stage("Summary");

        let mut ok = 0u32;
        let mut unchanged = 0u32;
        let mut not_applicable = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;
        let mut cancelled = 0u32;

        for app in &apps {
            let (icon, color) = match app.status {
                AppStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                AppStatus::Unchanged => {
                    unchanged += 1;
                    ("○", "\x1b[33m")
                }
                AppStatus::NotApplicable => {
                    not_applicable += 1;
                    ("·", "\x1b[2m")
                }
                AppStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                AppStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
                AppStatus::Cancelled => {
                    cancelled += 1;
                    ("-", "\x1b[2m")
                }
            };

            let suffix = app
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", app.name));
        }

        self.info("");
        let total = apps.len();
        let mut line = format!(
            "{total} apps: \x1b[32m{ok} ok\x1b[0m, \x1b[33m{unchanged} unchanged\x1b[0m, \x1b[2m{not_applicable} n/a\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        );
        if cancelled > 0 {
            let _ = write!(line, ", \x1b[2m{cancelled} cancelled\x1b[0m");
        }
        self.info(&line);

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>) {
        self.record_app(name, status, message);
    }
}
