#![allow(dead_code, clippy::expect_used, clippy::new_without_default)]
//! Shared helpers for integration tests.
//!
//! Provides an [`IntegrationTestContext`] backed by a temporary config root
//! and home directory, a [`TestContextBuilder`] for laying out application
//! files, and a [`RecordingExecutor`] standing in for `sh`.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use themeconf_cli::cli::SetOpts;
use themeconf_cli::config::{Config, PALETTES_DIR};
use themeconf_cli::exec::{ExecResult, Executor};
use themeconf_cli::logging::{Log, Logger};
use themeconf_cli::operations::SystemFileSystemOps;
use themeconf_cli::platform::{Os, Platform};
use themeconf_cli::render::TomlTemplateRenderer;
use themeconf_cli::tasks::Context;

/// One recorded script invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCall {
    /// File name of the script.
    pub name: String,
    /// Positional arguments.
    pub args: Vec<String>,
    /// Extra environment variables.
    pub env: Vec<(String, String)>,
}

impl ScriptCall {
    /// Value of the environment variable `key`, if it was set.
    pub fn env(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// [`Executor`] that records every call instead of spawning `sh`.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<ScriptCall>>,
    failing: Vec<PathBuf>,
}

impl RecordingExecutor {
    /// Make scripts whose path ends with `suffix` (e.g. `alpha/call/dark-any.sh`)
    /// exit non-zero.
    pub fn failing(mut self, suffix: &str) -> Self {
        self.failing.push(PathBuf::from(suffix));
        self
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<ScriptCall> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Executor for RecordingExecutor {
    fn run_script(
        &self,
        script: &Path,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> anyhow::Result<ExecResult> {
        let name = script
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls.lock().expect("calls lock").push(ScriptCall {
            name,
            args: args.iter().map(ToString::to_string).collect(),
            env: env
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        });
        if self.failing.iter().any(|suffix| script.ends_with(suffix)) {
            anyhow::bail!("{} failed (exit 1): boom", script.display());
        }
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        })
    }
}

/// A temporary config root plus home directory.
///
/// Layout:
///
/// ```text
/// <tmp>/root/app_registry.toml
/// <tmp>/root/apps/<app>/{user,generated,templates,call}/
/// <tmp>/root/palettes/<palette>/colors.json
/// <tmp>/home/
/// ```
pub struct IntegrationTestContext {
    /// Owns the temporary directory.
    pub tmp: TempDir,
    /// Config root.
    pub root: PathBuf,
    /// Fake home directory.
    pub home: PathBuf,
}

impl IntegrationTestContext {
    /// Create an empty root and home.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = tmp.path().join("root");
        let home = tmp.path().join("home");
        std::fs::create_dir_all(root.join("apps")).expect("create apps dir");
        std::fs::create_dir_all(&home).expect("create home dir");
        Self { tmp, root, home }
    }

    /// Load the registry.
    pub fn load_config(&self) -> Config {
        Config::load(&self.root, &self.home).expect("load config")
    }

    /// Build a Linux [`Context`] around `executor`.
    pub fn context(
        &self,
        executor: Arc<RecordingExecutor>,
        dry_run: bool,
    ) -> (Context, Arc<Logger>) {
        let log = Arc::new(Logger::with_log_file(None));
        let ctx = Context {
            platform: Arc::new(Platform::new(Os::Linux)),
            log: Arc::clone(&log) as Arc<dyn Log>,
            dry_run,
            executor,
            renderer: Arc::new(TomlTemplateRenderer::new(self.root.join(PALETTES_DIR))),
            fs_ops: Arc::new(SystemFileSystemOps),
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        (ctx, log)
    }

    /// Path under the home directory.
    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home.join(rel)
    }

    /// Target of the symlink at `home/rel`, if it is one.
    pub fn link_target(&self, rel: &str) -> Option<PathBuf> {
        std::fs::read_link(self.home.join(rel)).ok()
    }

    /// File name of the symlink target at `home/rel`.
    pub fn linked_name(&self, rel: &str) -> Option<String> {
        self.link_target(rel)
            .and_then(|t| t.file_name().map(|n| n.to_string_lossy().into_owned()))
    }

    /// Point `home/rel` at `apps/<app>/user/<file>` as if a previous run did.
    pub fn link_existing(&self, rel: &str, app: &str, file: &str) {
        let link = self.home.join(rel);
        if let Some(parent) = link.parent() {
            std::fs::create_dir_all(parent).expect("create link parent");
        }
        let source = self.root.join("apps").join(app).join("user").join(file);
        symlink(&source, &link);
    }

    /// Remove `apps/<app>/<source>/<file>`.
    pub fn remove(&self, app: &str, source: &str, file: &str) {
        std::fs::remove_file(self.root.join("apps").join(app).join(source).join(file))
            .expect("remove candidate");
    }
}

#[cfg(unix)]
fn symlink(source: &Path, link: &Path) {
    std::os::unix::fs::symlink(source, link).expect("create symlink");
}

#[cfg(windows)]
fn symlink(source: &Path, link: &Path) {
    std::os::windows::fs::symlink_file(source, link).expect("create symlink");
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building an empty context.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `app_registry.toml`.
    pub fn with_registry(self, content: &str) -> Self {
        std::fs::write(self.ctx.root.join("app_registry.toml"), content)
            .expect("write registry");
        self
    }

    /// Create `home/rel` as a directory.
    pub fn with_home_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.ctx.home.join(rel)).expect("create home subdir");
        self
    }

    /// Write `apps/<app>/<source>/<file>`.
    pub fn with_file(self, app: &str, source: &str, file: &str, content: &str) -> Self {
        let dir = self.ctx.root.join("apps").join(app).join(source);
        std::fs::create_dir_all(&dir).expect("create source dir");
        std::fs::write(dir.join(file), content).expect("write candidate");
        self
    }

    /// Write `apps/<app>/user/<file>` for every name in `files`.
    pub fn with_user_files(mut self, app: &str, files: &[&str]) -> Self {
        for file in files {
            self = self.with_file(app, "user", file, file);
        }
        self
    }

    /// Write `palettes/<palette>/colors.json`.
    pub fn with_palette(self, palette: &str, json: &str) -> Self {
        let dir = self.ctx.root.join(PALETTES_DIR).join(palette);
        std::fs::create_dir_all(&dir).expect("create palette dir");
        std::fs::write(dir.join("colors.json"), json).expect("write colors");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

/// Options for `themeconf set` with the given request values and app names.
pub fn set_opts(scheme: Option<&str>, palette: Option<&str>, apps: &[&str]) -> SetOpts {
    SetOpts {
        scheme: scheme.map(|s| s.parse().expect("scheme request")),
        palette: palette.map(|p| p.parse().expect("palette request")),
        refresh: false,
        apps: apps.iter().map(ToString::to_string).collect(),
    }
}
