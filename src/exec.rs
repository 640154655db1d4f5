//! Subprocess execution for reload scripts.
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Runs reload scripts.  Swapped for a recording mock in tests.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run `script` with `sh`, in the script's directory, with `args` and
    /// extra `env` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be started or exits non-zero.
    fn run_script(
        &self,
        script: &Path,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult>;
}

/// Production [`Executor`] that spawns real processes.
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_script(
        &self,
        script: &Path,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult> {
        let mut cmd = Command::new("sh");
        cmd.arg(script).args(args);
        if let Some(dir) = script.parent() {
            cmd.current_dir(dir);
        }
        for (k, v) in env {
            cmd.env(k, v);
        }
        execute_checked(cmd, &script.display().to_string())
    }
}

/// Execute a command and return the result, bailing on non-zero exit.
fn execute_checked(mut cmd: Command, label: &str) -> Result<ExecResult> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to execute: {label}"))?;
    let result = ExecResult::from(output);
    if !result.success {
        bail!(
            "{label} failed (exit {}): {}",
            result.code.unwrap_or(-1),
            result.stderr.trim()
        );
    }
    Ok(result)
}

/// Recording [`Executor`] for unit and integration tests.
#[cfg(test)]
pub mod test_helpers {
    use super::{ExecResult, Executor};
    use anyhow::Result;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// One recorded script invocation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ScriptCall {
        /// Script path.
        pub script: PathBuf,
        /// Positional arguments.
        pub args: Vec<String>,
        /// Extra environment variables.
        pub env: Vec<(String, String)>,
    }

    /// Records every call; fails calls whose script file name is in `failing`.
    #[derive(Debug, Default)]
    pub struct RecordingExecutor {
        calls: Mutex<Vec<ScriptCall>>,
        failing: Vec<String>,
    }

    impl RecordingExecutor {
        /// Create an executor where every script succeeds.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Make scripts with this file name exit non-zero.
        #[must_use]
        pub fn failing(mut self, file_name: &str) -> Self {
            self.failing.push(file_name.to_string());
            self
        }

        /// All calls so far, in order.
        pub fn calls(&self) -> Vec<ScriptCall> {
            self.calls
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone()
        }
    }

    impl Executor for RecordingExecutor {
        fn run_script(
            &self,
            script: &Path,
            args: &[&str],
            env: &[(&str, &str)],
        ) -> Result<ExecResult> {
            self.calls
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(ScriptCall {
                    script: script.to_path_buf(),
                    args: args.iter().map(ToString::to_string).collect(),
                    env: env
                        .iter()
                        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                        .collect(),
                });
            let name = script
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if self.failing.contains(&name) {
                anyhow::bail!("{} failed (exit 1): mock failure", script.display());
            }
            Ok(ExecResult {
                stdout: String::new(),
                stderr: String::new(),
                success: true,
                code: Some(0),
            })
        }
    }
}
