//! Named tasks that turn a resolved plan into filesystem changes.
pub mod apply;
mod context;

pub use apply::{ApplyReport, ApplyTheme, Applier};
pub use context::{Context, home_dir};

use anyhow::Result;

use crate::logging::AppStatus;

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use themeconf_cli::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let unchanged = TaskResult::Unchanged("no matching files".into());
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(unchanged, TaskResult::Unchanged(_)));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Nothing to do; the reason is shown in the summary.
    Unchanged(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task should run on the current platform.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails, e.g. a link target is refused or
    /// a reload script exits non-zero.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Execute a task, recording the result in the logger.
///
/// A cancelled run records the task as cancelled without running it.
pub fn execute(task: &dyn Task, ctx: &Context) {
    if ctx.is_cancelled() {
        ctx.log.record_app(task.name(), AppStatus::Cancelled, None);
        return;
    }

    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping {} (not applicable)", task.name()));
        ctx.log.record_app(
            task.name(),
            AppStatus::NotApplicable,
            Some(&format!("not on {}", ctx.platform.os)),
        );
        return;
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_app(task.name(), AppStatus::Ok, None);
        }
        Ok(TaskResult::Unchanged(reason)) => {
            ctx.log.info(&format!("unchanged: {reason}"));
            ctx.log
                .record_app(task.name(), AppStatus::Unchanged, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_app(task.name(), AppStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_app(task.name(), AppStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::AppStatus;
    use std::path::Path;
    use test_helpers::make_context;

    struct MockTask {
        name: &'static str,
        should_run: bool,
        result: Result<TaskResult, String>,
    }

    impl Task for MockTask {
        fn name(&self) -> &str {
            self.name
        }
        fn should_run(&self, _ctx: &Context) -> bool {
            self.should_run
        }
        fn run(&self, _ctx: &Context) -> Result<TaskResult> {
            self.result.clone().map_err(|s| anyhow::anyhow!("{s}"))
        }
    }

    fn mock(name: &'static str, should_run: bool, result: Result<TaskResult, String>) -> MockTask {
        MockTask {
            name,
            should_run,
            result,
        }
    }

    #[test]
    fn execute_records_not_applicable() {
        let (ctx, log) = make_context(Path::new("/tmp"));
        execute(&mock("kitty", false, Ok(TaskResult::Ok)), &ctx);
        let entries = log.entries();
        assert_eq!(entries[0].status, AppStatus::NotApplicable);
        assert_eq!(entries[0].message.as_deref(), Some("not on linux"));
    }

    #[test]
    fn execute_records_ok_and_unchanged() {
        let (ctx, log) = make_context(Path::new("/tmp"));
        execute(&mock("a", true, Ok(TaskResult::Ok)), &ctx);
        execute(
            &mock("b", true, Ok(TaskResult::Unchanged("frozen".into()))),
            &ctx,
        );
        let entries = log.entries();
        assert_eq!(entries[0].status, AppStatus::Ok);
        assert_eq!(entries[1].status, AppStatus::Unchanged);
        assert_eq!(entries[1].message.as_deref(), Some("frozen"));
        assert_eq!(log.failure_count(), 0);
    }

    #[test]
    fn execute_records_failure_and_continues() {
        let (ctx, log) = make_context(Path::new("/tmp"));
        execute(&mock("bad", true, Err("boom".into())), &ctx);
        execute(&mock("good", true, Ok(TaskResult::Ok)), &ctx);
        assert_eq!(log.failure_count(), 1);
        assert_eq!(log.entries()[1].status, AppStatus::Ok);
    }

    #[test]
    fn execute_after_cancel_records_cancelled() {
        let (ctx, log) = make_context(Path::new("/tmp"));
        ctx.cancel();
        execute(&mock("a", true, Ok(TaskResult::Ok)), &ctx);
        assert_eq!(log.entries()[0].status, AppStatus::Cancelled);
    }
}
