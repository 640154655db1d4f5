use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

use crate::exec::Executor;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::platform::Platform;
use crate::render::TemplateRenderer;

/// Shared context for task execution.
pub struct Context {
    /// Detected platform information.
    pub platform: Arc<Platform>,
    /// Logger for output and per-app recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Reload script executor (for testing or real processes).
    pub executor: Arc<dyn Executor>,
    /// Template renderer.
    pub renderer: Arc<dyn TemplateRenderer>,
    /// Filesystem query abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Set by the Ctrl-C handler; checked before each application.
    pub cancelled: Arc<AtomicBool>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("executor", &self.executor)
            .field("renderer", &self.renderer)
            .field("fs_ops", &self.fs_ops)
            .field("cancelled", &self.cancelled)
            .finish()
    }
}

impl Context {
    /// Creates a new context backed by the real filesystem.
    #[must_use]
    pub fn new(
        platform: Arc<Platform>,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            platform,
            log,
            dry_run,
            executor,
            renderer,
            fs_ops: Arc::new(SystemFileSystemOps),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// `true` once the run has been interrupted.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Mark the run as interrupted.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// The user's home directory from the environment.
///
/// # Errors
///
/// Returns an error if neither HOME nor USERPROFILE is set.
pub fn home_dir() -> Result<PathBuf> {
    let home = if cfg!(target_os = "windows") {
        std::env::var("USERPROFILE")
            .or_else(|_| std::env::var("HOME"))
            .map_err(|_| {
                anyhow::anyhow!("neither USERPROFILE nor HOME environment variable is set")
            })?
    } else {
        std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable is not set"))?
    };
    Ok(PathBuf::from(home))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::tasks::test_helpers::make_context;

    #[test]
    fn cancel_flag_is_shared() {
        let (ctx, _log) = make_context(std::path::Path::new("/tmp"));
        let flag = Arc::clone(&ctx.cancelled);
        assert!(!ctx.is_cancelled());
        flag.store(true, Ordering::SeqCst);
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn new_context_uses_real_filesystem_and_is_not_cancelled() {
        let (helper, log) = make_context(std::path::Path::new("/tmp"));
        let ctx = Context::new(
            Arc::clone(&helper.platform),
            log,
            true,
            Arc::clone(&helper.executor),
            Arc::clone(&helper.renderer),
        );
        assert!(ctx.dry_run);
        assert!(!ctx.is_cancelled());
        assert!(format!("{ctx:?}").contains("SystemFileSystemOps"));
    }

    #[test]
    fn debug_hides_logger() {
        let (ctx, _log) = make_context(std::path::Path::new("/tmp"));
        let out = format!("{ctx:?}");
        assert!(out.contains("<dyn Log>"));
        assert!(out.contains("dry_run: false"));
    }
}
