//! Core logging types: per-application outcomes and the [`Log`] trait.

/// Outcome of one application for summary reporting.
#[derive(Debug, Clone)]
pub struct RunEntry {
    /// Application name.
    pub name: String,
    /// Final status.
    pub status: AppStatus,
    /// Optional detail message (e.g., why nothing changed, or the error).
    pub message: Option<String>,
}

/// Status of one application after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStatus {
    /// Theme files were linked (or were already correct) and scripts ran.
    Ok,
    /// Nothing matched the request, or the request froze every tail.
    Unchanged,
    /// The application is restricted to other platforms.
    NotApplicable,
    /// Dry-run mode; nothing was written.
    DryRun,
    /// Linking, rendering or a reload script failed.
    Failed,
    /// The run was interrupted before this application was applied.
    Cancelled,
}

/// Abstraction over logging backends.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record an application outcome for the summary.
    fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn app_status_equality() {
        assert_eq!(AppStatus::Ok, AppStatus::Ok);
        assert_ne!(AppStatus::Ok, AppStatus::Failed);
        assert_ne!(AppStatus::Unchanged, AppStatus::DryRun);
        assert_ne!(AppStatus::NotApplicable, AppStatus::Cancelled);
    }

    #[test]
    fn run_entry_clone() {
        let entry = RunEntry {
            name: "kitty".to_string(),
            status: AppStatus::Unchanged,
            message: Some("no matching files".to_string()),
        };
        let cloned = entry.clone();
        assert_eq!(cloned.name, entry.name);
        assert_eq!(cloned.status, entry.status);
        assert_eq!(cloned.message, entry.message);
    }
}
