//! Applying a resolved selection: render templates, link tails, run scripts.
use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::config::AppEntry;
use crate::error::ApplyError;
use crate::resources::{RenderedFileResource, Resource, ResourceState, SymlinkResource};
use crate::theme::{
    Choice, Request, Resolution, ResolvedSelection, Resolver, Source, StateInspector,
    ThemeFileName, scan,
};

/// Counters for one application's apply.
///
/// # Examples
///
/// ```
/// use themeconf_cli::tasks::ApplyReport;
///
/// let report = ApplyReport { changed: 2, already_ok: 1, skipped: 0, scripts: 1 };
/// assert_eq!(report.summary(false), "2 changed, 1 already ok, 1 script(s) run");
/// assert_eq!(report.summary(true), "2 would change, 1 already ok, 1 script(s) to run");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyReport {
    /// Links or rendered files written.
    pub changed: u32,
    /// Links or rendered files already correct.
    pub already_ok: u32,
    /// Tails with no materialized location.
    pub skipped: u32,
    /// Reload scripts run.
    pub scripts: u32,
}

impl ApplyReport {
    /// Format the summary string (e.g. "1 changed, 2 already ok").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut out = format!("{} {verb}, {} already ok", self.changed, self.already_ok);
        if self.skipped > 0 {
            let _ = write!(out, ", {} skipped", self.skipped);
        }
        if self.scripts > 0 {
            let run = if dry_run { "to run" } else { "run" };
            let _ = write!(out, ", {} script(s) {run}", self.scripts);
        }
        out
    }
}

impl std::ops::AddAssign for ApplyReport {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.skipped += other.skipped;
        self.scripts += other.scripts;
    }
}

/// Writes a [`ResolvedSelection`] to the filesystem.
#[derive(Debug, Clone, Copy)]
pub struct Applier<'a> {
    ctx: &'a Context,
}

impl<'a> Applier<'a> {
    /// Create an applier using the logger, executor and renderer of `ctx`.
    #[must_use]
    pub const fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    /// Link every selected tail of `app`, then run its reload scripts.
    ///
    /// A failing tail does not stop the others, but scripts only run when
    /// every tail succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError::Tails`] listing every failed tail, or
    /// [`ApplyError::Script`] for the first failing reload script.
    pub fn apply(
        &self,
        app: &AppEntry,
        selection: &ResolvedSelection,
        request: &Request,
    ) -> Result<ApplyReport, ApplyError> {
        let mut report = ApplyReport::default();
        let mut failures = Vec::new();

        for (tail, resolution) in &selection.tails {
            let choice = match resolution {
                Resolution::Selected(choice) | Resolution::Refreshed(choice) => choice,
                Resolution::NoMatch { normalized } => {
                    self.ctx
                        .log
                        .debug(&format!("{tail}: nothing matches {normalized}"));
                    continue;
                }
                Resolution::Frozen => {
                    self.ctx.log.debug(&format!("{tail}: frozen"));
                    continue;
                }
            };
            let Some(target) = app.target_for(tail) else {
                self.ctx
                    .log
                    .debug(&format!("{tail}: not in config_map, skipping"));
                report.skipped += 1;
                continue;
            };
            match self.apply_tail(app, tail, choice, &target) {
                Ok(delta) => report += delta,
                Err(e) => {
                    self.ctx.log.warn(&format!("{tail}: {e}"));
                    failures.push(format!("{tail}: {e}"));
                }
            }
        }

        if !failures.is_empty() {
            if !selection.scripts.is_empty() {
                self.ctx.log.warn("not running reload scripts");
            }
            return Err(ApplyError::Tails { failures });
        }

        for script in &selection.scripts {
            self.run_script(app, script, request)?;
            report.scripts += 1;
        }
        Ok(report)
    }

    fn apply_tail(
        &self,
        app: &AppEntry,
        tail: &str,
        choice: &Choice,
        target: &Path,
    ) -> Result<ApplyReport, ApplyError> {
        let mut delta = ApplyReport::default();
        let source = if choice.file.source == Source::Template {
            let bindings = choice.bindings();
            let output = app
                .source_dir(Source::Generated)
                .join(ThemeFileName::new(bindings.clone(), tail).to_string());
            if self.ctx.dry_run {
                self.ctx.log.dry_run(&format!(
                    "would render {} to {}",
                    choice.file.path.display(),
                    output.display()
                ));
                self.ctx.log.dry_run(&format!(
                    "would link {} -> {}",
                    target.display(),
                    output.display()
                ));
                delta.changed += 1;
                return Ok(delta);
            }
            let content = self
                .ctx
                .renderer
                .render(&choice.file.path, &bindings, &app.separator)?;
            delta += self.process(
                &RenderedFileResource::new(output.clone(), content),
                &output,
                "render",
            )?;
            output
        } else {
            choice.file.path.clone()
        };
        delta += self.process(
            &SymlinkResource::new(source, target.to_path_buf()),
            target,
            "link",
        )?;
        Ok(delta)
    }

    /// Check one resource and apply it if needed.
    fn process<R: Resource>(
        &self,
        resource: &R,
        path: &Path,
        verb: &str,
    ) -> Result<ApplyReport, ApplyError> {
        let write_err = |e: anyhow::Error| ApplyError::Write {
            target: path.to_path_buf(),
            reason: format!("{e:#}"),
        };
        let desc = resource.description();
        let mut delta = ApplyReport::default();
        match resource.current_state().map_err(write_err)? {
            ResourceState::Correct => {
                self.ctx.log.debug(&format!("ok: {desc}"));
                delta.already_ok += 1;
            }
            ResourceState::Invalid { reason } => {
                return Err(ApplyError::TargetRefused {
                    target: path.to_path_buf(),
                    reason,
                });
            }
            state @ (ResourceState::Missing | ResourceState::Incorrect { .. }) => {
                if self.ctx.dry_run {
                    let msg = if let ResourceState::Incorrect { ref current } = state {
                        format!("would {verb} {desc} (currently {current})")
                    } else {
                        format!("would {verb} {desc}")
                    };
                    self.ctx.log.dry_run(&msg);
                } else {
                    resource.apply().map_err(write_err)?;
                    self.ctx.log.debug(&format!("{verb}: {desc}"));
                }
                delta.changed += 1;
            }
        }
        Ok(delta)
    }

    fn run_script(
        &self,
        app: &AppEntry,
        script: &Choice,
        request: &Request,
    ) -> Result<(), ApplyError> {
        let bindings = script.bindings();
        let scheme = bindings.scheme.as_str();
        let palette = bindings.palette.as_str();
        let path = &script.file.path;
        if self.ctx.dry_run {
            self.ctx
                .log
                .dry_run(&format!("would run {} {scheme} {palette}", path.display()));
            return Ok(());
        }

        let scheme_request = request.scheme.to_string();
        let palette_request = request.palette.to_string();
        let env = [
            ("THEMECONF_APP", app.name.as_str()),
            ("THEMECONF_SCHEME", scheme),
            ("THEMECONF_PALETTE", palette),
            ("THEMECONF_SCHEME_REQUEST", scheme_request.as_str()),
            ("THEMECONF_PALETTE_REQUEST", palette_request.as_str()),
        ];
        self.ctx
            .log
            .debug(&format!("running {} {scheme} {palette}", path.display()));
        let result = self
            .ctx
            .executor
            .run_script(path, &[scheme, palette], &env)
            .map_err(|e| ApplyError::Script {
                script: path.clone(),
                reason: format!("{e:#}"),
            })?;
        for line in result.stdout.lines() {
            self.ctx.log.debug(line);
        }
        Ok(())
    }
}

/// Apply the resolved theme of one application.
///
/// Built in the plan phase by [`ApplyTheme::plan`], which scans and
/// resolves without writing anything, and run in the apply phase.
#[derive(Debug)]
pub struct ApplyTheme {
    app: AppEntry,
    request: Request,
    selection: Option<ResolvedSelection>,
}

impl ApplyTheme {
    /// Scan and resolve `app` for `request`.
    ///
    /// Apps restricted to other platforms are not scanned and will report
    /// not applicable.  Files with malformed names are logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if an app directory cannot be read or two candidate
    /// files are ambiguous.
    pub fn plan(ctx: &Context, app: &AppEntry, request: &Request, refresh: bool) -> Result<Self> {
        let mut task = Self {
            app: app.clone(),
            request: request.clone(),
            selection: None,
        };
        if !ctx.platform.supports(&app.platforms) {
            return Ok(task);
        }

        let fs = ctx.fs_ops.as_ref();
        let scan = scan(app, fs)?;
        for (path, err) in &scan.ignored {
            ctx.log
                .warn(&format!("{}: ignoring {}: {err}", app.name, path.display()));
        }
        let selection =
            Resolver::new(StateInspector::new(fs)).resolve_app(app, &scan, request, refresh);
        ctx.log.debug(&format!(
            "{}: {request} -> {} ({} tail(s), {} script(s))",
            app.name,
            selection.effective,
            selection.tails.len(),
            selection.scripts.len()
        ));
        task.selection = Some(selection);
        Ok(task)
    }

    /// The resolved selection, if the app was planned.
    #[must_use]
    pub const fn selection(&self) -> Option<&ResolvedSelection> {
        self.selection.as_ref()
    }
}

impl Task for ApplyTheme {
    fn name(&self) -> &str {
        &self.app.name
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        self.selection.is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(selection) = &self.selection else {
            return Ok(TaskResult::Unchanged("not planned".to_string()));
        };
        if selection.is_noop() {
            return Ok(TaskResult::Unchanged(noop_reason(selection)));
        }

        let report = Applier::new(ctx).apply(&self.app, selection, &self.request)?;
        ctx.log.info(&report.summary(ctx.dry_run));
        if ctx.dry_run {
            Ok(TaskResult::DryRun)
        } else {
            Ok(TaskResult::Ok)
        }
    }
}

fn noop_reason(selection: &ResolvedSelection) -> String {
    if selection.tails.is_empty() {
        "no theme files".to_string()
    } else if selection
        .tails
        .values()
        .all(|r| matches!(r, Resolution::Frozen))
    {
        "scheme and palette are both any".to_string()
    } else {
        format!("no files match {}", selection.effective)
    }
}
