//! Command: resolve and apply a scheme/palette request.
//!
//! Runs in two phases.  The plan phase scans and resolves every selected
//! application without writing anything; any configuration or ambiguity
//! error aborts the run here.  The apply phase then applies each app in
//! turn, isolating failures to the app they occur in.
use std::sync::Arc;
use std::sync::atomic::Ordering;

use anyhow::{Context as _, Result};

use super::{CommandSetup, run_apps_to_completion};
use crate::cli::{GlobalOpts, SetOpts};
use crate::config::Config;
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger};
use crate::render::TomlTemplateRenderer;
use crate::tasks::{ApplyTheme, Context, Task};

/// Run the set command.
///
/// # Errors
///
/// Returns an error if configuration loading or planning fails, if any
/// application fails to apply, or if the run is interrupted.
pub fn run(global: &GlobalOpts, opts: &SetOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let renderer = TomlTemplateRenderer::new(setup.config.palettes_dir());
    let ctx = Context::new(
        Arc::new(setup.platform),
        Arc::clone(log) as Arc<dyn Log>,
        global.dry_run,
        Arc::new(SystemExecutor),
        Arc::new(renderer),
    );
    install_interrupt_handler(&ctx);
    execute(&setup.config, opts, &ctx, log)
}

/// Plan every selected application, then apply them in order.
///
/// # Errors
///
/// Same as [`run`], minus configuration loading.
pub fn execute(config: &Config, opts: &SetOpts, ctx: &Context, log: &Logger) -> Result<()> {
    let planned = plan(config, opts, ctx)?;
    if planned.is_empty() {
        log.warn("no applications selected");
        return Ok(());
    }
    ctx.log.stage(if ctx.dry_run {
        "Applying (dry run)"
    } else {
        "Applying"
    });
    run_apps_to_completion(planned.iter().map(|t| t as &dyn Task), ctx, log)
}

/// Scan and resolve every selected application.
///
/// # Errors
///
/// Returns an error if a named application is not registered, an app
/// directory cannot be read, or two candidate files are ambiguous.
pub fn plan(config: &Config, opts: &SetOpts, ctx: &Context) -> Result<Vec<ApplyTheme>> {
    let request = opts.request();
    ctx.log.stage("Resolving");
    ctx.log.info(&format!("request: {request}"));
    let apps = config.registry.select(&opts.apps)?;
    apps.into_iter()
        .map(|app| {
            ApplyTheme::plan(ctx, app, &request, opts.refresh)
                .with_context(|| format!("planning {}", app.name))
        })
        .collect()
}

/// First Ctrl-C stops the run before the next application; a second one
/// exits immediately.
fn install_interrupt_handler(ctx: &Context) {
    let flag = Arc::clone(&ctx.cancelled);
    let result = ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
    });
    if let Err(e) = result {
        ctx.log
            .debug(&format!("could not install interrupt handler: {e}"));
    }
}
