//! Scheme and palette aware theme switcher.
//!
//! Applications keep alternative config files named
//! `<scheme>-<palette>.<tail>` (for example `dark-nord.kitty.conf`).  A request
//! such as "dark, any palette" selects one file per tail and links it into
//! the application's config location, rendering templates and running reload
//! scripts along the way.  The currently linked files are the only state.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: root discovery and the `app_registry.toml` registry
//! - **[`theme`]**: naming, candidate scanning, state inference and resolution
//! - **[`resources`]**: idempotent `check + apply` primitives (links, rendered files)
//! - **[`tasks`]**: the per-application apply step wired to resources
//! - **[`commands`]**: top-level subcommand orchestration (`set`, `status`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod operations;
pub mod platform;
pub mod render;
pub mod resources;
pub mod tasks;
pub mod theme;
