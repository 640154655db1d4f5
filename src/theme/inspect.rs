//! Inference of the currently active theme from materialized links.
//!
//! The filesystem is the only state: whatever the links at an application's
//! config locations point to is what is active.  Nothing is cached.
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::naming::{NamingTuple, ThemeFileName};
use crate::config::AppEntry;
use crate::operations::FileSystemOps;

/// Inferred state of one application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    per_tail: BTreeMap<String, NamingTuple>,
    app_wide: Option<NamingTuple>,
}

impl AppState {
    /// Build a state from per-tail observations.
    ///
    /// The app-wide tuple is set only when every observed tail agrees.
    #[must_use]
    pub fn from_tails(per_tail: BTreeMap<String, NamingTuple>) -> Self {
        let mut tuples = per_tail.values();
        let app_wide = tuples
            .next()
            .filter(|first| tuples.all(|t| t == *first))
            .cloned();
        Self { per_tail, app_wide }
    }

    /// Tuple inferred for one tail.
    #[must_use]
    pub fn tail(&self, tail: &str) -> Option<&NamingTuple> {
        self.per_tail.get(tail)
    }

    /// Tuple shared by every materialized tail, if they agree.
    #[must_use]
    pub const fn app_wide(&self) -> Option<&NamingTuple> {
        self.app_wide.as_ref()
    }

    /// Best inference for `tail`: its own tuple, else the app-wide one.
    #[must_use]
    pub fn for_tail(&self, tail: &str) -> Option<&NamingTuple> {
        self.tail(tail).or(self.app_wide.as_ref())
    }

    /// Iterate over `(tail, tuple)` observations in tail order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NamingTuple)> {
        self.per_tail.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `true` if nothing could be inferred.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.per_tail.is_empty()
    }
}

/// Reads materialized links back into naming tuples.
#[derive(Debug, Clone, Copy)]
pub struct StateInspector<'a> {
    fs: &'a dyn FileSystemOps,
}

impl<'a> StateInspector<'a> {
    /// Create an inspector over `fs`.
    #[must_use]
    pub const fn new(fs: &'a dyn FileSystemOps) -> Self {
        Self { fs }
    }

    /// File the materialized location of `tail` currently links to.
    #[must_use]
    pub fn linked_file(&self, app: &AppEntry, tail: &str) -> Option<PathBuf> {
        let target = app.target_for(tail)?;
        self.fs.read_link(&target).ok()
    }

    /// Tuple of the file `tail` currently links to.
    ///
    /// `None` when the location is missing, not a symlink, or links to a
    /// file whose name does not parse to the same tail.
    #[must_use]
    pub fn infer_tail(&self, app: &AppEntry, tail: &str) -> Option<NamingTuple> {
        let linked = self.linked_file(app, tail)?;
        let file_name = linked.file_name()?.to_str()?;
        let parsed: ThemeFileName = file_name.parse().ok()?;
        (parsed.tail == tail).then_some(parsed.tuple)
    }

    /// Inspect every tail in `tails`.
    #[must_use]
    pub fn infer<'t>(&self, app: &AppEntry, tails: impl IntoIterator<Item = &'t str>) -> AppState {
        let per_tail = tails
            .into_iter()
            .filter_map(|tail| {
                self.infer_tail(app, tail)
                    .map(|tuple| (tail.to_string(), tuple))
            })
            .collect();
        AppState::from_tails(per_tail)
    }
}
