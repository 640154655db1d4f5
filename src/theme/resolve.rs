//! Selection of one candidate per tail for a request.
//!
//! For a normalized `(scheme, palette)` the prefixes tried, in order, are:
//!
//! | scheme | palette | prefixes                       |
//! |--------|---------|--------------------------------|
//! | `S`    | `P`     | `S-P`, `any-P`, `S-any`        |
//! | `any`  | `P`     | `any-P`                        |
//! | `S`    | `any`   | `S-any`                        |
//! | `any`  | `any`   | none; the tail is left as is   |
//!
//! `any-any` files are therefore never selected by a request; they are only
//! re-applied by a refresh.
//!
//! A template renders to `generated/` under its bound tuple (see
//! [`Choice::bindings`]), so a template without a palette of its own is only
//! eligible when the request names one.  When a generated file wins, the
//! template that renders to it is chosen instead so the output is refreshed.
use std::collections::BTreeMap;

use super::candidates::{ConfigFile, Scan, Source};
use super::inspect::{AppState, StateInspector};
use super::naming::{NamingTuple, Palette, Scheme};
use super::request::Request;
use crate::config::AppEntry;

/// The prefixes a normalized tuple matches, most specific first.
#[must_use]
pub fn precedence(normalized: &NamingTuple) -> Vec<NamingTuple> {
    let NamingTuple { scheme, palette } = normalized;
    match (scheme.is_concrete(), palette.is_concrete()) {
        (true, true) => vec![
            normalized.clone(),
            NamingTuple::new(Scheme::Any, palette.clone()),
            NamingTuple::new(*scheme, Palette::Any),
        ],
        (false, true) | (true, false) => vec![normalized.clone()],
        (false, false) => Vec::new(),
    }
}

/// First candidate matching the earliest prefix in `chain`.
///
/// Within one prefix the source rank breaks ties.  `normalized` is the tuple
/// the chain was built from; it decides which templates can be rendered.
#[must_use]
pub fn select<'c>(
    candidates: &'c [ConfigFile],
    chain: &[NamingTuple],
    normalized: &NamingTuple,
) -> Option<&'c ConfigFile> {
    chain
        .iter()
        .find_map(|prefix| {
            candidates
                .iter()
                .filter(|c| c.tuple() == prefix && renderable(c, normalized))
                .min_by_key(|c| c.source.rank())
        })
        .map(|file| origin_template(candidates, file, normalized).unwrap_or(file))
}

/// Fill the `any` axes of `tuple` from `normalized`.
fn bind(tuple: &NamingTuple, normalized: &NamingTuple) -> NamingTuple {
    NamingTuple::new(
        if tuple.scheme.is_concrete() {
            tuple.scheme
        } else {
            normalized.scheme
        },
        if tuple.palette.is_concrete() {
            tuple.palette.clone()
        } else {
            normalized.palette.clone()
        },
    )
}

/// Templates need a palette to render against.
fn renderable(file: &ConfigFile, normalized: &NamingTuple) -> bool {
    file.source != Source::Template || bind(file.tuple(), normalized).palette.is_concrete()
}

/// The template whose output is the generated `file`, most specific first.
fn origin_template<'c>(
    candidates: &'c [ConfigFile],
    file: &ConfigFile,
    normalized: &NamingTuple,
) -> Option<&'c ConfigFile> {
    if file.source != Source::Generated {
        return None;
    }
    candidates
        .iter()
        .filter(|c| c.source == Source::Template && renderable(c, normalized))
        .filter(|c| bind(c.tuple(), normalized) == *file.tuple())
        .min_by_key(|c| (!c.tuple().palette.is_concrete(), !c.tuple().scheme.is_concrete()))
}

/// A chosen candidate and the normalized tuple it was chosen for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// The winning file.
    pub file: ConfigFile,
    /// The normalized request (or refreshed state) it satisfied.
    pub normalized: NamingTuple,
}

impl Choice {
    /// Values to render templates and run scripts with.
    ///
    /// Each axis is the file's own tag when concrete, else the normalized
    /// request value.
    #[must_use]
    pub fn bindings(&self) -> NamingTuple {
        bind(self.file.tuple(), &self.normalized)
    }
}

/// Outcome of resolving one tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A candidate matched the request.
    Selected(Choice),
    /// Nothing matched, but refresh re-selected the active file.
    Refreshed(Choice),
    /// No candidate matched; the tail is left untouched.
    NoMatch {
        /// The normalized tuple nothing matched.
        normalized: NamingTuple,
    },
    /// Both axes normalized to `any`; the tail is frozen.
    Frozen,
}

impl Resolution {
    /// The chosen candidate, if any.
    #[must_use]
    pub const fn choice(&self) -> Option<&Choice> {
        match self {
            Self::Selected(choice) | Self::Refreshed(choice) => Some(choice),
            Self::NoMatch { .. } | Self::Frozen => None,
        }
    }
}

/// Resolve one tail against a request.
#[must_use]
pub fn resolve(
    candidates: &[ConfigFile],
    request: &Request,
    inferred: Option<&NamingTuple>,
) -> Resolution {
    let normalized = request.normalize(inferred);
    let chain = precedence(&normalized);
    if chain.is_empty() {
        return Resolution::Frozen;
    }
    match select(candidates, &chain, &normalized) {
        Some(file) => Resolution::Selected(Choice {
            file: file.clone(),
            normalized,
        }),
        None => Resolution::NoMatch { normalized },
    }
}

/// Everything resolved for one application.
#[derive(Debug, Clone)]
pub struct ResolvedSelection {
    /// Application name.
    pub app: String,
    /// Request after normalization against the app-wide state.
    pub effective: NamingTuple,
    /// Resolution per config tail, in tail order.
    pub tails: BTreeMap<String, Resolution>,
    /// Reload scripts to run, in tail order.
    pub scripts: Vec<Choice>,
    /// Inferred state the resolution was based on.
    pub state: AppState,
}

impl ResolvedSelection {
    /// Chosen config files in tail order.
    pub fn choices(&self) -> impl Iterator<Item = (&str, &Choice)> {
        self.tails
            .iter()
            .filter_map(|(tail, r)| r.choice().map(|c| (tail.as_str(), c)))
    }

    /// `true` if nothing would be linked or run.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.choices().next().is_none() && self.scripts.is_empty()
    }
}

/// Resolves a whole application: every config tail plus its reload scripts.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    inspector: StateInspector<'a>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver that infers state through `inspector`.
    #[must_use]
    pub const fn new(inspector: StateInspector<'a>) -> Self {
        Self { inspector }
    }

    /// Resolve every tail of `app` offered by `scan`.
    ///
    /// With `refresh`, tails that would otherwise be left untouched re-select
    /// the file they currently link to, and scripts fall back to the app-wide
    /// inferred state.
    #[must_use]
    pub fn resolve_app(
        &self,
        app: &AppEntry,
        scan: &Scan,
        request: &Request,
        refresh: bool,
    ) -> ResolvedSelection {
        let state = if request.needs_inference() || refresh {
            self.inspector.infer(app, scan.configs.tails())
        } else {
            AppState::default()
        };

        let tails = scan
            .configs
            .iter()
            .map(|(tail, candidates)| {
                let mut resolution = resolve(candidates, request, state.for_tail(tail));
                if refresh && resolution.choice().is_none() {
                    resolution = refreshed(candidates, state.for_tail(tail)).unwrap_or(resolution);
                }
                (tail.to_string(), resolution)
            })
            .collect();

        let mut effective = request.normalize(state.app_wide());
        let mut scripts = select_scripts(scan, &effective);
        if refresh
            && scripts.is_empty()
            && let Some(current) = state.app_wide()
        {
            effective = current.clone();
            scripts = select_scripts(scan, &effective);
        }

        ResolvedSelection {
            app: app.name.clone(),
            effective,
            tails,
            scripts,
            state,
        }
    }
}

fn refreshed(candidates: &[ConfigFile], current: Option<&NamingTuple>) -> Option<Resolution> {
    let current = current?;
    let file = select(candidates, std::slice::from_ref(current), current)?;
    Some(Resolution::Refreshed(Choice {
        file: file.clone(),
        normalized: current.clone(),
    }))
}

fn select_scripts(scan: &Scan, normalized: &NamingTuple) -> Vec<Choice> {
    let chain = precedence(normalized);
    scan.scripts
        .iter()
        .filter_map(|(_, candidates)| select(candidates, &chain, normalized))
        .map(|file| Choice {
            file: file.clone(),
            normalized: normalized.clone(),
        })
        .collect()
}
