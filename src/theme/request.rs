//! Requested scheme and palette, and their normalization to file tags.
//!
//! The two axes deliberately default differently: an unspecified scheme
//! follows the current state (`auto`), an unspecified palette matches
//! anything (`any`).  They are kept as separate types so the defaults cannot
//! drift into each other.
use std::fmt;
use std::str::FromStr;

use super::naming::{ANY, AUTO, NamingTuple, Palette, Scheme};
use crate::error::NamingError;

/// Resolution of one request axis against the inferred current state.
pub trait Normalize {
    /// The file-tag type this axis normalizes to.
    type Tag;

    /// Resolve the request to a tag, consulting `inferred` only for `auto`.
    ///
    /// An `auto` request with nothing concrete to infer falls back to `any`.
    fn normalize(&self, inferred: Option<&NamingTuple>) -> Self::Tag;

    /// `true` if [`normalize`](Self::normalize) reads the inferred state.
    fn needs_inference(&self) -> bool;
}

/// Requested scheme.  Unspecified means [`SchemeRequest::Auto`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemeRequest {
    /// Follow the currently active scheme.
    #[default]
    Auto,
    /// Match scheme-agnostic files only.
    Any,
    /// Light scheme.
    Light,
    /// Dark scheme.
    Dark,
}

impl Normalize for SchemeRequest {
    type Tag = Scheme;

    fn normalize(&self, inferred: Option<&NamingTuple>) -> Scheme {
        match self {
            Self::Light => Scheme::Light,
            Self::Dark => Scheme::Dark,
            Self::Any => Scheme::Any,
            Self::Auto => inferred
                .map(|t| t.scheme)
                .filter(|s| s.is_concrete())
                .unwrap_or(Scheme::Any),
        }
    }

    fn needs_inference(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl From<Scheme> for SchemeRequest {
    fn from(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Light => Self::Light,
            Scheme::Dark => Self::Dark,
            Scheme::Any => Self::Any,
        }
    }
}

impl fmt::Display for SchemeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str(AUTO),
            Self::Any => f.write_str(ANY),
            Self::Light => f.write_str("light"),
            Self::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for SchemeRequest {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(AUTO) {
            return Ok(Self::Auto);
        }
        s.parse::<Scheme>()
            .map(Self::from)
            .map_err(|_| NamingError::Malformed {
                name: s.to_string(),
                reason: "scheme must be light, dark, any or auto".to_string(),
            })
    }
}

/// Requested palette.  Unspecified means [`PaletteRequest::Any`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaletteRequest {
    /// Follow the currently active palette.
    Auto,
    /// Match palette-agnostic files only.
    #[default]
    Any,
    /// A specific palette.
    Named(String),
}

impl Normalize for PaletteRequest {
    type Tag = Palette;

    fn normalize(&self, inferred: Option<&NamingTuple>) -> Palette {
        match self {
            Self::Named(name) => Palette::Named(name.clone()),
            Self::Any => Palette::Any,
            Self::Auto => inferred
                .map(|t| t.palette.clone())
                .filter(Palette::is_concrete)
                .unwrap_or(Palette::Any),
        }
    }

    fn needs_inference(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl From<Palette> for PaletteRequest {
    fn from(palette: Palette) -> Self {
        match palette {
            Palette::Any => Self::Any,
            Palette::Named(name) => Self::Named(name),
        }
    }
}

impl fmt::Display for PaletteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str(AUTO),
            Self::Any => f.write_str(ANY),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for PaletteRequest {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(AUTO) {
            return Ok(Self::Auto);
        }
        s.parse::<Palette>().map(Self::from)
    }
}

/// A complete request: one value per axis, each independent of the other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Request {
    /// Requested scheme.
    pub scheme: SchemeRequest,
    /// Requested palette.
    pub palette: PaletteRequest,
}

impl Request {
    /// Build a request from optional axis values, applying the defaults.
    #[must_use]
    pub fn new(scheme: Option<SchemeRequest>, palette: Option<PaletteRequest>) -> Self {
        Self {
            scheme: scheme.unwrap_or_default(),
            palette: palette.unwrap_or_default(),
        }
    }

    /// A request that asks for exactly the given tags.
    #[must_use]
    pub fn exact(tuple: &NamingTuple) -> Self {
        Self {
            scheme: tuple.scheme.into(),
            palette: tuple.palette.clone().into(),
        }
    }

    /// Normalize both axes against the inferred state.
    #[must_use]
    pub fn normalize(&self, inferred: Option<&NamingTuple>) -> NamingTuple {
        NamingTuple::new(
            self.scheme.normalize(inferred),
            self.palette.normalize(inferred),
        )
    }

    /// `true` if either axis is `auto`.
    #[must_use]
    pub fn needs_inference(&self) -> bool {
        self.scheme.needs_inference() || self.palette.needs_inference()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scheme={} palette={}", self.scheme, self.palette)
    }
}
