//! Theme tags and the `<scheme>-<palette>.<tail>` file naming convention.
use std::fmt;
use std::str::FromStr;

use crate::error::NamingError;

/// Keyword reserved for requests; never valid in a file name.
pub const AUTO: &str = "auto";
/// Keyword matching every value of an axis.
pub const ANY: &str = "any";

/// Scheme tag carried by a theme file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scheme {
    /// Light color scheme.
    Light,
    /// Dark color scheme.
    Dark,
    /// Scheme-agnostic.
    Any,
}

impl Scheme {
    /// Canonical lowercase token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Any => ANY,
        }
    }

    /// `true` for `light` and `dark`.
    #[must_use]
    pub const fn is_concrete(self) -> bool {
        !matches!(self, Self::Any)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            ANY => Ok(Self::Any),
            AUTO => Err(NamingError::AutoInFileName {
                name: s.to_string(),
            }),
            _ => Err(NamingError::Malformed {
                name: s.to_string(),
                reason: "scheme must be light, dark or any".to_string(),
            }),
        }
    }
}

/// Palette tag carried by a theme file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Palette {
    /// Palette-agnostic.
    Any,
    /// A specific named palette.
    Named(String),
}

impl Palette {
    /// Build a named palette, validating the name.
    ///
    /// # Errors
    ///
    /// Returns [`NamingError::Malformed`] if the name is empty, contains a
    /// `-`, `.` or path separator, or is one of the reserved keywords.
    pub fn named(name: &str) -> Result<Self, NamingError> {
        let malformed = |reason: &str| NamingError::Malformed {
            name: name.to_string(),
            reason: reason.to_string(),
        };
        if name.is_empty() {
            return Err(malformed("palette name is empty"));
        }
        if name.contains(['-', '.', '/', '\\']) || name.chars().any(char::is_whitespace) {
            return Err(malformed(
                "palette name may not contain '-', '.', whitespace or path separators",
            ));
        }
        if name.eq_ignore_ascii_case(ANY) || name.eq_ignore_ascii_case(AUTO) {
            return Err(malformed("palette name is a reserved keyword"));
        }
        Ok(Self::Named(name.to_string()))
    }

    /// Canonical token: the palette name, or `any`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => ANY,
            Self::Named(name) => name,
        }
    }

    /// `true` for a named palette.
    #[must_use]
    pub const fn is_concrete(&self) -> bool {
        matches!(self, Self::Named(_))
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Palette {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(ANY) {
            Ok(Self::Any)
        } else if s.eq_ignore_ascii_case(AUTO) {
            Err(NamingError::AutoInFileName {
                name: s.to_string(),
            })
        } else {
            Self::named(s)
        }
    }
}

/// The `(scheme, palette)` pair that tags a theme file.
///
/// # Examples
///
/// ```
/// use themeconf_cli::theme::{NamingTuple, Palette, Scheme};
///
/// let tuple: NamingTuple = "dark-blue".parse().unwrap();
/// assert_eq!(tuple.scheme, Scheme::Dark);
/// assert_eq!(tuple.palette, Palette::Named("blue".into()));
/// assert_eq!(tuple.to_string(), "dark-blue");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NamingTuple {
    /// Scheme axis.
    pub scheme: Scheme,
    /// Palette axis.
    pub palette: Palette,
}

impl NamingTuple {
    /// Create a tuple from its two axes.
    #[must_use]
    pub const fn new(scheme: Scheme, palette: Palette) -> Self {
        Self { scheme, palette }
    }

    /// The `any-any` tuple.
    #[must_use]
    pub const fn any() -> Self {
        Self::new(Scheme::Any, Palette::Any)
    }

    /// `true` when both axes are `any`.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self.scheme, Scheme::Any) && matches!(self.palette, Palette::Any)
    }
}

impl fmt::Display for NamingTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.scheme, self.palette)
    }
}

impl FromStr for NamingTuple {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((scheme, palette)) = s.split_once('-') else {
            return Err(NamingError::Malformed {
                name: s.to_string(),
                reason: "expected <scheme>-<palette>".to_string(),
            });
        };
        let scheme = scheme.parse::<Scheme>().map_err(|e| rename(e, s))?;
        let palette = palette.parse::<Palette>().map_err(|e| rename(e, s))?;
        Ok(Self::new(scheme, palette))
    }
}

/// A parsed theme file name: `<scheme>-<palette>.<tail>`.
///
/// The tail is everything after the first `.` and may itself contain dots.
///
/// # Examples
///
/// ```
/// use themeconf_cli::theme::ThemeFileName;
///
/// let name: ThemeFileName = "light-any.status".parse().unwrap();
/// assert_eq!(name.tail, "status");
/// assert_eq!(name.to_string(), "light-any.status");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThemeFileName {
    /// The tuple encoded in the prefix.
    pub tuple: NamingTuple,
    /// The logical artifact identity.
    pub tail: String,
}

impl ThemeFileName {
    /// Create a file name from its parts.
    #[must_use]
    pub fn new(tuple: NamingTuple, tail: impl Into<String>) -> Self {
        Self {
            tuple,
            tail: tail.into(),
        }
    }
}

impl fmt::Display for ThemeFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tuple, self.tail)
    }
}

impl FromStr for ThemeFileName {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((prefix, tail)) = s.split_once('.') else {
            return Err(NamingError::Malformed {
                name: s.to_string(),
                reason: "missing '.<tail>'".to_string(),
            });
        };
        if tail.is_empty() {
            return Err(NamingError::Malformed {
                name: s.to_string(),
                reason: "empty tail".to_string(),
            });
        }
        let tuple = prefix.parse::<NamingTuple>().map_err(|e| rename(e, s))?;
        Ok(Self::new(tuple, tail))
    }
}

/// Report a component parse error against the full name being parsed.
fn rename(err: NamingError, full: &str) -> NamingError {
    match err {
        NamingError::AutoInFileName { .. } => NamingError::AutoInFileName {
            name: full.to_string(),
        },
        NamingError::Malformed { reason, .. } => NamingError::Malformed {
            name: full.to_string(),
            reason,
        },
        other @ NamingError::Ambiguous { .. } => other,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn named(p: &str) -> Palette {
        Palette::Named(p.to_string())
    }

    #[test]
    fn parse_file_name_with_dotted_tail() {
        let name: ThemeFileName = "any-any.kitty.conf".parse().unwrap();
        assert_eq!(name.tuple, NamingTuple::any());
        assert_eq!(name.tail, "kitty.conf");
    }

    #[test]
    fn round_trip_canonical_names() {
        for s in [
            "light-any.status",
            "dark-blue.conf",
            "any-solarized.colors.toml",
            "any-any.sh",
        ] {
            let parsed: ThemeFileName = s.parse().unwrap();
            assert_eq!(parsed.to_string(), s);
        }
    }

    #[test]
    fn keywords_are_case_insensitive_and_render_lowercase() {
        let name: ThemeFileName = "DARK-Any.conf".parse().unwrap();
        assert_eq!(name.tuple, NamingTuple::new(Scheme::Dark, Palette::Any));
        assert_eq!(name.to_string(), "dark-any.conf");
    }

    #[test]
    fn palette_names_keep_their_case() {
        let name: ThemeFileName = "light-Nord.conf".parse().unwrap();
        assert_eq!(name.tuple.palette, named("Nord"));
    }

    #[test]
    fn auto_tag_is_rejected_in_file_names() {
        for s in ["auto-blue.conf", "dark-auto.conf", "AUTO-any.conf"] {
            let err = s.parse::<ThemeFileName>().unwrap_err();
            assert!(
                matches!(&err, NamingError::AutoInFileName { name } if name == s),
                "{s}: {err}"
            );
        }
    }

    #[test]
    fn malformed_names_are_rejected() {
        for s in [
            "dark.conf",
            "darkblue",
            "dark-blue.",
            "dim-blue.conf",
            "dark-.conf",
            "dark-blue-green.conf",
            "README",
        ] {
            let err = s.parse::<ThemeFileName>().unwrap_err();
            assert!(
                matches!(err, NamingError::Malformed { .. }),
                "{s} should be malformed: {err}"
            );
        }
    }

    #[test]
    fn palette_name_validation() {
        assert!(Palette::named("gruvbox").is_ok());
        assert!(Palette::named("").is_err());
        assert!(Palette::named("a-b").is_err());
        assert!(Palette::named("a.b").is_err());
        assert!(Palette::named("a/b").is_err());
        assert!(Palette::named("Any").is_err());
        assert!(Palette::named("auto").is_err());
    }

    #[test]
    fn concreteness() {
        assert!(Scheme::Light.is_concrete());
        assert!(!Scheme::Any.is_concrete());
        assert!(named("blue").is_concrete());
        assert!(!Palette::Any.is_concrete());
        assert!(NamingTuple::any().is_any());
        assert!(!NamingTuple::new(Scheme::Dark, Palette::Any).is_any());
    }
}
