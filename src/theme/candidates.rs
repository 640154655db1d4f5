//! Candidate theme files offered by an application, grouped by tail.
use anyhow::{Context as _, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::naming::{NamingTuple, ThemeFileName};
use crate::config::AppEntry;
use crate::error::NamingError;
use crate::operations::FileSystemOps;

/// Suffix every template file carries after its tail.
pub const TEMPLATE_SUFFIX: &str = ".toml";

/// Where a candidate file comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    /// Hand-written by the user; linked as-is.
    User,
    /// Previously rendered output; linked as-is.
    Generated,
    /// TOML template; rendered into the generated directory, then linked.
    Template,
    /// Reload script; executed, never linked.
    Script,
}

impl Source {
    /// Sources that provide linkable config files, in scan order.
    pub const CONFIGS: [Self; 3] = [Self::User, Self::Generated, Self::Template];

    /// Directory name under `apps/<app>/`.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Generated => "generated",
            Self::Template => "templates",
            Self::Script => "call",
        }
    }

    /// Tie-break rank within one prefix; lower wins.
    ///
    /// A template outranks the generated file it renders to so that the
    /// output is refreshed from the template.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::User | Self::Script => 0,
            Self::Template => 1,
            Self::Generated => 2,
        }
    }

    /// Parse a file name found in this source's directory.
    ///
    /// # Errors
    ///
    /// Returns a [`NamingError`] if the name does not follow the convention,
    /// or if a template name lacks the `.toml` suffix.
    pub fn parse_file_name(self, file_name: &str) -> Result<ThemeFileName, NamingError> {
        match self {
            Self::Template => {
                let stem = file_name
                    .strip_suffix(TEMPLATE_SUFFIX)
                    .ok_or_else(|| NamingError::Malformed {
                        name: file_name.to_string(),
                        reason: format!("templates must end in '{TEMPLATE_SUFFIX}'"),
                    })?;
                stem.parse()
            }
            Self::User | Self::Generated | Self::Script => file_name.parse(),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Generated => "generated",
            Self::Template => "template",
            Self::Script => "script",
        })
    }
}

/// One candidate file for one tail of one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Parsed name (tuple + tail).
    pub name: ThemeFileName,
    /// Directory it was found in.
    pub source: Source,
}

impl ConfigFile {
    /// The file's naming tuple.
    #[must_use]
    pub const fn tuple(&self) -> &NamingTuple {
        &self.name.tuple
    }

    /// The file's tail.
    #[must_use]
    pub fn tail(&self) -> &str {
        &self.name.tail
    }
}

/// Candidates grouped by tail, with uniqueness enforced per source.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    by_tail: BTreeMap<String, Vec<ConfigFile>>,
}

impl CandidateSet {
    /// Add a candidate.
    ///
    /// # Errors
    ///
    /// Returns [`NamingError::Ambiguous`] if a candidate with the same tail,
    /// tuple and source is already present.
    pub fn insert(&mut self, app: &str, file: ConfigFile) -> Result<(), NamingError> {
        let bucket = self.by_tail.entry(file.name.tail.clone()).or_default();
        if let Some(existing) = bucket
            .iter()
            .find(|c| c.source == file.source && c.name.tuple == file.name.tuple)
        {
            return Err(NamingError::Ambiguous {
                app: app.to_string(),
                tail: file.name.tail.clone(),
                tuple: file.name.tuple.to_string(),
                first: existing.path.clone(),
                second: file.path,
            });
        }
        bucket.push(file);
        Ok(())
    }

    /// Candidates for `tail`, empty if none.
    #[must_use]
    pub fn get(&self, tail: &str) -> &[ConfigFile] {
        self.by_tail.get(tail).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterate over `(tail, candidates)` in tail order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ConfigFile])> {
        self.by_tail.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// All tails in order.
    pub fn tails(&self) -> impl Iterator<Item = &str> {
        self.by_tail.keys().map(String::as_str)
    }

    /// Number of distinct tails.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_tail.len()
    }

    /// `true` if there are no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_tail.is_empty()
    }
}

/// Everything an application offers.
#[derive(Debug, Default)]
pub struct Scan {
    /// Linkable config candidates (user, generated, template).
    pub configs: CandidateSet,
    /// Reload script candidates.
    pub scripts: CandidateSet,
    /// Files skipped because their names do not follow the convention.
    pub ignored: Vec<(PathBuf, NamingError)>,
}

/// Collect every candidate file of `app`.
///
/// Missing source directories are treated as empty.  Hidden files are
/// skipped.  Files with malformed names are listed in [`Scan::ignored`].
///
/// # Errors
///
/// Returns an error if a source directory cannot be read, or a
/// [`NamingError::Ambiguous`] if two files of one source claim the same tail
/// and tuple.
pub fn scan(app: &AppEntry, fs: &dyn FileSystemOps) -> Result<Scan> {
    let mut result = Scan::default();
    for source in Source::CONFIGS.into_iter().chain([Source::Script]) {
        let dir = app.source_dir(source);
        if !fs.exists(&dir) {
            continue;
        }
        let entries = fs
            .read_dir(&dir)
            .with_context(|| format!("reading {}", dir.display()))?;
        for path in entries {
            let Some(file_name) = visible_file_name(&path) else {
                continue;
            };
            if !fs.is_file(&path) {
                continue;
            }
            let name = match source.parse_file_name(&file_name) {
                Ok(name) => name,
                Err(e) => {
                    result.ignored.push((path, e));
                    continue;
                }
            };
            let file = ConfigFile { path, name, source };
            let set = if source == Source::Script {
                &mut result.scripts
            } else {
                &mut result.configs
            };
            set.insert(&app.name, file)?;
        }
    }
    Ok(result)
}

fn visible_file_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    if name.starts_with('.') {
        None
    } else {
        Some(name.to_string())
    }
}
