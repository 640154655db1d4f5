//! Idempotent resource primitives (check + apply pattern).
//!
//! Every write the engine makes goes through a [`Resource`]: the current
//! state is checked first, and only a [`ResourceState::Missing`] or
//! [`ResourceState::Incorrect`] resource is applied.  Applying twice is a
//! no-op the second time.
pub mod helpers;
pub mod rendered;
pub mod symlink;

use anyhow::Result;

pub use rendered::RenderedFileResource;
pub use symlink::SymlinkResource;

/// State of a resource (link, rendered file).
///
/// # Examples
///
/// ```
/// use themeconf_cli::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "/other/path".into() };
/// let refused = ResourceState::Invalid { reason: "target is a regular file".into() };
///
/// assert_ne!(missing, correct);
/// assert_ne!(wrong, refused);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// Description of the current value.
        current: String,
    },
    /// Resource must not be applied (e.g. the target is a user's regular file).
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Interface for resources that can be checked and applied.
///
/// ```ignore
/// match resource.current_state()? {
///     ResourceState::Correct => {}
///     ResourceState::Invalid { reason } => refuse(reason),
///     _ => { resource.apply()?; }
/// }
/// ```
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined due to I/O failures.
    fn current_state(&self) -> Result<ResourceState>;

    /// Bring the resource to the desired state.
    ///
    /// Callers are expected to check [`current_state`](Self::current_state)
    /// first and never apply an [`ResourceState::Invalid`] resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be written.
    fn apply(&self) -> Result<()>;
}
