//! Theme naming, candidate discovery, state inference and resolution.
//!
//! Every theme file is tagged by its name, `<scheme>-<palette>.<tail>`.  For
//! each application the engine:
//!
//! 1. scans its `user/`, `generated/`, `templates/` and `call/` directories
//!    ([`candidates`]),
//! 2. reads back what is currently linked when the request says `auto`
//!    ([`inspect`]),
//! 3. picks at most one file per tail ([`resolve`]).
//!
//! Nothing here writes to the filesystem; see [`crate::tasks::apply`].
pub mod candidates;
pub mod inspect;
pub mod naming;
pub mod request;
pub mod resolve;

pub use candidates::{CandidateSet, ConfigFile, Scan, Source, scan};
pub use inspect::{AppState, StateInspector};
pub use naming::{NamingTuple, Palette, Scheme, ThemeFileName};
pub use request::{Normalize, PaletteRequest, Request, SchemeRequest};
pub use resolve::{Choice, Resolution, ResolvedSelection, Resolver};
