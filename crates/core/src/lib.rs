#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

//! In-memory index over a folder of interlinked markdown notes.
//!
//! Hosts feed note text into a [`VaultIndex`] and query backlinks, forward
//! links, tags, name resolution, ranked search and graph views. Everything
//! is keyed by canonical vault paths (see [`paths`]).

pub mod config;
pub mod frontmatter;
pub mod index;
pub mod palette;
pub mod paths;
pub mod rename;
pub mod vault;

pub use index::{IndexBuilder, IndexStats, VaultIndex};
pub use palette::{PaletteCommand, PaletteItem, palette_search};
pub use rename::{RenamePlan, RenameResult, apply_rename, plan_rename};
