//! Subcommand implementations.
//!
//! Every command except `doctor` loads the config, starts logging and
//! rebuilds the index from disk before answering.

pub mod doctor;
pub mod graph;
pub mod index;
pub mod links;
pub mod output;
pub mod palette;
pub mod rename;
pub mod search;
pub mod vault;
pub mod watch;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, eyre};
use notegraph_core::config::{ConfigLoader, ResolvedConfig};
use notegraph_core::index::{IndexBuilder, IndexStats, ProgressCallback, VaultIndex};

use crate::logging;

/// Global flags shared by all subcommands.
pub struct Context<'a> {
    pub config: Option<&'a Path>,
    pub profile: Option<&'a str>,
    pub json: bool,
}

impl Context<'_> {
    /// Load the config and install the log subscriber.
    pub fn load_config(&self) -> Result<ResolvedConfig> {
        let rc = ConfigLoader::load(self.config, self.profile).wrap_err("failed to load config")?;
        logging::init(&rc);
        Ok(rc)
    }

    pub fn open_vault(&self) -> Result<(ResolvedConfig, VaultIndex)> {
        let rc = self.load_config()?;
        let (index, _) = build_index(&rc, None)?;
        Ok((rc, index))
    }
}

pub fn build_index(
    rc: &ResolvedConfig,
    progress: Option<ProgressCallback>,
) -> Result<(VaultIndex, IndexStats)> {
    IndexBuilder::new(&rc.vault_root)
        .with_exclusions(rc.excluded_folders.clone())
        .build(progress)
        .wrap_err_with(|| format!("failed to index {}", rc.vault_root.display()))
}

/// Resolve a note argument: a vault path, a filesystem path under the vault,
/// or a display name.
pub fn resolve_note(index: &VaultIndex, arg: &str) -> Result<String> {
    let arg = arg.strip_prefix("./").unwrap_or(arg);

    if let Some(note) = index.note(arg) {
        return Ok(note.path.clone());
    }
    index.get_file_path_by_name(arg).ok_or_else(|| eyre!("note not found: {arg}"))
}
