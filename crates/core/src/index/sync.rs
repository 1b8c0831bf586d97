//! Applying on-disk changes to a live [`VaultIndex`].
//!
//! Takes the host paths reported by [`crate::vault::VaultWatcher`] and turns
//! each into updates or removals. A rename shows up as its old path (now
//! missing) and its new path (now present), so it lands as remove-then-add.

use std::path::PathBuf;

use serde::Serialize;

use super::vault::VaultIndex;
use crate::paths;
use crate::vault::VaultWalker;

/// One index mutation made by [`sync_paths`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", content = "path", rename_all = "lowercase")]
pub enum SyncChange {
    Updated(String),
    Removed(String),
}

/// Bring the index in line with the current state of `changed` host paths.
///
/// Paths outside the vault or inside skipped folders are ignored. A path
/// that no longer exists removes its note, or every note under it when it
/// was a folder. Unreadable files are logged and left as they were.
pub fn sync_paths(
    index: &mut VaultIndex,
    walker: &VaultWalker,
    changed: &[PathBuf],
) -> Vec<SyncChange> {
    let mut changes = Vec::new();

    for host in changed {
        let Some(vault_path) = walker.vault_path_of(host) else {
            tracing::trace!(path = %host.display(), "ignoring change outside the vault");
            continue;
        };

        if host.is_dir() {
            match walker.walk_dir(host) {
                Ok(files) => {
                    for file in files {
                        update_from_disk(index, &file.host_path, &file.vault_path, &mut changes);
                    }
                }
                Err(e) => tracing::warn!("failed to rescan {}: {e}", host.display()),
            }
        } else if host.is_file() {
            if paths::is_markdown_path(&vault_path) {
                update_from_disk(index, host, &vault_path, &mut changes);
            }
        } else if paths::is_markdown_path(&vault_path) {
            if index.remove_canonical(&vault_path) {
                changes.push(SyncChange::Removed(vault_path));
            }
        } else {
            remove_folder(index, &vault_path, &mut changes);
        }
    }

    if !changes.is_empty() {
        tracing::debug!(changes = changes.len(), "synced vault changes");
    }
    changes
}

fn update_from_disk(
    index: &mut VaultIndex,
    host: &std::path::Path,
    vault_path: &str,
    changes: &mut Vec<SyncChange>,
) {
    let content = match std::fs::read_to_string(host) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to index {}: {}", host.display(), e);
            return;
        }
    };

    if index.note_canonical(vault_path).is_some_and(|n| n.content == content) {
        return;
    }
    index.update_canonical(vault_path, &content);
    changes.push(SyncChange::Updated(vault_path.to_string()));
}

fn remove_folder(index: &mut VaultIndex, folder: &str, changes: &mut Vec<SyncChange>) {
    let prefix = format!("{}/", folder.trim_end_matches('/'));
    let doomed: Vec<String> = index
        .paths()
        .into_iter()
        .filter(|p| p.starts_with(&prefix))
        .map(ToString::to_string)
        .collect();

    for path in doomed {
        if index.remove_canonical(&path) {
            changes.push(SyncChange::Removed(path));
        }
    }
}
