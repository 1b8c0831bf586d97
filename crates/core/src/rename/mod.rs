//! Note renames with automatic link rewrites.
//!
//! A rename is planned against the current index first: backlinks are
//! captured and every link resolving to the old path is rewritten in memory.
//! Applying the plan then runs `remove_canonical(old)`,
//! `update_canonical(new, ..)` and one `update_canonical` per rewritten note.
//! Writing files is left to the caller.

mod detector;
mod types;
mod updater;

pub use types::*;

use crate::index::VaultIndex;
use crate::paths;

use detector::find_references_in_content;
use updater::apply_updates;

/// Work out what renaming `old_path` to `new_path` would change.
///
/// Both paths may be canonical or host paths under the vault root; a path
/// without a leading `/` is always read as vault-relative. Nothing is
/// modified.
pub fn plan_rename(
    index: &VaultIndex,
    old_path: &str,
    new_path: &str,
) -> Result<RenamePlan, RenameError> {
    let old_path = index.vault_path(old_path);
    let new_path = index.vault_path(new_path);

    if !paths::is_markdown_path(&new_path) {
        return Err(RenameError::NotMarkdown(new_path));
    }
    let note = index
        .note_canonical(&old_path)
        .ok_or_else(|| RenameError::SourceNotFound(old_path.clone()))?;
    if new_path == old_path || index.note_canonical(&new_path).is_some() {
        return Err(RenameError::TargetExists(new_path));
    }

    let names = index.name_resolver();

    let own_refs = find_references_in_content(&note.content, &old_path, &old_path, names);
    let (content, self_rewrites) = apply_updates(&note.content, &own_refs, &new_path);

    let mut changes = Vec::new();
    for backlink in index.find_backlinks(&old_path) {
        if backlink.path == old_path {
            continue;
        }
        let refs = find_references_in_content(&backlink.content, &backlink.path, &old_path, names);
        let (new_content, rewrites) = apply_updates(&backlink.content, &refs, &new_path);
        if rewrites.is_empty() {
            continue;
        }
        changes.push(FileChange {
            path: backlink.path,
            original_content: backlink.content,
            new_content,
            rewrites,
        });
    }

    let mut warnings = Vec::new();
    let new_name = paths::display_name(&new_path);
    let clashes = names.candidates(new_name).iter().filter(|p| **p != old_path).count();
    if clashes > 0 {
        warnings.push(format!(
            "{clashes} existing note(s) are also named '{new_name}'; \
             bare [[{new_name}]] links will point at whichever was indexed last"
        ));
    }

    tracing::debug!(
        old = %old_path,
        new = %new_path,
        files = changes.len(),
        "planned rename"
    );

    Ok(RenamePlan { old_path, new_path, content, self_rewrites, changes, warnings })
}

/// Apply a plan to the index.
///
/// Fails without touching the index when the plan is stale: the source is
/// gone or the target has appeared since planning.
pub fn apply_rename(
    index: &mut VaultIndex,
    plan: &RenamePlan,
) -> Result<RenameResult, RenameError> {
    if index.note_canonical(&plan.old_path).is_none() {
        return Err(RenameError::SourceNotFound(plan.old_path.clone()));
    }
    if index.note_canonical(&plan.new_path).is_some() {
        return Err(RenameError::TargetExists(plan.new_path.clone()));
    }

    index.remove_canonical(&plan.old_path);
    index.update_canonical(&plan.new_path, &plan.content);
    for change in &plan.changes {
        index.update_canonical(&change.path, &change.new_content);
    }

    tracing::info!(old = %plan.old_path, new = %plan.new_path, "renamed note");

    Ok(RenameResult {
        old_path: plan.old_path.clone(),
        new_path: plan.new_path.clone(),
        files_modified: plan.changes.iter().map(|c| c.path.clone()).collect(),
        links_rewritten: plan.total_rewrites(),
        warnings: plan.warnings.clone(),
    })
}
