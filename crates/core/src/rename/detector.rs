//! Reference detection for rename operations.
//!
//! Finds the links in a note that currently resolve to a given path, with
//! exact byte spans for format-preserving updates.

use crate::index::NameResolver;
use crate::rename::types::Reference;
use crate::vault::extract;

/// Links in `content` that resolve to `target_path` under `names`.
///
/// Links to other notes sharing the display name are left alone: only the
/// note the resolver actually picks counts.
pub fn find_references_in_content(
    content: &str,
    source_path: &str,
    target_path: &str,
    names: &NameResolver,
) -> Vec<Reference> {
    extract(content)
        .links
        .into_iter()
        .filter(|link| names.resolve(&link.target) == Some(target_path))
        .filter_map(|link| {
            let original = content.get(link.span.clone())?.to_string();
            Some(Reference { source_path: source_path.to_string(), link, original })
        })
        .collect()
}
