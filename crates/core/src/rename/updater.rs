//! Reference update logic for rename operations.
//!
//! Only the target part of a marker is replaced; the embed `!`, subpath,
//! alias and any padding inside the brackets are kept as written.

use crate::paths;
use crate::rename::types::{LinkRewrite, Reference};

/// The target text a reference should carry after the rename.
///
/// Bare names become the new display name. Path-qualified targets become the
/// new canonical path. A leading `/` or `.md` suffix in the original is kept.
pub fn new_target_for(reference: &Reference, new_path: &str) -> String {
    let written = reference.link.target.as_str();
    let with_ext = paths::is_markdown_path(written);

    let mut target = if reference.uses_full_path() {
        let relative = paths::strip_markdown_extension(new_path.trim_start_matches('/'));
        if written.starts_with('/') { format!("/{relative}") } else { relative.to_string() }
    } else {
        paths::display_name(new_path).to_string()
    };

    if with_ext {
        target.push_str(paths::MARKDOWN_EXTENSION);
    }
    target
}

/// Replace the target inside a marker such as `![[ Old #Intro|alias]]`.
pub fn rewrite_marker(original: &str, new_target: &str) -> String {
    let open = original.find("[[").map_or(0, |i| i + 2);
    let rest = &original[open..];
    let end = rest.find(['#', '|', ']']).unwrap_or(rest.len());
    let raw = &rest[..end];

    let lead = raw.len() - raw.trim_start().len();
    let trail = raw.trim_end().len().max(lead);

    format!(
        "{}{}{}{}{}",
        &original[..open],
        &raw[..lead],
        new_target,
        &raw[trail..],
        &rest[end..]
    )
}

/// Apply reference updates to note content, returning the new content and
/// what changed.
pub fn apply_updates(
    content: &str,
    references: &[Reference],
    new_path: &str,
) -> (String, Vec<LinkRewrite>) {
    // Apply from the end so earlier spans stay valid.
    let mut sorted: Vec<&Reference> = references.iter().collect();
    sorted.sort_by(|a, b| b.link.span.start.cmp(&a.link.span.start));

    let mut result = content.to_string();
    let mut rewrites = Vec::with_capacity(sorted.len());

    for reference in sorted {
        let span = reference.span();
        if span.end > result.len() || !result.is_char_boundary(span.start) {
            continue;
        }

        let replacement = rewrite_marker(&reference.original, &new_target_for(reference, new_path));
        if replacement == reference.original {
            continue;
        }
        result.replace_range(span, &replacement);
        rewrites.push(LinkRewrite {
            line_number: reference.link.line_number,
            original: reference.original.clone(),
            replacement,
        });
    }

    rewrites.reverse();
    (result, rewrites)
}
