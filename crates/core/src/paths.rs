//! Translation between host filesystem paths and canonical vault paths.
//!
//! The rest of the system names notes in two ways:
//! - **canonical** paths are root-relative, `/`-separated and always start
//!   with `/` (e.g. `/projects/Plan.md`); links, display and every index key
//!   use this form.
//! - **host** paths are fully-qualified and use whatever separator the vault
//!   root was written with (e.g. `C:\notes\projects\Plan.md`); file I/O uses
//!   this form.
//!
//! Both directions accept `/` and `\` on input, independent of the platform
//! the code runs on.

/// Markdown file extension recognised as a note.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// Convert a host path into a canonical vault path.
///
/// Paths that do not lie under `vault_root` are returned unchanged so callers
/// can tell "outside the vault" apart from a translated path.
pub fn to_vault_path(host_path: &str, vault_root: &str) -> String {
    let root = normalize_separators(vault_root);
    let root = root.trim_end_matches('/');
    let path = normalize_separators(host_path);

    match path.strip_prefix(root) {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => host_path.to_string(),
    }
}

/// Convert a canonical vault path into a host path under `vault_root`.
///
/// The separator is taken from the root string itself: a root containing `\`
/// produces `\`-separated output on every platform.
pub fn to_os_path(canonical_path: &str, vault_root: &str) -> String {
    let sep = host_separator(vault_root);
    let root = vault_root.trim_end_matches(['/', '\\']);

    let relative = normalize_separators(canonical_path);
    let relative = relative.trim_start_matches('/');

    if relative.is_empty() {
        return if root.is_empty() { sep.to_string() } else { root.to_string() };
    }

    let relative = if sep == '\\' {
        relative.replace('/', "\\")
    } else {
        relative.to_string()
    };

    format!("{root}{sep}{relative}")
}

/// Bring a path given by a caller into canonical form without a root:
/// forward slashes and a single leading `/`.
pub fn canonicalize(path: &str) -> String {
    let normalized = normalize_separators(path);
    let trimmed = normalized.trim_start_matches('/');
    format!("/{trimmed}")
}

/// Whether a path names a markdown note (case-insensitive `.md` suffix).
pub fn is_markdown_path(path: &str) -> bool {
    strip_markdown_extension(path).len() != path.len()
}

/// The display name of a note: final path segment without the `.md` extension.
pub fn display_name(canonical_path: &str) -> &str {
    let file_name = canonical_path.rsplit(['/', '\\']).next().unwrap_or(canonical_path);
    strip_markdown_extension(file_name)
}

/// Strip a trailing `.md` (any case) if present.
pub fn strip_markdown_extension(name: &str) -> &str {
    let ext_len = MARKDOWN_EXTENSION.len();
    if name.len() > ext_len
        && let Some(tail) = name.get(name.len() - ext_len..)
        && tail.eq_ignore_ascii_case(MARKDOWN_EXTENSION)
    {
        return &name[..name.len() - ext_len];
    }
    name
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

fn host_separator(vault_root: &str) -> char {
    if vault_root.contains('\\') { '\\' } else { '/' }
}
