//! Data structures for note renames and link rewrites.

use std::ops::Range;

use serde::Serialize;
use thiserror::Error;

use crate::vault::ExtractedLink;

/// Errors that can occur during rename operations
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("source note not found: {0}")]
    SourceNotFound(String),

    #[error("target note already exists: {0}")]
    TargetExists(String),

    #[error("not a markdown path: {0}")]
    NotMarkdown(String),
}

/// A link in some note that resolves to the note being renamed.
#[derive(Debug, Clone)]
pub struct Reference {
    /// Canonical path of the note containing the link.
    pub source_path: String,
    /// The link as extracted.
    pub link: ExtractedLink,
    /// Marker text as written, e.g. `![[Old#Intro|see]]`.
    pub original: String,
}

impl Reference {
    pub fn span(&self) -> Range<usize> {
        self.link.span.clone()
    }

    /// Whether the target was written with a folder, e.g. `[[dir/Old]]`.
    pub fn uses_full_path(&self) -> bool {
        self.link.target.contains('/')
    }
}

/// One marker replaced in a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRewrite {
    pub line_number: usize,
    pub original: String,
    pub replacement: String,
}

/// New content for a note whose links are rewritten.
#[derive(Debug, Clone, Serialize)]
pub struct FileChange {
    /// Canonical path of the note.
    pub path: String,
    #[serde(skip)]
    pub original_content: String,
    #[serde(skip)]
    pub new_content: String,
    pub rewrites: Vec<LinkRewrite>,
}

/// Everything a rename will do, computed before anything is touched.
#[derive(Debug, Clone, Serialize)]
pub struct RenamePlan {
    pub old_path: String,
    pub new_path: String,
    /// Content of the renamed note, with its own self-links rewritten.
    #[serde(skip)]
    pub content: String,
    /// Self-links rewritten inside the renamed note.
    pub self_rewrites: Vec<LinkRewrite>,
    /// Other notes whose links change.
    pub changes: Vec<FileChange>,
    pub warnings: Vec<String>,
}

impl RenamePlan {
    /// Total number of links that will be rewritten.
    pub fn total_rewrites(&self) -> usize {
        self.self_rewrites.len() + self.changes.iter().map(|c| c.rewrites.len()).sum::<usize>()
    }

    /// Number of notes other than the renamed one that will be modified.
    pub fn files_affected(&self) -> usize {
        self.changes.len()
    }
}

/// Result of a rename applied to the index.
#[derive(Debug, Clone, Serialize)]
pub struct RenameResult {
    pub old_path: String,
    pub new_path: String,
    /// Notes whose content changed, other than the renamed one.
    pub files_modified: Vec<String>,
    pub links_rewritten: usize,
    pub warnings: Vec<String>,
}
