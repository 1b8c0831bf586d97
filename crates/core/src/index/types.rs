//! Index data types for vault notes, search hits and graph views.

use serde::{Deserialize, Serialize};

use crate::paths;
use crate::vault::{ExtractedLink, content_hash_str, extract};

/// A note registered in the vault index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Canonical vault path (unique key).
    pub path: String,
    /// Display name: final path segment without `.md`.
    pub name: String,
    /// Last known full text.
    pub content: String,
    /// Fingerprint of `content`.
    pub content_hash: String,
    /// Links as written, in document order.
    pub links: Vec<ExtractedLink>,
    /// Distinct tags, without `#`.
    pub tags: Vec<String>,
}

impl Note {
    /// Build a note by running extraction over `content`.
    pub fn parse(path: String, content: &str) -> Self {
        let extracted = extract(content);
        Self {
            name: paths::display_name(&path).to_string(),
            path,
            content: content.to_string(),
            content_hash: content_hash_str(content),
            links: extracted.links,
            tags: extracted.tags,
        }
    }
}

/// A note linking to the queried note, with its stored content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backlink {
    pub path: String,
    pub content: String,
}

/// How a search hit matched, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// The query (or facet value) starts the name.
    Prefix,
    /// The query occurs inside the name.
    Substring,
    /// The query's characters occur in order inside the name.
    Subsequence,
    /// Only the note body matched.
    Content,
}

impl MatchKind {
    pub fn score(&self) -> u32 {
        match self {
            Self::Prefix => 300,
            Self::Substring => 200,
            Self::Subsequence => 100,
            Self::Content => 50,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prefix => "prefix",
            Self::Substring => "substring",
            Self::Subsequence => "subsequence",
            Self::Content => "content",
        }
    }
}

/// A ranked search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub path: String,
    pub name: String,
    pub score: u32,
    pub kind: MatchKind,
}

/// Number of notes carrying a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// A link target that no registered note answers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedLink {
    /// Target as first written.
    pub target: String,
    /// Notes containing the link, sorted.
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub path: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

/// Nodes and edges for the global or a local graph view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
