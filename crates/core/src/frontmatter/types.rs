//! Frontmatter types and data structures.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;

/// Represents parsed YAML frontmatter from a markdown document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Fields as key-value pairs.
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
}

impl Frontmatter {
    /// Tags declared under `tags:` (or `tag:`), without a leading `#`.
    ///
    /// Accepts a list of strings or a single string of comma/space separated
    /// tags, which are the two shapes found in real vaults.
    pub fn tags(&self) -> Vec<String> {
        let Some(value) = self.fields.get("tags").or_else(|| self.fields.get("tag")) else {
            return Vec::new();
        };

        let raw: Vec<&str> = match value {
            Value::String(s) => s.split([',', ' ']).collect(),
            Value::Sequence(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };

        raw.into_iter()
            .map(|t| t.trim().trim_start_matches('#'))
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

/// Location of a frontmatter block inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontmatterBlock<'a> {
    /// Raw YAML between the `---` delimiters.
    pub yaml: &'a str,
    /// Byte offset where the markdown body starts.
    pub body_offset: usize,
}

/// Result of splitting frontmatter from markdown.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Parsed frontmatter (if present).
    pub frontmatter: Option<Frontmatter>,
    /// Byte offset of the markdown body (0 when there is no frontmatter).
    pub body_offset: usize,
}
