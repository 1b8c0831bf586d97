//! Frontmatter parsing from markdown documents.

use super::types::{Frontmatter, FrontmatterBlock, ParsedDocument};
use thiserror::Error;

/// Errors that can occur during frontmatter parsing.
#[derive(Debug, Error)]
pub enum FrontmatterParseError {
    #[error("invalid YAML frontmatter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

/// Locate the frontmatter block without interpreting it.
///
/// Frontmatter must open on the very first line of the document:
/// ```markdown
/// ---
/// key: value
/// ---
/// # Document content
/// ```
/// An opening delimiter with no closing one is treated as ordinary text.
pub fn split(content: &str) -> Option<FrontmatterBlock<'_>> {
    let first_line_end = content.find('\n')?;
    if content[..first_line_end].trim_end() != "---" {
        return None;
    }

    let yaml_start = first_line_end + 1;
    let mut offset = yaml_start;
    for line in content[yaml_start..].split_inclusive('\n') {
        if line.trim() == "---" {
            return Some(FrontmatterBlock {
                yaml: &content[yaml_start..offset],
                body_offset: offset + line.len(),
            });
        }
        offset += line.len();
    }

    None
}

/// Parse frontmatter from markdown content.
pub fn parse(content: &str) -> Result<ParsedDocument, FrontmatterParseError> {
    let Some(block) = split(content) else {
        return Ok(ParsedDocument::default());
    };

    let frontmatter: Frontmatter = if block.yaml.trim().is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(block.yaml)?
    };

    Ok(ParsedDocument { frontmatter: Some(frontmatter), body_offset: block.body_offset })
}
