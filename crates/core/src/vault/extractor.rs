//! Note content extraction: wikilinks, embeds, block/heading references and tags.
//!
//! Extraction is total: any input text produces a (possibly empty) result and
//! malformed markers are simply not recognised.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::frontmatter;

/// Kind of link marker found in a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    /// Wikilink: `[[note]]` or `[[note|alias]]`
    Link,
    /// Transclusion: `![[note]]`
    Embed,
    /// Heading reference: `[[note#Heading]]` or `![[note#Heading]]`
    HeadingRef,
    /// Block reference: `[[note#^block]]` or `![[note#^block]]`
    BlockRef,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Embed => "embed",
            Self::HeadingRef => "heading-ref",
            Self::BlockRef => "block-ref",
        }
    }
}

/// Everything the index needs from a note's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    /// All links in document order.
    pub links: Vec<ExtractedLink>,
    /// Distinct tags in first-seen order, without the leading `#`.
    pub tags: Vec<String>,
}

/// A link extracted from a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    /// Target note name/path as written, without subpath or alias.
    pub target: String,
    /// Display alias after `|`.
    pub alias: Option<String>,
    /// Type of link.
    pub kind: LinkKind,
    /// Whether the marker starts with `!`.
    pub embed: bool,
    /// Heading text or block id (without `^`) after `#`.
    pub subpath: Option<String>,
    /// Byte range of the whole marker in the content.
    pub span: Range<usize>,
    /// Line number where link appears (1-based).
    pub line_number: usize,
}

// Captures:
// 1: leading `!`
// 2: target
// 3: `^` of a block reference
// 4: heading text or block id
// 5: alias
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!)?\[\[([^\[\]|#]*)(?:#(\^)?([^\[\]|]*))?(?:\|([^\[\]]*))?\]\]").unwrap()
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_/-]+)").unwrap());

/// Extract links and tags from note content.
pub fn extract(content: &str) -> Extracted {
    let body_offset = frontmatter::split(content).map_or(0, |b| b.body_offset);

    let mut links = Vec::new();
    let mut tags = Vec::new();
    let mut seen_tags = HashSet::new();
    let mut fence: Option<(char, usize)> = None;
    let mut offset = 0;

    for (line_idx, raw_line) in content.split_inclusive('\n').enumerate() {
        let line_start = offset;
        offset += raw_line.len();
        let line = raw_line.trim_end_matches(['\n', '\r']);

        if line_start >= body_offset {
            match (fence, fence_marker(line)) {
                (None, Some(open)) => {
                    fence = Some(open);
                    continue;
                }
                (Some((ch, len)), Some((close_ch, close_len)))
                    if close_ch == ch && close_len >= len && is_bare_fence(line) =>
                {
                    fence = None;
                    continue;
                }
                (Some(_), _) => continue,
                (None, None) => {}
            }
        }

        let line_number = line_idx + 1;
        let mut link_spans: Vec<Range<usize>> = Vec::new();

        for cap in LINK_RE.captures_iter(line) {
            let Some(whole) = cap.get(0) else { continue };
            link_spans.push(whole.range());

            let target = cap.get(2).map_or("", |m| m.as_str()).trim();
            if target.is_empty() {
                continue;
            }

            let embed = cap.get(1).is_some();
            let block = cap.get(3).is_some();
            let subpath = cap
                .get(4)
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
                .map(ToString::to_string);
            let alias = cap
                .get(5)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty())
                .map(ToString::to_string);

            let kind = match (block, cap.get(4).is_some(), embed) {
                (true, _, _) => LinkKind::BlockRef,
                (false, true, _) => LinkKind::HeadingRef,
                (false, false, true) => LinkKind::Embed,
                (false, false, false) => LinkKind::Link,
            };

            links.push(ExtractedLink {
                target: target.to_string(),
                alias,
                kind,
                embed,
                subpath,
                span: line_start + whole.start()..line_start + whole.end(),
                line_number,
            });
        }

        if line_start < body_offset {
            continue;
        }

        for cap in TAG_RE.captures_iter(line) {
            let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else { continue };
            if !starts_tag(line, whole.start()) {
                continue;
            }
            if link_spans.iter().any(|s| s.contains(&whole.start())) {
                continue;
            }
            if seen_tags.insert(name.as_str().to_string()) {
                tags.push(name.as_str().to_string());
            }
        }
    }

    if body_offset > 0 {
        match frontmatter::parse(content) {
            Ok(parsed) => {
                for tag in parsed.frontmatter.map(|fm| fm.tags()).unwrap_or_default() {
                    if seen_tags.insert(tag.clone()) {
                        tags.push(tag);
                    }
                }
            }
            Err(e) => tracing::debug!("ignoring frontmatter tags: {e}"),
        }
    }

    Extracted { links, tags }
}

/// A `#` opens a tag only at the start of a line or after whitespace or `(`.
fn starts_tag(line: &str, hash_pos: usize) -> bool {
    line[..hash_pos].chars().next_back().is_none_or(|c| c.is_whitespace() || c == '(')
}

/// Recognise a code fence opener/closer: up to three spaces of indent, then
/// three or more backticks or tildes.
fn fence_marker(line: &str) -> Option<(char, usize)> {
    let rest = line.trim_start_matches(' ');
    if line.len() - rest.len() > 3 {
        return None;
    }
    let ch = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let count = rest.chars().take_while(|c| *c == ch).count();
    (count >= 3).then_some((ch, count))
}

fn is_bare_fence(line: &str) -> bool {
    line.trim().chars().all(|c| c == '`' || c == '~')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn targets(content: &str) -> Vec<String> {
        extract(content).links.into_iter().map(|l| l.target).collect()
    }

    #[test]
    fn test_extract_wikilinks() {
        let content = "This links to [[other-note]] and [[another|with alias]].\n\
                       Also [[path/to/note]] works.\n";
        let extracted = extract(content);

        assert_eq!(extracted.links.len(), 3);
        assert_eq!(extracted.links[0].target, "other-note");
        assert_eq!(extracted.links[0].alias, None);
        assert_eq!(extracted.links[0].kind, LinkKind::Link);

        assert_eq!(extracted.links[1].target, "another");
        assert_eq!(extracted.links[1].alias.as_deref(), Some("with alias"));

        assert_eq!(extracted.links[2].target, "path/to/note");
        assert_eq!(extracted.links[2].line_number, 2);
    }

    #[test]
    fn test_line_numbers_in_long_document() {
        let mut content = "filler\n".repeat(200_000);
        content.push_str("end [[Last]]\n");

        let extracted = extract(&content);
        assert_eq!(extracted.links.len(), 1);
        assert_eq!(extracted.links[0].line_number, 200_001);
    }

    #[rstest]
    #[case("![[Note]]", LinkKind::Embed, true, None)]
    #[case("[[Note]]", LinkKind::Link, false, None)]
    #[case("![[Note#Heading]]", LinkKind::HeadingRef, true, Some("Heading"))]
    #[case("[[Note#Heading|see]]", LinkKind::HeadingRef, false, Some("Heading"))]
    #[case("![[Note#^abc123]]", LinkKind::BlockRef, true, Some("abc123"))]
    #[case("[[Note#^abc123]]", LinkKind::BlockRef, false, Some("abc123"))]
    fn test_link_kinds(
        #[case] content: &str,
        #[case] kind: LinkKind,
        #[case] embed: bool,
        #[case] subpath: Option<&str>,
    ) {
        let extracted = extract(content);
        assert_eq!(extracted.links.len(), 1);
        let link = &extracted.links[0];
        assert_eq!(link.target, "Note");
        assert_eq!(link.kind, kind);
        assert_eq!(link.embed, embed);
        assert_eq!(link.subpath.as_deref(), subpath);
        assert_eq!(link.span, 0..content.len());
    }

    #[test]
    fn test_spans_point_into_content() {
        let content = "line one\nsee ![[b#^x]] and [[c|C]]\n";
        for link in extract(content).links {
            let marker = &content[link.span.clone()];
            assert!(marker.contains(&link.target));
            assert!(marker.ends_with("]]"));
        }
    }

    #[test]
    fn test_extract_tags() {
        let extracted = extract("#start then #work and #a/b-c_d.\nrepeat #work");
        assert_eq!(extracted.tags, vec!["start", "work", "a/b-c_d"]);
    }

    #[rstest]
    #[case("# Heading")]
    #[case("## Heading")]
    #[case("url https://example.com/page#section")]
    #[case("issue-#12 inline")]
    #[case("[[note#section]]")]
    fn test_not_a_tag(#[case] content: &str) {
        assert!(extract(content).tags.is_empty(), "{content}");
    }

    #[test]
    fn test_fenced_code_is_skipped() {
        let content = "[[before]]\n```rust\nlet x = \"[[inside]] #nope\";\n```\n[[after]] #yes\n";
        let extracted = extract(content);
        assert_eq!(targets(content), vec!["before", "after"]);
        assert_eq!(extracted.tags, vec!["yes"]);
    }

    #[test]
    fn test_tilde_fence_needs_matching_closer() {
        let content = "~~~~\n[[a]]\n~~~\n[[b]]\n~~~~\n[[c]]\n";
        assert_eq!(targets(content), vec!["c"]);
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let content = "[[a]]\n```\n[[b]]\n";
        assert_eq!(targets(content), vec!["a"]);
    }

    #[rstest]
    #[case("[[unclosed")]
    #[case("]] [[")]
    #[case("[[]]")]
    #[case("[[#Heading only]]")]
    #[case("![[")]
    #[case("#")]
    #[case("[[a|b")]
    #[case("\u{1F600}[[\u{1F600}")]
    #[case("")]
    fn test_malformed_input_yields_no_links(#[case] content: &str) {
        assert!(extract(content).links.is_empty());
    }

    #[test]
    fn test_frontmatter_tags_merge() {
        let content = "---\ntags: [alpha, work]\nrelated: \"[[fm-link]]\"\n---\nBody #work #beta\n";
        let extracted = extract(content);
        assert_eq!(extracted.tags, vec!["work", "beta", "alpha"]);
        assert_eq!(targets(content), vec!["fm-link"]);
    }

    #[test]
    fn test_broken_frontmatter_is_ignored() {
        let content = "---\ntags: [unclosed\n---\nBody [[x]] #y\n";
        let extracted = extract(content);
        assert_eq!(extracted.tags, vec!["y"]);
        assert_eq!(targets(content), vec!["x"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "a [[one]]\r\n#tag\r\n";
        let extracted = extract(content);
        assert_eq!(extracted.links[0].span, 2..9);
        assert_eq!(extracted.tags, vec!["tag"]);
    }
}
