//! Ranked name and content search.
//!
//! Plain queries match note names in three tiers (prefix, substring, ordered
//! subsequence), falling back to a token index over note bodies. Queries
//! starting with `tag:`, `file:`, `path:` or `content:` match a single facet
//! instead. Ranking: tier, then shorter name, then path.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::ops::Bound;

use super::types::{MatchKind, SearchHit};

#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchEntry {
    name: String,
    name_lower: String,
    path_lower: String,
    content_lower: String,
    tags_lower: Vec<String>,
    tokens: BTreeSet<String>,
}

/// Search structures for every registered note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    entries: HashMap<String, SearchEntry>,
    /// Content token -> paths containing it.
    tokens: BTreeMap<String, BTreeSet<String>>,
}

/// A parsed search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Name(String),
    Tag(String),
    File(String),
    Path(String),
    Content(String),
}

impl SearchQuery {
    /// Parse raw query text. Returns `None` for blank queries.
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.trim().to_lowercase();

        let query = if let Some(rest) = lower.strip_prefix("tag:") {
            Self::Tag(rest.trim().trim_start_matches('#').to_string())
        } else if let Some(rest) = lower.strip_prefix("file:") {
            Self::File(rest.trim().to_string())
        } else if let Some(rest) = lower.strip_prefix("path:") {
            Self::Path(rest.trim().to_string())
        } else if let Some(rest) = lower.strip_prefix("content:") {
            Self::Content(rest.trim().to_string())
        } else {
            Self::Name(lower)
        };

        (!query.text().is_empty()).then_some(query)
    }

    /// The query text with any operator stripped, lowercased.
    pub fn text(&self) -> &str {
        match self {
            Self::Name(t) | Self::Tag(t) | Self::File(t) | Self::Path(t) | Self::Content(t) => t,
        }
    }
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the entry for `path`.
    pub fn index(&mut self, path: &str, name: &str, content: &str, tags: &[String]) {
        self.remove(path);

        let tokens = tokenize(content);
        for token in &tokens {
            self.tokens.entry(token.clone()).or_default().insert(path.to_string());
        }

        self.entries.insert(
            path.to_string(),
            SearchEntry {
                name: name.to_string(),
                name_lower: name.to_lowercase(),
                path_lower: path.to_lowercase(),
                content_lower: content.to_lowercase(),
                tags_lower: tags.iter().map(|t| t.to_lowercase()).collect(),
                tokens,
            },
        );
    }

    pub fn remove(&mut self, path: &str) -> bool {
        let Some(entry) = self.entries.remove(path) else {
            return false;
        };

        for token in &entry.tokens {
            if let Some(paths) = self.tokens.get_mut(token) {
                paths.remove(path);
                if paths.is_empty() {
                    self.tokens.remove(token);
                }
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ranked hits for raw query text.
    pub fn query(&self, text: &str) -> Vec<SearchHit> {
        let Some(query) = SearchQuery::parse(text) else {
            return Vec::new();
        };

        let body_matches = match &query {
            SearchQuery::Name(q) => self.token_matches(q),
            _ => HashSet::new(),
        };

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .filter_map(|(path, entry)| {
                let kind = match &query {
                    SearchQuery::Name(q) => name_match(&entry.name_lower, q).or_else(|| {
                        body_matches.contains(path.as_str()).then_some(MatchKind::Content)
                    }),
                    SearchQuery::File(q) => facet_match(&entry.name_lower, q),
                    SearchQuery::Path(q) => facet_match(&entry.path_lower, q),
                    SearchQuery::Tag(q) => {
                        entry.tags_lower.iter().filter_map(|t| facet_match(t, q)).min_by_key(tier)
                    }
                    SearchQuery::Content(q) => {
                        entry.content_lower.contains(q.as_str()).then_some(MatchKind::Content)
                    }
                }?;

                Some(SearchHit {
                    path: path.clone(),
                    name: entry.name.clone(),
                    score: kind.score(),
                    kind,
                })
            })
            .collect();

        hits.sort_by(compare_hits);
        hits
    }

    /// Paths whose body has, for every query word, a token starting with it.
    fn token_matches(&self, query: &str) -> HashSet<&str> {
        let words = tokenize(query);
        let mut result: Option<HashSet<&str>> = None;

        for word in &words {
            let paths: HashSet<&str> = self
                .tokens
                .range::<str, _>((Bound::Included(word.as_str()), Bound::Unbounded))
                .take_while(|(token, _)| token.starts_with(word.as_str()))
                .flat_map(|(_, paths)| paths.iter().map(String::as_str))
                .collect();

            result = Some(match result {
                Some(acc) => acc.intersection(&paths).copied().collect(),
                None => paths,
            });
        }

        result.unwrap_or_default()
    }
}

/// Total order on hits: best tier, then shorter name, then path.
pub fn compare_hits(a: &SearchHit, b: &SearchHit) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.name.chars().count().cmp(&b.name.chars().count()))
        .then_with(|| a.path.cmp(&b.path))
}

/// Match a lowercase query against a lowercase name, best tier first.
pub fn name_match(name_lower: &str, query: &str) -> Option<MatchKind> {
    facet_match(name_lower, query)
        .or_else(|| is_subsequence(name_lower, query).then_some(MatchKind::Subsequence))
}

fn facet_match(haystack: &str, needle: &str) -> Option<MatchKind> {
    if haystack.starts_with(needle) {
        Some(MatchKind::Prefix)
    } else if haystack.contains(needle) {
        Some(MatchKind::Substring)
    } else {
        None
    }
}

fn tier(kind: &MatchKind) -> std::cmp::Reverse<u32> {
    std::cmp::Reverse(kind.score())
}

/// Whether the non-whitespace characters of `query` occur in order in `haystack`.
fn is_subsequence(haystack: &str, query: &str) -> bool {
    let mut chars = haystack.chars();
    query.chars().filter(|c| !c.is_whitespace()).all(|q| chars.any(|h| h == q))
}

fn tokenize(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|h| h.name.as_str()).collect()
    }

    fn index_of(notes: &[(&str, &str, &str, &[&str])]) -> SearchIndex {
        let mut index = SearchIndex::new();
        for (path, name, content, tags) in notes {
            let tags: Vec<String> = tags.iter().map(ToString::to_string).collect();
            index.index(path, name, content, &tags);
        }
        index
    }

    #[test]
    fn test_ranking_tiers() {
        let index = index_of(&[
            ("/Project Plan.md", "Project Plan", "", &[]),
            ("/Plan B.md", "Plan B", "", &[]),
            ("/Another Plan.md", "Another Plan", "", &[]),
            ("/Pale Lantern.md", "Pale Lantern", "", &[]),
            ("/Unrelated.md", "Unrelated", "", &[]),
        ]);

        let hits = index.query("Plan");
        assert_eq!(names(&hits), vec!["Plan B", "Another Plan", "Project Plan", "Pale Lantern"]);
        assert_eq!(hits[0].kind, MatchKind::Prefix);
        assert_eq!(hits[1].kind, MatchKind::Substring);
        assert_eq!(hits[3].kind, MatchKind::Subsequence);
    }

    #[test]
    fn test_ties_by_length_then_path() {
        let index = index_of(&[
            ("/b/Note.md", "Note", "", &[]),
            ("/a/Note.md", "Note", "", &[]),
            ("/Notebook.md", "Notebook", "", &[]),
        ]);

        let hits = index.query("note");
        let paths: Vec<_> = hits.iter().map(|h| h.path.as_str()).collect();
        assert_eq!(paths, vec!["/a/Note.md", "/b/Note.md", "/Notebook.md"]);
    }

    #[test]
    fn test_content_fallback_ranks_last() {
        let index = index_of(&[
            ("/Alpha.md", "Alpha", "talks about gardening", &[]),
            ("/Gardening.md", "Gardening", "", &[]),
        ]);

        let hits = index.query("garden");
        assert_eq!(names(&hits), vec!["Gardening", "Alpha"]);
        assert_eq!(hits[1].kind, MatchKind::Content);
    }

    #[test]
    fn test_facet_operators() {
        let index = index_of(&[
            ("/work/Standup.md", "Standup", "notes from the standup", &["work", "daily"]),
            ("/home/Groceries.md", "Groceries", "milk", &["home"]),
        ]);

        assert_eq!(names(&index.query("tag:#work")), vec!["Standup"]);
        assert_eq!(names(&index.query("tag:me")), vec!["Groceries"]);
        assert_eq!(names(&index.query("path:/home/")), vec!["Groceries"]);
        assert_eq!(names(&index.query("file:stand")), vec!["Standup"]);
        assert_eq!(names(&index.query("content:from the")), vec!["Standup"]);
        assert!(index.query("file:milk").is_empty());
    }

    #[test]
    fn test_blank_queries() {
        let index = index_of(&[("/a.md", "a", "", &[])]);
        assert!(index.query("").is_empty());
        assert!(index.query("   ").is_empty());
        assert!(index.query("tag:").is_empty());
    }

    #[test]
    fn test_reindex_replaces_tokens() {
        let mut index = index_of(&[("/a.md", "a", "old words", &[])]);
        index.index("/a.md", "a", "new words", &[]);

        assert!(index.query("old").is_empty());
        assert_eq!(names(&index.query("new")), vec!["a"]);

        let fresh = index_of(&[("/a.md", "a", "new words", &[])]);
        assert_eq!(index, fresh);

        assert!(index.remove("/a.md"));
        assert_eq!(index, SearchIndex::new());
    }

    #[test]
    fn test_subsequence_ignores_query_spaces() {
        assert!(is_subsequence("project plan", "pj pl"));
        assert!(!is_subsequence("plan", "nap"));
    }
}
