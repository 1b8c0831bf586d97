//! Display-name to canonical-path resolution.
//!
//! Display names are not unique, so every lowercase name owns a bucket of
//! paths in indexing order. The policy is last-writer-wins: the most recently
//! (re)indexed note in a bucket is the one a bare name resolves to. Every
//! consumer (graph edges, name lookup, rename planning) resolves through
//! [`NameResolver::resolve`], so the policy cannot drift between them.

use std::collections::HashMap;

use crate::paths;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameResolver {
    buckets: HashMap<String, Vec<String>>,
}

impl NameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path`, making it the preferred note for its name.
    /// Returns the bucket key.
    pub fn insert(&mut self, path: &str) -> String {
        let key = bucket_key(path);
        let bucket = self.buckets.entry(key.clone()).or_default();
        bucket.retain(|p| p != path);
        bucket.push(path.to_string());
        key
    }

    /// Unregister `path`. Returns whether it was present.
    pub fn remove(&mut self, path: &str) -> bool {
        let key = bucket_key(path);
        let Some(bucket) = self.buckets.get_mut(&key) else {
            return false;
        };

        let before = bucket.len();
        bucket.retain(|p| p != path);
        let removed = bucket.len() != before;
        if bucket.is_empty() {
            self.buckets.remove(&key);
        }
        removed
    }

    /// Resolve a link target or note name to a canonical path.
    ///
    /// Bare names (`Plan`, `plan.md`) pick the preferred note of their bucket.
    /// Path-qualified targets (`projects/Plan`) only match the note at exactly
    /// that path, compared case-insensitively.
    pub fn resolve(&self, target: &str) -> Option<&str> {
        let normalized = normalize_target(target);
        if normalized.is_empty() {
            return None;
        }

        let bucket = self.buckets.get(&target_key(normalized))?;

        if normalized.contains('/') {
            let wanted = format!("/{normalized}").to_lowercase();
            bucket
                .iter()
                .rev()
                .find(|p| paths::strip_markdown_extension(p).to_lowercase() == wanted)
                .map(String::as_str)
        } else {
            bucket.last().map(String::as_str)
        }
    }

    /// The preferred path for a bucket key.
    pub fn preferred(&self, key: &str) -> Option<&str> {
        self.buckets.get(key).and_then(|b| b.last()).map(String::as_str)
    }

    /// Distinct display names, sorted case-insensitively.
    pub fn all_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .buckets
            .values()
            .flatten()
            .map(|p| paths::display_name(p).to_string())
            .collect();

        names.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
        names.dedup();
        names
    }

    /// All paths sharing a display name with `name`, oldest first.
    pub fn candidates(&self, name: &str) -> &[String] {
        self.buckets.get(&target_key(normalize_target(name))).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Bucket key of a registered note.
pub fn bucket_key(path: &str) -> String {
    paths::display_name(path).to_lowercase()
}

/// Bucket key a link target would be looked up under.
pub fn target_key(target: &str) -> String {
    let normalized = normalize_target(target);
    normalized.rsplit('/').next().unwrap_or(normalized).to_lowercase()
}

fn normalize_target(target: &str) -> &str {
    let trimmed = target.trim().trim_start_matches('/');
    paths::strip_markdown_extension(trimmed)
}
