//! The vault index: note registry plus every derived structure.
//!
//! [`VaultIndex`] is the only type UI code talks to. It owns the name
//! resolver, link graph, search index and tag/referrer tables, and keeps them
//! consistent with the registered notes after every call. Mutations take
//! `&mut self`, so one writer at a time is enforced by the borrow checker;
//! callers sharing an index between threads wrap it in their own lock.
//!
//! A rename is `remove_file(old)` followed by `update_file(new, ..)`. Between
//! the two calls the old node is gone from the graph, so backlinks must be
//! captured before the removal (see [`crate::rename`]).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use thiserror::Error;

use super::graph::LinkGraph;
use super::names::{self, NameResolver};
use super::search::SearchIndex;
use super::types::{
    Backlink, GraphEdge, GraphNode, GraphView, Note, SearchHit, TagCount, UnresolvedLink,
};
use crate::paths;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("vault root must not be empty")]
    EmptyRoot,
}

#[derive(Debug, Clone)]
pub struct VaultIndex {
    vault_root: String,
    notes: HashMap<String, Note>,
    names: NameResolver,
    graph: LinkGraph,
    search: SearchIndex,
    /// Lowercase tag -> notes carrying it.
    tags: BTreeMap<String, BTreeSet<String>>,
    /// Link target key -> notes containing a link with that key.
    referrers: BTreeMap<String, BTreeSet<String>>,
}

impl VaultIndex {
    /// Create an empty index for the vault at `vault_root` (a host path).
    pub fn new(vault_root: impl Into<String>) -> Result<Self, IndexError> {
        let vault_root = vault_root.into();
        if vault_root.trim().is_empty() {
            return Err(IndexError::EmptyRoot);
        }

        Ok(Self {
            vault_root,
            notes: HashMap::new(),
            names: NameResolver::new(),
            graph: LinkGraph::new(),
            search: SearchIndex::new(),
            tags: BTreeMap::new(),
            referrers: BTreeMap::new(),
        })
    }

    pub fn vault_root(&self) -> &str {
        &self.vault_root
    }

    /// Canonical form of a caller-supplied path, which may be a host path
    /// under the vault root or already canonical.
    ///
    /// A path that names a registered note as written is taken as canonical,
    /// so `/notes/todo.md` keeps addressing that note under a root of
    /// `/notes`. Any other path under the root is translated as a host path.
    pub fn vault_path(&self, path: &str) -> String {
        let as_canonical = paths::canonicalize(path);
        if self.notes.contains_key(&as_canonical) {
            return as_canonical;
        }
        paths::canonicalize(&paths::to_vault_path(path, &self.vault_root))
    }

    /// Insert or replace the note at `path`, a host path or a canonical one.
    ///
    /// For a note not yet registered, a path under the vault root is read as
    /// a host path. Callers that already hold canonical paths use
    /// [`Self::update_canonical`].
    pub fn update_file(&mut self, path: &str, content: &str) {
        let path = self.vault_path(path);
        self.update_canonical(&path, content);
    }

    /// Insert or replace the note at canonical `path`, never stripping the
    /// vault root from it.
    ///
    /// Re-delivering identical content is a no-op. Otherwise the note becomes
    /// the preferred target for its display name.
    pub fn update_canonical(&mut self, path: &str, content: &str) {
        let path = paths::canonicalize(path);

        if self.notes.get(&path).is_some_and(|n| n.content == content) {
            tracing::trace!(%path, "content unchanged");
            return;
        }

        // Everything derived from the new text is computed before any
        // structure is touched.
        let note = Note::parse(path.clone(), content);
        let new_keys = link_keys(&note);
        let (old_keys, old_tags) = self
            .notes
            .get(&path)
            .map(|old| (link_keys(old), tag_keys(old)))
            .unwrap_or_default();
        let new_tags = tag_keys(&note);
        let is_new = !self.notes.contains_key(&path);
        let own_key = names::bucket_key(&path);
        let preferred_before = self.names.preferred(&own_key).map(ToString::to_string);

        self.names.insert(&path);
        for key in old_keys.difference(&new_keys) {
            remove_member(&mut self.referrers, key, &path);
        }
        for key in new_keys.difference(&old_keys) {
            self.referrers.entry(key.clone()).or_default().insert(path.clone());
        }
        for tag in old_tags.difference(&new_tags) {
            remove_member(&mut self.tags, tag, &path);
        }
        for tag in new_tags.difference(&old_tags) {
            self.tags.entry(tag.clone()).or_default().insert(path.clone());
        }
        self.search.index(&path, &note.name, &note.content, &note.tags);

        tracing::debug!(
            %path,
            links = note.links.len(),
            tags = note.tags.len(),
            is_new,
            "indexed note"
        );
        self.notes.insert(path.clone(), note);

        self.relink(&path);
        if is_new || preferred_before.as_deref() != Some(path.as_str()) {
            self.relink_referrers(&own_key);
        }
    }

    /// Remove the note at `path` (host or canonical) and everything derived
    /// from it. Returns `false` when no such note was registered.
    pub fn remove_file(&mut self, path: &str) -> bool {
        let path = self.vault_path(path);
        self.remove_canonical(&path)
    }

    /// Like [`Self::remove_file`] for a path known to be canonical.
    pub fn remove_canonical(&mut self, path: &str) -> bool {
        let path = paths::canonicalize(path);
        let Some(note) = self.notes.remove(&path) else {
            return false;
        };

        self.names.remove(&path);
        for key in link_keys(&note) {
            remove_member(&mut self.referrers, &key, &path);
        }
        for tag in tag_keys(&note) {
            remove_member(&mut self.tags, &tag, &path);
        }
        self.search.remove(&path);
        self.graph.remove_node(&path);

        tracing::debug!(%path, "removed note");

        // Links to this name may now resolve to another note sharing it.
        self.relink_referrers(&names::bucket_key(&path));
        true
    }

    /// Resolve a note name (or link target) to its canonical path.
    pub fn get_file_path_by_name(&self, name: &str) -> Option<String> {
        self.names.resolve(name).map(ToString::to_string)
    }

    pub fn note_exists(&self, name: &str) -> bool {
        self.names.resolve(name).is_some()
    }

    pub fn search_files(&self, query: &str) -> Vec<SearchHit> {
        self.search.query(query)
    }

    /// Like [`Self::search_files`], with host paths ready for I/O.
    pub fn search_files_with_os_paths(&self, query: &str) -> Vec<SearchHit> {
        self.search
            .query(query)
            .into_iter()
            .map(|hit| SearchHit { path: self.get_os_path(&hit.path), ..hit })
            .collect()
    }

    /// Notes linking to `path`, each with its current content.
    pub fn find_backlinks(&self, path: &str) -> Vec<Backlink> {
        self.graph
            .backward_of(&self.vault_path(path))
            .into_iter()
            .filter_map(|source| {
                self.notes
                    .get(&source)
                    .map(|n| Backlink { path: source.clone(), content: n.content.clone() })
            })
            .collect()
    }

    pub fn get_all_note_names(&self) -> Vec<String> {
        self.names.all_names()
    }

    pub fn get_os_path(&self, path: &str) -> String {
        paths::to_os_path(path, &self.vault_root)
    }

    pub fn note(&self, path: &str) -> Option<&Note> {
        self.notes.get(&self.vault_path(path))
    }

    /// The note registered at exactly this canonical path.
    pub fn note_canonical(&self, path: &str) -> Option<&Note> {
        self.notes.get(&paths::canonicalize(path))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// All registered paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.notes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    pub fn forward_links(&self, path: &str) -> Vec<String> {
        self.graph.forward_of(&self.vault_path(path))
    }

    pub fn backlink_paths(&self, path: &str) -> Vec<String> {
        self.graph.backward_of(&self.vault_path(path))
    }

    /// Link targets in the note at `path` that resolve to no note, in
    /// document order without repeats.
    pub fn dangling_links(&self, path: &str) -> Vec<String> {
        let Some(note) = self.note(path) else {
            return Vec::new();
        };

        let mut seen = BTreeSet::new();
        note.links
            .iter()
            .filter(|l| self.names.resolve(&l.target).is_none())
            .filter(|l| seen.insert(l.target.to_lowercase()))
            .map(|l| l.target.clone())
            .collect()
    }

    /// Every unresolved target across the vault with the notes mentioning it.
    pub fn unresolved_links(&self) -> Vec<UnresolvedLink> {
        let mut grouped: BTreeMap<String, UnresolvedLink> = BTreeMap::new();

        for note in self.paths().into_iter().filter_map(|p| self.notes.get(p)) {
            for link in &note.links {
                if self.names.resolve(&link.target).is_some() {
                    continue;
                }
                let entry = grouped.entry(link.target.to_lowercase()).or_insert_with(|| {
                    UnresolvedLink { target: link.target.clone(), sources: Vec::new() }
                });
                if !entry.sources.contains(&note.path) {
                    entry.sources.push(note.path.clone());
                }
            }
        }

        grouped
            .into_values()
            .map(|mut u| {
                u.sources.sort();
                u
            })
            .collect()
    }

    /// Tag usage, most used first, then alphabetical. Tags compare
    /// case-insensitively and are reported lowercase.
    pub fn tags(&self) -> Vec<TagCount> {
        let mut tags: Vec<TagCount> = self
            .tags
            .iter()
            .map(|(tag, paths)| TagCount { tag: tag.clone(), count: paths.len() })
            .collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        tags
    }

    /// Notes carrying `tag` (with or without `#`), sorted.
    pub fn notes_with_tag(&self, tag: &str) -> Vec<String> {
        let key = tag.trim().trim_start_matches('#').to_lowercase();
        self.tags.get(&key).map(|p| p.iter().cloned().collect()).unwrap_or_default()
    }

    /// Every note and edge, for the global graph view.
    pub fn global_graph(&self) -> GraphView {
        let nodes: BTreeSet<String> = self.notes.keys().cloned().collect();
        self.graph_view(&nodes)
    }

    /// Notes within `depth` hops of `path` (links followed both ways) and the
    /// edges between them. Empty when `path` is not registered.
    pub fn local_graph(&self, path: &str, depth: usize) -> GraphView {
        let path = self.vault_path(path);
        if !self.notes.contains_key(&path) {
            return GraphView::default();
        }
        self.graph_view(&self.graph.neighborhood(&path, depth))
    }

    pub fn link_graph(&self) -> &LinkGraph {
        &self.graph
    }

    pub fn name_resolver(&self) -> &NameResolver {
        &self.names
    }

    pub fn search_index(&self) -> &SearchIndex {
        &self.search
    }

    fn graph_view(&self, members: &BTreeSet<String>) -> GraphView {
        let nodes = members
            .iter()
            .filter_map(|p| self.notes.get(p))
            .map(|n| GraphNode { path: n.path.clone(), name: n.name.clone() })
            .collect();

        let mut edges: Vec<GraphEdge> = self
            .graph
            .edges()
            .filter(|(s, t)| members.contains(*s) && members.contains(*t))
            .map(|(s, t)| GraphEdge { source: s.to_string(), target: t.to_string() })
            .collect();
        edges.sort_by(|a, b| a.source.cmp(&b.source).then_with(|| a.target.cmp(&b.target)));

        GraphView { nodes, edges }
    }

    /// Recompute the outgoing edges of `source` from its stored links.
    fn relink(&mut self, source: &str) {
        let Some(note) = self.notes.get(source) else {
            return;
        };
        let targets: BTreeSet<String> = note
            .links
            .iter()
            .filter_map(|l| self.names.resolve(&l.target))
            .map(ToString::to_string)
            .collect();
        self.graph.set_edges(source, targets);
    }

    /// Recompute edges for every note linking to a name, after the set of
    /// notes answering to that name changed.
    fn relink_referrers(&mut self, key: &str) {
        let sources: Vec<String> =
            self.referrers.get(key).map(|s| s.iter().cloned().collect()).unwrap_or_default();
        if !sources.is_empty() {
            tracing::trace!(key, sources = sources.len(), "re-resolving referrers");
        }
        for source in sources {
            self.relink(&source);
        }
    }
}

fn link_keys(note: &Note) -> BTreeSet<String> {
    note.links
        .iter()
        .map(|l| names::target_key(&l.target))
        .filter(|k| !k.is_empty())
        .collect()
}

fn tag_keys(note: &Note) -> BTreeSet<String> {
    note.tags.iter().map(|t| t.to_lowercase()).collect()
}

fn remove_member(map: &mut BTreeMap<String, BTreeSet<String>>, key: &str, member: &str) {
    if let Some(set) = map.get_mut(key) {
        set.remove(member);
        if set.is_empty() {
            map.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> VaultIndex {
        VaultIndex::new("/home/me/vault").unwrap()
    }

    #[test]
    fn test_empty_root_is_rejected() {
        assert!(matches!(VaultIndex::new("  "), Err(IndexError::EmptyRoot)));
    }

    #[test]
    fn test_end_to_end_backlinks() {
        let mut idx = index();
        idx.update_file("/a.md", "see [[b]] and #work");
        idx.update_file("/b.md", "hello");

        assert_eq!(
            idx.find_backlinks("/b.md"),
            vec![Backlink { path: "/a.md".into(), content: "see [[b]] and #work".into() }]
        );
        assert!(idx.note_exists("b"));
        assert!(!idx.note_exists("c"));
        assert_eq!(idx.notes_with_tag("#work"), vec!["/a.md"]);
    }

    #[test]
    fn test_host_paths_are_translated() {
        let mut idx = index();
        idx.update_file("/home/me/vault/dir/n.md", "[[n]]");

        assert!(idx.note("/dir/n.md").is_some());
        assert_eq!(idx.forward_links("/home/me/vault/dir/n.md"), vec!["/dir/n.md"]);
        assert_eq!(idx.get_os_path("/dir/n.md"), "/home/me/vault/dir/n.md");
    }

    #[test]
    fn test_link_before_target_exists() {
        let mut idx = index();
        idx.update_file("/a.md", "[[Later]]");
        assert_eq!(idx.dangling_links("/a.md"), vec!["Later"]);

        idx.update_file("/notes/Later.md", "");
        assert_eq!(idx.forward_links("/a.md"), vec!["/notes/Later.md"]);
        assert!(idx.dangling_links("/a.md").is_empty());
    }

    #[test]
    fn test_duplicate_names_follow_last_writer() {
        let mut idx = index();
        idx.update_file("/src.md", "[[Note]]");
        idx.update_file("/one/Note.md", "first");
        idx.update_file("/two/Note.md", "second");

        assert_eq!(idx.get_file_path_by_name("note").as_deref(), Some("/two/Note.md"));
        assert_eq!(idx.forward_links("/src.md"), vec!["/two/Note.md"]);

        idx.update_file("/one/Note.md", "first, edited");
        assert_eq!(idx.forward_links("/src.md"), vec!["/one/Note.md"]);
        assert!(idx.backlink_paths("/two/Note.md").is_empty());

        idx.remove_file("/one/Note.md");
        assert_eq!(idx.forward_links("/src.md"), vec!["/two/Note.md"]);
    }

    #[test]
    fn test_folder_named_like_root() {
        let mut idx = VaultIndex::new("/notes").unwrap();
        idx.update_canonical("/notes/todo.md", "see [[Inbox]]");
        idx.update_canonical("/todo.md", "top level");
        idx.update_canonical("/Inbox.md", "");

        assert_eq!(idx.paths(), vec!["/Inbox.md", "/notes/todo.md", "/todo.md"]);

        // Registered canonical paths win over host translation.
        idx.update_file("/notes/todo.md", "see [[Inbox]] again");
        assert_eq!(idx.note("/notes/todo.md").unwrap().content, "see [[Inbox]] again");
        assert_eq!(idx.note("/todo.md").unwrap().content, "top level");
        assert_eq!(idx.find_backlinks("/Inbox.md")[0].path, "/notes/todo.md");

        assert!(idx.remove_file("/notes/todo.md"));
        assert_eq!(idx.paths(), vec!["/Inbox.md", "/todo.md"]);
        assert!(!idx.remove_canonical("/notes/todo.md"));
    }

    #[test]
    fn test_update_compares_full_text() {
        let mut idx = index();
        idx.update_file("/a.md", "[[b]]");

        // Equal text is the only thing that makes an update a no-op.
        idx.update_file("/a.md", "[[c]]");
        assert_eq!(idx.note("/a.md").unwrap().content, "[[c]]");
        assert_eq!(idx.dangling_links("/a.md"), vec!["c"]);
    }

    #[test]
    fn test_remove_unknown_is_false() {
        let mut idx = index();
        assert!(!idx.remove_file("/nope.md"));
        idx.update_file("/a.md", "x");
        assert!(idx.remove_file("/a.md"));
        assert!(!idx.remove_file("/a.md"));
        assert!(idx.is_empty());
    }

    #[test]
    fn test_unresolved_links_grouped() {
        let mut idx = index();
        idx.update_file("/a.md", "[[Ghost]] [[ghost]] [[b]]");
        idx.update_file("/b.md", "[[GHOST]] [[Other]]");

        let unresolved = idx.unresolved_links();
        assert_eq!(unresolved.len(), 2);
        assert_eq!(unresolved[0].target, "Ghost");
        assert_eq!(unresolved[0].sources, vec!["/a.md", "/b.md"]);
        assert_eq!(unresolved[1].target, "Other");
    }

    #[test]
    fn test_tag_counts() {
        let mut idx = index();
        idx.update_file("/a.md", "#Work #home");
        idx.update_file("/b.md", "#work");
        idx.update_file("/c.md", "#zzz");

        let tags = idx.tags();
        assert_eq!(tags[0], TagCount { tag: "work".into(), count: 2 });
        assert_eq!(tags[1].tag, "home");
        assert_eq!(tags[2].tag, "zzz");

        idx.update_file("/a.md", "no tags now");
        assert_eq!(idx.notes_with_tag("work"), vec!["/b.md"]);
        assert!(idx.notes_with_tag("home").is_empty());
    }

    #[test]
    fn test_local_graph() {
        let mut idx = index();
        idx.update_file("/a.md", "[[b]]");
        idx.update_file("/b.md", "[[c]]");
        idx.update_file("/c.md", "[[d]]");
        idx.update_file("/d.md", "");

        let view = idx.local_graph("/b.md", 1);
        let nodes: Vec<_> = view.nodes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(nodes, vec!["/a.md", "/b.md", "/c.md"]);
        assert_eq!(view.edges.len(), 2);

        assert_eq!(idx.global_graph().edges.len(), 3);
        assert_eq!(idx.local_graph("/missing.md", 2), GraphView::default());
    }

    #[test]
    fn test_search_with_os_paths() {
        let mut idx = VaultIndex::new(r"C:\vault").unwrap();
        idx.update_file(r"C:\vault\Plans\Plan B.md", "");

        let hits = idx.search_files_with_os_paths("plan");
        assert_eq!(hits[0].path, r"C:\vault\Plans\Plan B.md");
        assert_eq!(idx.search_files("plan")[0].path, "/Plans/Plan B.md");
    }
}
