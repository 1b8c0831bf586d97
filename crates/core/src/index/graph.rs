//! Forward/backward adjacency over canonical note paths.
//!
//! `forward` and `backward` are exact inverses at all times:
//! `b ∈ backward[a] ⇔ a ∈ forward[b]`. Empty sets are never stored, so two
//! graphs with the same edges compare equal.

use std::collections::{BTreeSet, HashMap, VecDeque};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkGraph {
    forward: HashMap<String, BTreeSet<String>>,
    backward: HashMap<String, BTreeSet<String>>,
}

/// Edges added and removed by one [`LinkGraph::set_edges`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeDelta {
    pub added: usize,
    pub removed: usize,
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole outgoing edge set of `source`.
    ///
    /// Only the symmetric difference against the previous set touches the
    /// backward map.
    pub fn set_edges(&mut self, source: &str, targets: BTreeSet<String>) -> EdgeDelta {
        let previous = self.forward.remove(source).unwrap_or_default();
        let mut delta = EdgeDelta::default();

        for stale in previous.difference(&targets) {
            unlink(&mut self.backward, stale, source);
            delta.removed += 1;
        }
        for fresh in targets.difference(&previous) {
            self.backward.entry(fresh.clone()).or_default().insert(source.to_string());
            delta.added += 1;
        }

        if !targets.is_empty() {
            self.forward.insert(source.to_string(), targets);
        }

        if delta != EdgeDelta::default() {
            tracing::trace!(source, added = delta.added, removed = delta.removed, "edges updated");
        }
        delta
    }

    /// Remove `path` and every edge touching it.
    pub fn remove_node(&mut self, path: &str) {
        if let Some(targets) = self.forward.remove(path) {
            for target in &targets {
                unlink(&mut self.backward, target, path);
            }
        }
        if let Some(sources) = self.backward.remove(path) {
            for source in &sources {
                unlink(&mut self.forward, source, path);
            }
        }
    }

    /// Notes `path` links to, sorted.
    pub fn forward_of(&self, path: &str) -> Vec<String> {
        self.forward.get(path).map(|s| s.iter().cloned().collect()).unwrap_or_default()
    }

    /// Notes linking to `path`, sorted.
    pub fn backward_of(&self, path: &str) -> Vec<String> {
        self.backward.get(path).map(|s| s.iter().cloned().collect()).unwrap_or_default()
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.forward.get(source).is_some_and(|t| t.contains(target))
    }

    pub fn edge_count(&self) -> usize {
        self.forward.values().map(BTreeSet::len).sum()
    }

    /// Every `(source, target)` pair, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forward
            .iter()
            .flat_map(|(s, targets)| targets.iter().map(move |t| (s.as_str(), t.as_str())))
    }

    /// Paths within `depth` hops of `path`, following links in both directions.
    /// Includes `path` itself.
    pub fn neighborhood(&self, path: &str, depth: usize) -> BTreeSet<String> {
        let mut seen = BTreeSet::from([path.to_string()]);
        let mut queue = VecDeque::from([(path.to_string(), 0)]);

        while let Some((current, hops)) = queue.pop_front() {
            if hops == depth {
                continue;
            }
            let neighbours = self
                .forward
                .get(&current)
                .into_iter()
                .chain(self.backward.get(&current))
                .flatten();
            for next in neighbours {
                if seen.insert(next.clone()) {
                    queue.push_back((next.clone(), hops + 1));
                }
            }
        }

        seen
    }
}

fn unlink(map: &mut HashMap<String, BTreeSet<String>>, key: &str, value: &str) {
    if let Some(set) = map.get_mut(key) {
        set.remove(value);
        if set.is_empty() {
            map.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn assert_symmetric(graph: &LinkGraph) {
        for (source, targets) in &graph.forward {
            for target in targets {
                assert!(graph.backward[target].contains(source), "{source} -> {target}");
            }
        }
        for (target, sources) in &graph.backward {
            for source in sources {
                assert!(graph.forward[source].contains(target), "{source} <- {target}");
            }
        }
    }

    #[test]
    fn test_set_edges_applies_delta() {
        let mut graph = LinkGraph::new();
        let first = graph.set_edges("/a.md", set(&["/x.md", "/y.md"]));
        assert_eq!(first, EdgeDelta { added: 2, removed: 0 });

        let second = graph.set_edges("/a.md", set(&["/y.md", "/z.md"]));
        assert_eq!(second, EdgeDelta { added: 1, removed: 1 });

        assert_eq!(graph.forward_of("/a.md"), vec!["/y.md", "/z.md"]);
        assert!(graph.backward_of("/x.md").is_empty());
        assert_eq!(graph.backward_of("/z.md"), vec!["/a.md"]);
        assert_symmetric(&graph);
    }

    #[test]
    fn test_empty_sets_are_not_stored() {
        let mut graph = LinkGraph::new();
        graph.set_edges("/a.md", set(&["/b.md"]));
        graph.set_edges("/a.md", BTreeSet::new());
        assert_eq!(graph, LinkGraph::new());
    }

    #[test]
    fn test_self_loop_is_kept_and_removed_cleanly() {
        let mut graph = LinkGraph::new();
        graph.set_edges("/a.md", set(&["/a.md", "/b.md"]));
        assert!(graph.has_edge("/a.md", "/a.md"));
        assert_eq!(graph.backward_of("/a.md"), vec!["/a.md"]);

        graph.remove_node("/a.md");
        assert_eq!(graph, LinkGraph::new());
    }

    #[test]
    fn test_remove_node_scrubs_both_directions() {
        let mut graph = LinkGraph::new();
        graph.set_edges("/a.md", set(&["/b.md", "/c.md"]));
        graph.set_edges("/b.md", set(&["/a.md", "/c.md"]));
        graph.set_edges("/c.md", set(&["/a.md"]));

        graph.remove_node("/a.md");

        assert!(graph.forward_of("/a.md").is_empty());
        assert!(graph.backward_of("/a.md").is_empty());
        assert_eq!(graph.forward_of("/b.md"), vec!["/c.md"]);
        assert!(graph.forward_of("/c.md").is_empty());
        assert_eq!(graph.backward_of("/c.md"), vec!["/b.md"]);
        assert_eq!(graph.edge_count(), 1);
        assert_symmetric(&graph);
    }

    #[test]
    fn test_neighborhood() {
        let mut graph = LinkGraph::new();
        graph.set_edges("/a.md", set(&["/b.md"]));
        graph.set_edges("/c.md", set(&["/b.md"]));
        graph.set_edges("/c.md", set(&["/b.md", "/d.md"]));

        assert_eq!(graph.neighborhood("/a.md", 0), set(&["/a.md"]));
        assert_eq!(graph.neighborhood("/a.md", 1), set(&["/a.md", "/b.md"]));
        assert_eq!(graph.neighborhood("/a.md", 2), set(&["/a.md", "/b.md", "/c.md"]));
        assert_eq!(graph.neighborhood("/a.md", 3).len(), 4);
    }

    #[test]
    fn test_edges_iterator() {
        let mut graph = LinkGraph::new();
        graph.set_edges("/a.md", set(&["/b.md", "/c.md"]));
        let mut edges: Vec<_> = graph.edges().collect();
        edges.sort();
        assert_eq!(edges, vec![("/a.md", "/b.md"), ("/a.md", "/c.md")]);
    }
}
