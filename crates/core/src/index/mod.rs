//! In-memory vault index: notes, names, links, tags and search.
//!
//! The index is fed note content by its host and never reads the
//! filesystem itself; [`IndexBuilder`] (startup rebuild) and [`sync_paths`]
//! (live changes) are the pieces that do.
//!
//! # Example
//!
//! ```
//! use notegraph_core::index::VaultIndex;
//!
//! let mut index = VaultIndex::new("/home/me/vault").unwrap();
//! index.update_file("/Inbox.md", "Talk to [[Alice]] about #planning");
//! index.update_file("/people/Alice.md", "Hi");
//!
//! let backlinks = index.find_backlinks("/people/Alice.md");
//! assert_eq!(backlinks[0].path, "/Inbox.md");
//! ```

pub mod builder;
pub mod graph;
pub mod names;
pub mod search;
pub mod sync;
pub mod types;
pub mod vault;

pub use builder::{BuilderError, IndexBuilder, IndexStats, ProgressCallback};
pub use graph::{EdgeDelta, LinkGraph};
pub use names::NameResolver;
pub use search::{SearchIndex, SearchQuery};
pub use sync::{SyncChange, sync_paths};
pub use types::{
    Backlink, GraphEdge, GraphNode, GraphView, MatchKind, Note, SearchHit, TagCount,
    UnresolvedLink,
};
pub use vault::{IndexError, VaultIndex};
