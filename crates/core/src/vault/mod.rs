//! Vault file discovery and content extraction.
//!
//! The extractor is pure and is what the index runs on every update; the
//! walker enumerates note files at startup and the watcher reports changes
//! while a host keeps the index open.

pub mod extractor;
pub mod hasher;
pub mod walker;
pub mod watcher;

pub use extractor::{Extracted, ExtractedLink, LinkKind, extract};
pub use hasher::content_hash_str;
pub use walker::{VaultWalker, VaultWalkerError, WalkedFile};
pub use watcher::{Debouncer, VaultWatcher, WatchError};
