//! Startup rebuild of a [`VaultIndex`] from the files on disk.
//!
//! The index itself never touches the filesystem; this is the host-side
//! piece that walks the vault, reads each note and feeds it in.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use super::vault::{IndexError, VaultIndex};
use crate::vault::{VaultWalker, VaultWalkerError, WalkedFile};

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("Vault walker error: {0}")]
    Walker(#[from] VaultWalkerError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Statistics from a rebuild.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexStats {
    /// Number of markdown files discovered.
    pub files_found: usize,
    /// Number of notes indexed.
    pub notes_indexed: usize,
    /// Number of files skipped because they could not be read.
    pub notes_skipped: usize,
    /// Number of links across all notes.
    pub links_indexed: usize,
    /// Number of links whose target matches no note.
    pub dangling_links: usize,
    /// Rebuild duration in milliseconds.
    pub duration_ms: u64,
}

/// Progress callback for indexing operations.
/// Parameters: (current, total, current_path)
pub type ProgressCallback = Box<dyn Fn(usize, usize, &str)>;

/// Builds a populated [`VaultIndex`] for a vault directory.
pub struct IndexBuilder {
    vault_root: PathBuf,
    excluded_folders: Vec<PathBuf>,
}

impl IndexBuilder {
    pub fn new(vault_root: &Path) -> Self {
        Self { vault_root: vault_root.to_path_buf(), excluded_folders: Vec::new() }
    }

    /// Skip these folders (relative to the root, or absolute under it).
    pub fn with_exclusions(mut self, excluded_folders: Vec<PathBuf>) -> Self {
        self.excluded_folders = excluded_folders;
        self
    }

    /// Walk the vault and index every readable note.
    pub fn build(
        &self,
        progress: Option<ProgressCallback>,
    ) -> Result<(VaultIndex, IndexStats), BuilderError> {
        let start = Instant::now();
        let mut stats = IndexStats::default();

        let walker =
            VaultWalker::with_exclusions(&self.vault_root, self.excluded_folders.clone())?;
        let files = walker.walk()?;
        stats.files_found = files.len();

        let mut index = VaultIndex::new(walker.root().to_string_lossy())?;

        for (i, file) in files.iter().enumerate() {
            if let Some(ref cb) = progress {
                cb(i + 1, files.len(), &file.vault_path);
            }

            match read_note(file) {
                Ok(content) => {
                    index.update_canonical(&file.vault_path, &content);
                    stats.notes_indexed += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to index {}: {}", file.vault_path, e);
                    stats.notes_skipped += 1;
                }
            }
        }

        // Forward references resolve as their targets arrive, so dangling
        // counts are only meaningful once every note is in.
        for path in index.paths() {
            if let Some(note) = index.note(path) {
                stats.links_indexed += note.links.len();
            }
            stats.dangling_links += index.dangling_links(path).len();
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            notes = stats.notes_indexed,
            skipped = stats.notes_skipped,
            links = stats.links_indexed,
            ms = stats.duration_ms,
            "vault indexed"
        );
        Ok((index, stats))
    }
}

fn read_note(file: &WalkedFile) -> Result<String, BuilderError> {
    std::fs::read_to_string(&file.host_path).map_err(|e| BuilderError::FileRead {
        path: file.host_path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_vault() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::write(
            root.join("note1.md"),
            "# Note One\n\nThis links to [[note2]] and [[missing-note]]. #zettel\n",
        )
        .unwrap();

        fs::write(root.join("note2.md"), "---\ntags: [task]\n---\n# Note Two\n\nBack to [[note1]].\n")
            .unwrap();

        fs::create_dir(root.join("subdir")).unwrap();
        fs::write(root.join("subdir/note3.md"), "# Note Three\n\n![[note1#Intro]]\n").unwrap();

        fs::create_dir(root.join("templates")).unwrap();
        fs::write(root.join("templates/tpl.md"), "[[note1]]").unwrap();

        dir
    }

    #[test]
    fn test_build_counts() {
        let vault = create_test_vault();
        let (index, stats) = IndexBuilder::new(vault.path()).build(None).unwrap();

        assert_eq!(stats.files_found, 4);
        assert_eq!(stats.notes_indexed, 4);
        assert_eq!(stats.notes_skipped, 0);
        assert_eq!(stats.links_indexed, 5);
        assert_eq!(stats.dangling_links, 1);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_forward_references_resolve() {
        let vault = create_test_vault();
        let (index, _) = IndexBuilder::new(vault.path()).build(None).unwrap();

        // note1 is indexed before note2 exists, yet the edge is there.
        assert_eq!(index.forward_links("/note1.md"), vec!["/note2.md"]);
        assert_eq!(
            index.backlink_paths("/note1.md"),
            vec!["/note2.md", "/subdir/note3.md", "/templates/tpl.md"]
        );
        assert_eq!(index.notes_with_tag("task"), vec!["/note2.md"]);
    }

    #[test]
    fn test_exclusions_and_progress() {
        let vault = create_test_vault();
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = seen.clone();

        let (index, stats) = IndexBuilder::new(vault.path())
            .with_exclusions(vec![PathBuf::from("templates")])
            .build(Some(Box::new(move |i, total, path| {
                sink.borrow_mut().push(format!("{i}/{total} {path}"));
            })))
            .unwrap();

        assert_eq!(stats.notes_indexed, 3);
        assert!(index.note("/templates/tpl.md").is_none());
        assert_eq!(seen.borrow().first().map(String::as_str), Some("1/3 /note1.md"));
    }

    #[test]
    fn test_os_paths_point_at_files() {
        let vault = create_test_vault();
        let (index, _) = IndexBuilder::new(vault.path()).build(None).unwrap();

        let host = index.get_os_path("/subdir/note3.md");
        assert!(fs::read_to_string(host).unwrap().contains("Note Three"));
    }

    #[test]
    fn test_missing_root() {
        let result = IndexBuilder::new(Path::new("/nonexistent/vault")).build(None);
        assert!(matches!(result, Err(BuilderError::Walker(VaultWalkerError::MissingRoot(_)))));
    }
}
