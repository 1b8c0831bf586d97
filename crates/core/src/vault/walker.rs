//! Recursive discovery of note files under a vault root.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use walkdir::WalkDir;

use crate::paths;

/// Directory names never descended into, in addition to hidden entries.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "__pycache__", "venv"];

#[derive(Debug, Error)]
pub enum VaultWalkerError {
    #[error("vault root does not exist: {0}")]
    MissingRoot(String),

    #[error("failed to walk vault directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),

    #[error("failed to read file metadata {0}: {1}")]
    MetadataError(String, #[source] std::io::Error),
}

/// A markdown file found under the vault root.
#[derive(Debug, Clone)]
pub struct WalkedFile {
    /// Fully-qualified path for reading the file.
    pub host_path: PathBuf,
    /// Canonical vault path (`/`-separated, leading `/`).
    pub vault_path: String,
    /// File modification time.
    pub modified: SystemTime,
    /// File size in bytes.
    pub size: u64,
}

/// Walker for discovering markdown files in a vault.
#[derive(Debug)]
pub struct VaultWalker {
    root: PathBuf,
    /// Folders to skip, relative to the root.
    excluded_folders: Vec<PathBuf>,
}

impl VaultWalker {
    /// Create a new walker for the given vault root.
    pub fn new(root: &Path) -> Result<Self, VaultWalkerError> {
        Self::with_exclusions(root, Vec::new())
    }

    /// Create a walker that also skips the given folders.
    ///
    /// Exclusions may be relative to the root or absolute paths under it.
    pub fn with_exclusions(
        root: &Path,
        excluded_folders: Vec<PathBuf>,
    ) -> Result<Self, VaultWalkerError> {
        let root = root
            .canonicalize()
            .map_err(|_| VaultWalkerError::MissingRoot(root.display().to_string()))?;

        let excluded_folders = excluded_folders
            .into_iter()
            .map(|p| match p.strip_prefix(&root) {
                Ok(relative) if p.is_absolute() => relative.to_path_buf(),
                _ => p,
            })
            .collect();

        Ok(Self { root, excluded_folders })
    }

    /// Walk the vault and return every markdown file, sorted by vault path.
    pub fn walk(&self) -> Result<Vec<WalkedFile>, VaultWalkerError> {
        self.walk_dir(&self.root)
    }

    /// Walk one folder under the root, applying the same filters as
    /// [`Self::walk`]. The folder itself must already be accepted.
    pub fn walk_dir(&self, dir: &Path) -> Result<Vec<WalkedFile>, VaultWalkerError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e))
        {
            let entry = entry.map_err(|e| {
                VaultWalkerError::WalkError(self.root.display().to_string(), e)
            })?;

            let path = entry.path();
            if !entry.file_type().is_file() || !paths::is_markdown_path(&path.to_string_lossy())
            {
                continue;
            }

            let metadata = entry.metadata().map_err(|e| {
                VaultWalkerError::MetadataError(path.display().to_string(), e.into())
            })?;

            let relative = path.strip_prefix(&self.root).unwrap_or(path);

            files.push(WalkedFile {
                host_path: path.to_path_buf(),
                vault_path: paths::canonicalize(&relative.to_string_lossy()),
                modified: metadata.modified().unwrap_or(std::time::UNIX_EPOCH),
                size: metadata.len(),
            });
        }

        files.sort_by(|a, b| a.vault_path.cmp(&b.vault_path));
        tracing::debug!(root = %self.root.display(), files = files.len(), "walked vault");
        Ok(files)
    }

    /// Canonical vault path for a file or folder under the root, or `None`
    /// when the path lies outside the vault or inside a skipped folder.
    ///
    /// The path does not have to exist, so removals can be mapped too.
    pub fn vault_path_of(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;

        for component in relative.components() {
            let name = component.as_os_str().to_string_lossy();
            if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref()) {
                return None;
            }
        }
        if self.excluded_folders.iter().any(|ex| relative.starts_with(ex)) {
            return None;
        }

        Some(paths::canonicalize(&relative.to_string_lossy()))
    }

    fn is_excluded(&self, entry: &walkdir::DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            return true;
        }

        if entry.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()) {
            return true;
        }

        match entry.path().strip_prefix(&self.root) {
            Ok(relative) => self.excluded_folders.iter().any(|ex| relative.starts_with(ex)),
            Err(_) => false,
        }
    }

    /// The canonicalized vault root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
