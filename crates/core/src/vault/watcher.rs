//! File-system change notifications for a vault, debounced per path.
//!
//! [`VaultWatcher`] only reports *which* host paths settled after changing.
//! Turning them into index updates is [`crate::index::sync_paths`]'s job.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;

/// How often the receive loop wakes up to check for settled paths.
const TICK: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to watch {path}: {source}")]
    Watch {
        path: String,
        #[source]
        source: notify::Error,
    },
}

/// Paths waiting for their events to stop.
#[derive(Debug, Default)]
pub struct Debouncer {
    quiet: Duration,
    pending: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    /// A path is released once no event touched it for `quiet`.
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, pending: HashMap::new() }
    }

    pub fn touch(&mut self, path: PathBuf, at: Instant) {
        self.pending.insert(path, at);
    }

    /// Take every path that has been quiet long enough as of `now`, sorted.
    pub fn drain_settled(&mut self, now: Instant) -> Vec<PathBuf> {
        let quiet = self.quiet;
        let mut settled: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, last)| now.saturating_duration_since(**last) >= quiet)
            .map(|(path, _)| path.clone())
            .collect();
        for path in &settled {
            self.pending.remove(path);
        }
        settled.sort();
        settled
    }

    /// Take everything, settled or not.
    pub fn drain_all(&mut self) -> Vec<PathBuf> {
        let mut all: Vec<PathBuf> = self.pending.drain().map(|(path, _)| path).collect();
        all.sort();
        all
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Recursive watch over a vault root.
pub struct VaultWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    debouncer: Debouncer,
    closed: bool,
}

impl VaultWatcher {
    /// Start watching `root` recursively. Paths are reported once they have
    /// been quiet for `debounce`.
    pub fn start(root: &Path, debounce: Duration) -> Result<Self, WatchError> {
        let (tx, rx) = mpsc::channel();
        let watch_err = |source| WatchError::Watch { path: root.display().to_string(), source };

        let mut watcher = RecommendedWatcher::new(tx, Config::default()).map_err(watch_err)?;
        watcher.watch(root, RecursiveMode::Recursive).map_err(watch_err)?;

        tracing::debug!(root = %root.display(), ?debounce, "watching vault");
        Ok(Self { _watcher: watcher, rx, debouncer: Debouncer::new(debounce), closed: false })
    }

    /// Wait up to `timeout` for changed paths to settle.
    ///
    /// Returns as soon as at least one path settled, or an empty list when
    /// the timeout passes first. Renames arrive as both the old and the new
    /// path; callers tell them apart by whether the path still exists.
    pub fn next_batch(&mut self, timeout: Duration) -> Vec<PathBuf> {
        let deadline = Instant::now() + timeout;

        loop {
            if self.closed {
                return self.debouncer.drain_all();
            }

            match self.rx.recv_timeout(TICK) {
                Ok(Ok(event)) => self.record(event),
                Ok(Err(e)) => tracing::warn!("file watcher error: {e}"),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => self.closed = true,
            }

            let now = Instant::now();
            let settled = self.debouncer.drain_settled(now);
            if !settled.is_empty() {
                tracing::debug!(paths = settled.len(), "settled changes");
                return settled;
            }
            if now >= deadline {
                return Vec::new();
            }
        }
    }

    fn record(&mut self, event: Event) {
        if !is_content_event(&event.kind) {
            return;
        }
        let now = Instant::now();
        for path in event.paths {
            tracing::trace!(path = %path.display(), kind = ?event.kind, "fs event");
            self.debouncer.touch(path, now);
        }
    }
}

fn is_content_event(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any)
}
