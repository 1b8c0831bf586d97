//! Watch command implementation.

use std::time::{Duration, Instant};

use color_eyre::eyre::{Result, WrapErr};
use notegraph_core::index::{SyncChange, sync_paths};
use notegraph_core::vault::{VaultWalker, VaultWatcher};

use super::{Context, build_index};
use crate::WatchArgs;

/// How long one wait for changes lasts before checking the timeout again.
const POLL: Duration = Duration::from_millis(500);

pub fn run(ctx: &Context, args: &WatchArgs) -> Result<()> {
    let rc = ctx.load_config()?;
    let (mut index, stats) = build_index(&rc, None)?;

    let walker = VaultWalker::with_exclusions(&rc.vault_root, rc.excluded_folders.clone())
        .wrap_err_with(|| format!("failed to open {}", rc.vault_root.display()))?;
    let debounce = Duration::from_millis(args.debounce.unwrap_or(rc.watch.debounce_ms));
    let mut watcher = VaultWatcher::start(walker.root(), debounce)?;

    if !ctx.json {
        println!(
            "Watching {} ({} notes, {} links). Press Ctrl-C to stop.",
            walker.root().display(),
            stats.notes_indexed,
            stats.links_indexed
        );
    }

    let deadline = args.timeout.map(|secs| Instant::now() + Duration::from_secs(secs));
    while deadline.is_none_or(|d| Instant::now() < d) {
        let batch = watcher.next_batch(POLL);
        if batch.is_empty() {
            continue;
        }

        for change in sync_paths(&mut index, &walker, &batch) {
            report(ctx, &change, &index)?;
        }
    }
    Ok(())
}

fn report(ctx: &Context, change: &SyncChange, index: &notegraph_core::VaultIndex) -> Result<()> {
    if ctx.json {
        println!("{}", serde_json::to_string(change)?);
        return Ok(());
    }

    match change {
        SyncChange::Updated(path) => {
            let dangling = index.dangling_links(path);
            if dangling.is_empty() {
                println!("updated {path}");
            } else {
                println!("updated {path} (unresolved: {})", dangling.join(", "));
            }
        }
        SyncChange::Removed(path) => println!("removed {path}"),
    }
    Ok(())
}
