//! Index command implementation.

use color_eyre::eyre::Result;
use notegraph_core::index::ProgressCallback;

use super::output::print_json;
use super::{Context, build_index};
use crate::IndexArgs;

pub fn run(ctx: &Context, args: &IndexArgs) -> Result<()> {
    let rc = ctx.load_config()?;

    let progress: Option<ProgressCallback> = if args.verbose && !ctx.json {
        Some(Box::new(|current, total, path| {
            println!("[{current}/{total}] {path}");
        }))
    } else {
        None
    };

    if !ctx.json {
        println!("Indexing vault: {}", rc.vault_root.display());
    }

    let (index, stats) = build_index(&rc, progress)?;

    if ctx.json {
        return print_json(&stats);
    }

    println!();
    println!("Indexing complete:");
    println!("  Files found:    {}", stats.files_found);
    println!("  Notes indexed:  {}", stats.notes_indexed);
    if stats.notes_skipped > 0 {
        println!("  Notes skipped:  {}", stats.notes_skipped);
    }
    println!("  Links indexed:  {}", stats.links_indexed);
    println!("  Dangling links: {}", stats.dangling_links);
    println!("  Tags:           {}", index.tags().len());
    println!("  Duration:       {}ms", stats.duration_ms);
    Ok(())
}
