//! Backlinks and outgoing links commands.

use color_eyre::eyre::Result;
use notegraph_core::VaultIndex;
use notegraph_core::index::Backlink;
use notegraph_core::vault::extract;
use serde::Serialize;

use super::output::{print_json, truncate};
use super::{Context, resolve_note};
use crate::NoteArgs;

#[derive(Debug, Serialize)]
struct OutgoingOutput {
    note: String,
    links: Vec<String>,
    unresolved: Vec<String>,
}

pub fn backlinks(ctx: &Context, args: &NoteArgs) -> Result<()> {
    let (_, index) = ctx.open_vault()?;
    let path = resolve_note(&index, &args.note)?;
    let backlinks = index.find_backlinks(&path);

    if ctx.json {
        return print_json(&backlinks);
    }

    if backlinks.is_empty() {
        println!("(no backlinks found)");
        return Ok(());
    }

    for backlink in &backlinks {
        println!("{}", backlink.path);
        for (line_number, line) in linking_lines(&index, backlink, &path) {
            println!("  {line_number:>4}: {}", truncate(line.trim(), 80));
        }
    }

    println!();
    println!("-- {} backlinks --", backlinks.len());
    Ok(())
}

pub fn outgoing(ctx: &Context, args: &NoteArgs) -> Result<()> {
    let (_, index) = ctx.open_vault()?;
    let path = resolve_note(&index, &args.note)?;

    let output = OutgoingOutput {
        links: index.forward_links(&path),
        unresolved: index.dangling_links(&path),
        note: path,
    };

    if ctx.json {
        return print_json(&output);
    }

    println!("=== Outgoing links (notes {} links to) ===", output.note);
    println!();
    if output.links.is_empty() {
        println!("(no outgoing links found)");
    }
    for link in &output.links {
        println!("{link}");
    }

    if !output.unresolved.is_empty() {
        println!();
        println!("=== Unresolved links ===");
        println!();
        for target in &output.unresolved {
            println!("[[{target}]]");
        }
    }
    Ok(())
}

/// Lines of a backlinking note that hold a link resolving to `target`.
fn linking_lines<'a>(
    index: &VaultIndex,
    backlink: &'a Backlink,
    target: &str,
) -> Vec<(usize, &'a str)> {
    let lines: Vec<&str> = backlink.content.lines().collect();
    let mut numbers: Vec<usize> = extract(&backlink.content)
        .links
        .into_iter()
        .filter(|l| index.get_file_path_by_name(&l.target).as_deref() == Some(target))
        .map(|l| l.line_number)
        .collect();
    numbers.dedup();

    numbers
        .into_iter()
        .filter_map(|n| lines.get(n.checked_sub(1)?).map(|line| (n, *line)))
        .collect()
}
