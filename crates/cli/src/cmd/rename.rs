//! Rename command implementation.

use std::fs;
use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr, eyre};
use notegraph_core::rename::{FileChange, RenamePlan};
use notegraph_core::{apply_rename, plan_rename};

use super::output::print_json;
use super::{Context, resolve_note};
use crate::RenameArgs;

pub fn run(ctx: &Context, args: &RenameArgs) -> Result<()> {
    let (_, mut index) = ctx.open_vault()?;

    let old_path = resolve_note(&index, &args.old)?;
    let plan = plan_rename(&index, &old_path, &args.new)?;

    let old_host = PathBuf::from(index.get_os_path(&plan.old_path));
    let new_host = PathBuf::from(index.get_os_path(&plan.new_path));
    if new_host.exists() {
        return Err(eyre!("target file already exists: {}", new_host.display()));
    }

    if args.dry_run {
        if ctx.json {
            return print_json(&plan);
        }
        print_preview(&plan);
        println!();
        println!("(dry-run mode - no changes made)");
        return Ok(());
    }

    for change in &plan.changes {
        let host = PathBuf::from(index.get_os_path(&change.path));
        fs::write(&host, &change.new_content)
            .wrap_err_with(|| format!("failed to write {}", host.display()))?;
    }

    if let Some(parent) = new_host.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }

    fs::rename(&old_host, &new_host).wrap_err_with(|| {
        format!("failed to rename {} to {}", old_host.display(), new_host.display())
    })?;
    if !plan.self_rewrites.is_empty() {
        fs::write(&new_host, &plan.content)
            .wrap_err_with(|| format!("failed to write {}", new_host.display()))?;
    }

    let result = apply_rename(&mut index, &plan)?;

    if ctx.json {
        return print_json(&result);
    }

    print_preview(&plan);
    println!();
    println!("Renamed: {} -> {}", result.old_path, result.new_path);
    println!("Files modified: {}", result.files_modified.len());
    println!("Links rewritten: {}", result.links_rewritten);
    Ok(())
}

fn print_preview(plan: &RenamePlan) {
    println!("Renaming: {} -> {}", plan.old_path, plan.new_path);
    println!();

    if plan.total_rewrites() == 0 {
        println!("No links found to update.");
    } else {
        println!(
            "Found {} link(s) in {} other file(s):",
            plan.total_rewrites(),
            plan.files_affected()
        );
        println!();

        if !plan.self_rewrites.is_empty() {
            println!("{} (self-links):", plan.old_path);
            for rewrite in &plan.self_rewrites {
                println!("  Line {}: {} -> {}", rewrite.line_number, rewrite.original, rewrite.replacement);
            }
            println!();
        }
        for change in &plan.changes {
            print_file_change(change);
        }
    }

    for warning in &plan.warnings {
        eprintln!("Warning: {warning}");
    }
}

fn print_file_change(change: &FileChange) {
    println!("{}:", change.path);
    for rewrite in &change.rewrites {
        println!("  Line {}: {} -> {}", rewrite.line_number, rewrite.original, rewrite.replacement);
    }
    println!();
}
