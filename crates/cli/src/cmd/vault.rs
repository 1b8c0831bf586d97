//! Vault-wide listings: tags, names and unresolved links.

use color_eyre::eyre::Result;

use super::Context;
use super::output::{column_width, print_json, print_list};

pub fn tags(ctx: &Context) -> Result<()> {
    let (_, index) = ctx.open_vault()?;
    let tags = index.tags();

    if ctx.json {
        return print_json(&tags);
    }
    if tags.is_empty() {
        println!("(no tags found)");
        return Ok(());
    }

    for tag in &tags {
        println!("{:>5}  #{}", tag.count, tag.tag);
    }
    println!();
    println!("-- {} tags --", tags.len());
    Ok(())
}

pub fn names(ctx: &Context) -> Result<()> {
    let (_, index) = ctx.open_vault()?;
    let names = index.get_all_note_names();

    if ctx.json {
        return print_json(&names);
    }
    print_list(&names, "notes");
    Ok(())
}

pub fn unresolved(ctx: &Context) -> Result<()> {
    let (_, index) = ctx.open_vault()?;
    let unresolved = index.unresolved_links();

    if ctx.json {
        return print_json(&unresolved);
    }
    if unresolved.is_empty() {
        println!("(no unresolved links found)");
        return Ok(());
    }

    let width = column_width(unresolved.iter().map(|u| u.target.as_str()), 6, 40);
    println!("{:<width$}  LINKED FROM", "TARGET");
    println!("{:-<width$}  {:-<11}", "", "");
    for link in &unresolved {
        println!("{:<width$}  {}", link.target, link.sources.join(", "));
    }
    println!();
    println!("-- {} unresolved targets --", unresolved.len());
    Ok(())
}
