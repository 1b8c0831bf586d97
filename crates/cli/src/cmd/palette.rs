use color_eyre::eyre::Result;
use notegraph_core::{PaletteCommand, PaletteItem, palette_search};

use super::Context;
use super::output::print_json;
use crate::PaletteArgs;

/// The subcommands, offered as palette commands.
fn commands() -> Vec<PaletteCommand> {
    [
        ("index", "Index vault"),
        ("search", "Search notes"),
        ("backlinks", "Show backlinks"),
        ("links", "Show outgoing links"),
        ("tags", "List tags"),
        ("names", "List note names"),
        ("unresolved", "List unresolved links"),
        ("graph", "Show link graph"),
        ("rename", "Rename note"),
        ("watch", "Watch vault for changes"),
        ("doctor", "Check configuration"),
    ]
    .into_iter()
    .map(|(id, title)| PaletteCommand::new(id, title))
    .collect()
}

pub fn run(ctx: &Context, args: &PaletteArgs) -> Result<()> {
    let (_, index) = ctx.open_vault()?;
    let items = palette_search(&index, &args.query, &commands());

    if ctx.json {
        return print_json(&items);
    }
    if items.is_empty() {
        println!("(no results found)");
        return Ok(());
    }

    for item in &items {
        match item {
            PaletteItem::Command(cmd) => println!("[command] {}  (ngr {})", cmd.title, cmd.id),
            PaletteItem::Note(hit) => println!("[note]    {}  {}", hit.name, hit.path),
            PaletteItem::Tag(tag) => println!("[tag]     #{}  ({})", tag.tag, tag.count),
        }
    }
    Ok(())
}
