use color_eyre::eyre::Result;

use super::output::print_json;
use super::{Context, resolve_note};
use crate::GraphArgs;

pub fn run(ctx: &Context, args: &GraphArgs) -> Result<()> {
    let (_, index) = ctx.open_vault()?;

    let view = match &args.note {
        Some(note) => index.local_graph(&resolve_note(&index, note)?, args.depth),
        None => index.global_graph(),
    };

    if ctx.json {
        return print_json(&view);
    }

    println!("Nodes ({}):", view.nodes.len());
    for node in &view.nodes {
        println!("  {}", node.path);
    }
    println!();
    println!("Edges ({}):", view.edges.len());
    for edge in &view.edges {
        println!("  {} -> {}", edge.source, edge.target);
    }
    Ok(())
}
