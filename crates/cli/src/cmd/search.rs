//! Search command implementation.

use color_eyre::eyre::Result;
use notegraph_core::index::SearchHit;

use super::Context;
use super::output::{column_width, print_json, truncate};
use crate::SearchArgs;

pub fn run(ctx: &Context, args: &SearchArgs) -> Result<()> {
    let (rc, index) = ctx.open_vault()?;

    let mut hits = if args.os_paths {
        index.search_files_with_os_paths(&args.query)
    } else {
        index.search_files(&args.query)
    };
    hits.truncate(args.limit.unwrap_or(rc.search.max_results));

    if ctx.json {
        return print_json(&hits);
    }
    print_hits_table(&hits);
    Ok(())
}

fn print_hits_table(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("(no results found)");
        return;
    }

    let name_width = column_width(hits.iter().map(|h| h.name.as_str()), 4, 40);
    let kind_width = 11;

    println!("{:<name_width$}  {:<kind_width$}  PATH", "NAME", "MATCH");
    println!("{:-<name_width$}  {:-<kind_width$}  {:-<4}", "", "", "");

    for hit in hits {
        println!(
            "{:<name_width$}  {:<kind_width$}  {}",
            truncate(&hit.name, name_width),
            hit.kind.as_str(),
            hit.path,
        );
    }

    println!();
    println!("-- {} results --", hits.len());
}
