use color_eyre::eyre::Result;
use notegraph_core::config::{ConfigLoader, default_config_path};
use serde_json::json;

use super::Context;
use super::output::print_json;
use crate::logging;

pub fn run(ctx: &Context) -> Result<()> {
    let path = ctx.config.map_or_else(default_config_path, |p| p.to_path_buf());

    let rc = match ConfigLoader::load(ctx.config, ctx.profile) {
        Ok(rc) => rc,
        Err(e) => {
            println!("FAIL ngr doctor");
            if ctx.config.is_none() {
                println!("looked for: {}", path.display());
            }
            return Err(e.into());
        }
    };
    logging::init(&rc);

    let vault_exists = rc.vault_root.is_dir();
    tracing::debug!(profile = %rc.active_profile, vault_exists, "doctor");

    if ctx.json {
        return print_json(&json!({
            "ok": true,
            "path": path.display().to_string(),
            "profile": rc.active_profile,
            "vault_root": rc.vault_root.display().to_string(),
            "vault_exists": vault_exists,
            "excluded_folders": rc.excluded_folders.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "logging": {
                "level": rc.logging.level,
                "file": rc.logging.file.as_ref().map(|f| f.display().to_string()),
            },
            "max_results": rc.search.max_results,
            "debounce_ms": rc.watch.debounce_ms,
        }));
    }

    println!("OK   ngr doctor");
    println!("path: {}", path.display());
    println!("profile: {}", rc.active_profile);
    println!("vault_root: {}", rc.vault_root.display());
    if !vault_exists {
        println!("warning: vault_root is not a directory");
    }
    for folder in &rc.excluded_folders {
        println!("excluded: {}", folder.display());
    }
    println!("logging.level: {}", rc.logging.level);
    if let Some(ref file) = rc.logging.file {
        println!("logging.file: {}", file.display());
    }
    println!("search.max_results: {}", rc.search.max_results);
    println!("watch.debounce_ms: {}", rc.watch.debounce_ms);
    Ok(())
}
