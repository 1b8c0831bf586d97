mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use std::path::PathBuf;

use cmd::Context;

#[derive(Debug, Parser)]
#[command(name = "ngr", version, about = "Backlinks, tags and search for a folder of markdown notes")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved settings
    Doctor,

    /// Index the vault and print statistics
    Index(IndexArgs),

    /// Ranked search over note names (or tag:/file:/path:/content:)
    Search(SearchArgs),

    /// Notes linking to a note
    Backlinks(NoteArgs),

    /// Notes a note links to, plus its unresolved links
    Links(NoteArgs),

    /// Tags with usage counts
    Tags,

    /// Every note display name
    Names,

    /// Link targets that match no note
    Unresolved,

    /// Global graph, or the neighbourhood of one note
    Graph(GraphArgs),

    /// Rename a note and rewrite links to it
    Rename(RenameArgs),

    /// Palette search across notes, tags and commands
    Palette(PaletteArgs),

    /// Keep the index live and report notes as they change on disk
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Print every file as it is indexed
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub query: String,

    /// Maximum number of hits (defaults to search.max_results)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Report host filesystem paths instead of vault paths
    #[arg(long)]
    pub os_paths: bool,
}

#[derive(Debug, Args)]
pub struct NoteArgs {
    /// Display name, vault path or filesystem path of the note
    pub note: String,
}

#[derive(Debug, Args)]
pub struct GraphArgs {
    /// Centre note; the whole vault when omitted
    pub note: Option<String>,

    /// Hops to follow from the centre note, in both directions
    #[arg(long, default_value_t = 1)]
    pub depth: usize,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Note to rename
    pub old: String,

    /// New vault path (e.g. "projects/Roadmap.md")
    pub new: String,

    /// Show what would change without touching any file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct PaletteArgs {
    pub query: String,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Quiet period in milliseconds (defaults to watch.debounce_ms)
    #[arg(long)]
    pub debounce: Option<u64>,

    /// Stop after this many seconds instead of running until interrupted
    #[arg(long)]
    pub timeout: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    logging::flush();

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context {
        config: cli.config.as_deref(),
        profile: cli.profile.as_deref(),
        json: cli.json,
    };

    match cli.command {
        Commands::Doctor => cmd::doctor::run(&ctx),
        Commands::Index(args) => cmd::index::run(&ctx, &args),
        Commands::Search(args) => cmd::search::run(&ctx, &args),
        Commands::Backlinks(args) => cmd::links::backlinks(&ctx, &args),
        Commands::Links(args) => cmd::links::outgoing(&ctx, &args),
        Commands::Tags => cmd::vault::tags(&ctx),
        Commands::Names => cmd::vault::names(&ctx),
        Commands::Unresolved => cmd::vault::unresolved(&ctx),
        Commands::Graph(args) => cmd::graph::run(&ctx, &args),
        Commands::Rename(args) => cmd::rename::run(&ctx, &args),
        Commands::Palette(args) => cmd::palette::run(&ctx, &args),
        Commands::Watch(args) => cmd::watch::run(&ctx, &args),
    }
}
