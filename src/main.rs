mod session;
mod terminal;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use atlas_core::{Atlas, DatasetStore, EntryId, MapConfig, Outcome, legend};
use clap::{Parser, Subcommand};
use terminal::{TerminalPanel, TextMap, format_entry, format_row};

const DEFAULT_DATA: &str = "filosofos.json";

#[derive(Parser)]
#[command(
    name = "philosopher_atlas",
    about = "Browse an atlas of European philosophers by region, era and text"
)]
struct Cli {
    /// Dataset file (`{"entries": [...]}`); falls back to a built-in sample
    #[arg(long, global = true, default_value = DEFAULT_DATA)]
    data: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Totals, region count and century range
    Stats,
    /// Philosophers per region
    Regions,
    /// Era tags present in the dataset
    Eras,
    /// Filter and search once, print the visible philosophers
    Search {
        /// Free text matched against names, works, concepts, places…
        query: Vec<String>,
        /// Region tag, or "all"
        #[arg(long, default_value = "all")]
        region: String,
        /// Era tag to activate (repeatable; any of them may match)
        #[arg(long)]
        era: Vec<String>,
        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one philosopher in full
    Show {
        id: u32,
        #[arg(long)]
        json: bool,
    },
    /// Interactive session reading commands from stdin
    Browse,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("philosopher_atlas=info".parse()?)
                .add_directive("atlas_core=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let store = load_dataset(&cli.data);

    match cli.command {
        Some(Command::Stats) | None => run_stats(&store),
        Some(Command::Regions) => run_regions(&store),
        Some(Command::Eras) => run_eras(&store),
        Some(Command::Search {
            query,
            region,
            era,
            json,
        }) => run_search(store, &query.join(" "), &region, &era, json),
        Some(Command::Show { id, json }) => run_show(&store, id, json),
        Some(Command::Browse) => run_browse(store),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  DATASET LOADING
// ═══════════════════════════════════════════════════════════════════════

/// Read and validate the dataset; an unreadable file or a malformed payload
/// both end up as the built-in sample.
fn load_dataset(path: &Path) -> DatasetStore {
    match std::fs::read_to_string(path) {
        Ok(raw) => {
            tracing::info!("loading {}", path.display());
            DatasetStore::load_or_sample(&raw)
        }
        Err(e) => {
            tracing::warn!("cannot read {}: {e}; using built-in sample", path.display());
            DatasetStore::sample()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  ONE-SHOT COMMANDS
// ═══════════════════════════════════════════════════════════════════════

fn run_stats(store: &DatasetStore) -> anyhow::Result<()> {
    let stats = store.stats();
    println!("Filósofos: {}", stats.total);
    println!("Regiones:  {}", stats.regions);
    match stats.century_range {
        Some((lo, hi)) => println!("Siglos:    {lo} - {hi}"),
        None => println!("Siglos:    N/A"),
    }
    Ok(())
}

fn run_regions(store: &DatasetStore) -> anyhow::Result<()> {
    println!("{:<18} {:>4}", "Todos", store.len());
    for item in legend(&store.region_counts()) {
        println!("{:<18} {:>4}  {}", item.label, item.count, item.color);
    }
    Ok(())
}

fn run_eras(store: &DatasetStore) -> anyhow::Result<()> {
    for era in store.unique_era_tags() {
        println!("{era}");
    }
    Ok(())
}

fn run_search(
    store: DatasetStore,
    query: &str,
    region: &str,
    eras: &[String],
    json: bool,
) -> anyhow::Result<()> {
    // JSON output replaces the panel's text entirely
    let out: Box<dyn Write> = if json {
        Box::new(io::sink())
    } else {
        Box::new(io::stdout())
    };
    let mut panel = TerminalPanel::new(out);
    panel.quiet_intro = true;
    let mut atlas = Atlas::new(store, TextMap::new(), panel, MapConfig::default());

    if atlas.set_region_tag(region).is_none() {
        anyhow::bail!("unknown region {region:?} (see `regions`)");
    }
    for era in eras {
        atlas.toggle_era_tag(era);
    }

    let outcome = atlas.set_search_text(query);
    if json {
        let text = serde_json::to_string_pretty(&atlas.visible_entries())
            .context("serializing results")?;
        println!("{text}");
        return Ok(());
    }

    // With a search the panel already printed results; without one, list here
    if !atlas.filter().is_searching() {
        match outcome {
            Outcome::EmptyResultSet => println!("Ningún filósofo coincide con los filtros."),
            _ => {
                for entry in atlas.visible_entries() {
                    println!("{}", format_row(entry));
                }
            }
        }
    }
    eprintln!("{} visibles", atlas.visible_count());
    Ok(())
}

fn run_show(store: &DatasetStore, id: u32, json: bool) -> anyhow::Result<()> {
    let entry = store
        .find_by_id(EntryId(id))
        .with_context(|| format!("philosopher {id} not in dataset"))?;
    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        println!("{}", format_entry(entry));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  INTERACTIVE MODE
// ═══════════════════════════════════════════════════════════════════════

fn run_browse(store: DatasetStore) -> anyhow::Result<()> {
    let panel = TerminalPanel::new(io::stdout());
    let mut atlas = Atlas::new(store, TextMap::new(), panel, MapConfig::default());
    let stdin = io::stdin();
    let mut out = io::stdout();
    session::run(&mut atlas, stdin.lock(), &mut out)?;
    out.flush()?;
    Ok(())
}
