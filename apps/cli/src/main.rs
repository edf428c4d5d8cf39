//! Storage-schema generation front-end
//!
//! Loads the declarative type and search-field catalogs, derives the
//! relational storage schema, and writes the migration script. When a
//! snapshot path is given, the prior version's column types are diffed
//! against the new plan and the snapshot is refreshed afterwards.
//!
//! Usage:
//!   galena --types types.json --search-params search-parameters.json \
//!     [--snapshot schema.json] [--out migration.sql] [--full-path-cardinality]

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use galena_catalog::{SearchFieldIndex, TypeCatalog};
use galena_defs::{SearchFieldDescription, TypeDescription};
use galena_schema::{PlannerConfig, SchemaGenerator, SchemaSnapshot};

#[derive(Parser, Debug)]
#[command(name = "galena")]
#[command(about = "Derive a relational storage schema from declarative catalogs")]
#[command(version)]
struct Args {
    /// Type description catalog (JSON array)
    #[arg(long)]
    types: PathBuf,

    /// Search-field description catalog (JSON array)
    #[arg(long = "search-params")]
    search_params: PathBuf,

    /// Schema snapshot of the prior version; read when present, refreshed
    /// after emission
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Output path for the migration script (stdout when omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Resolve array-ness by walking full field paths instead of the legacy
    /// direct-property shortcut
    #[arg(long)]
    full_path_cardinality: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let types: Vec<TypeDescription> =
        read_json(&args.types).context("reading type catalog")?;
    let fields: Vec<SearchFieldDescription> =
        read_json(&args.search_params).context("reading search-field catalog")?;

    let catalog = TypeCatalog::index(&types).context("indexing type catalog")?;
    let search = SearchFieldIndex::index(&fields);
    tracing::info!(types = catalog.len(), "catalog indexed");

    let prior: Option<SchemaSnapshot> = match &args.snapshot {
        Some(path) if path.exists() => {
            Some(read_json(path).context("reading schema snapshot")?)
        }
        _ => None,
    };

    let config = PlannerConfig {
        full_path_cardinality: args.full_path_cardinality,
    };
    let migration = SchemaGenerator::new(&catalog, &search, config).emit(prior.as_ref());
    tracing::info!(statements = migration.statements.len(), "migration emitted");

    let script = migration.render();
    match &args.out {
        Some(path) => fs::write(path, &script)
            .with_context(|| format!("writing migration {}", path.display()))?,
        None => print!("{script}"),
    }

    if let Some(path) = &args.snapshot {
        let json = serde_json::to_string_pretty(&migration.snapshot)
            .context("serializing schema snapshot")?;
        fs::write(path, json)
            .with_context(|| format!("writing schema snapshot {}", path.display()))?;
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}
