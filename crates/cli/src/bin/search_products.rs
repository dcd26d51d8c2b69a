use anyhow::Result;
use clap::Parser;
use models::ReportFamily;
use std::path::PathBuf;
use utils::{collection_path, read_collection, search_similar, DEFAULT_SEARCH_LIMIT};

/// Looks up product full names in the remainders collection by word hits.
#[derive(Debug, Parser)]
#[command(name = "search_products", author, version, about = "Search stored products by name", long_about = None)]
struct Args {
    /// Path to settings.json (optional). Defaults to ./settings.json when present
    #[arg(short = 's', long = "settings")]
    settings: Option<PathBuf>,

    /// Maximum number of names printed
    #[arg(short = 'n', long = "limit", default_value_t = DEFAULT_SEARCH_LIMIT)]
    limit: usize,

    /// Words to look for
    #[arg(required = true)]
    query: Vec<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let settings = settings_loader::load_effective_settings(args.settings.as_ref())?;
    logger::init(settings.log_filter.as_deref());

    let path = collection_path(
        &settings.database_dir,
        settings.collection_for(ReportFamily::Remainder),
    );
    let documents = read_collection(&path)?;
    tracing::debug!("Loaded {} documents from {}", documents.len(), path.display());

    let query = args.query.join(" ");
    let names = search_similar(&documents, &query, args.limit);
    if names.is_empty() {
        println!("No products match {:?}", query);
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}
