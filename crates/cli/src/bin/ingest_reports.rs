use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use data_pipeline::{IngestOutcome, IngestPipeline};
use models::ReportFamily;
use std::path::PathBuf;
use utils::{CollectionFileSink, MemorySink, RecordSink};

/// Ingests ledger report workbooks into the remainders/turnovers collections.
#[derive(Debug, Parser)]
#[command(name = "ingest_reports", author, version, about = "Ingest ledger spreadsheets", long_about = None)]
struct Args {
    /// Report family of every file given
    #[arg(short = 'f', long = "family", value_enum)]
    family: Family,

    /// Path to settings.json (optional). Defaults to ./settings.json when present
    #[arg(short = 's', long = "settings")]
    settings: Option<PathBuf>,

    /// Parse only; records are kept in memory and counted
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Report files; the account and period are read from their names
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Family {
    Remainder,
    Turnover,
}

impl From<Family> for ReportFamily {
    fn from(family: Family) -> Self {
        match family {
            Family::Remainder => ReportFamily::Remainder,
            Family::Turnover => ReportFamily::Turnover,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let settings = settings_loader::load_effective_settings(args.settings.as_ref())?;
    logger::init(settings.log_filter.as_deref());

    let family = ReportFamily::from(args.family);

    if args.dry_run {
        let sink = MemorySink::new();
        run(&sink, family, &args.files)?;
        println!("Dry run: {} records parsed, nothing written", sink.len());
        return Ok(());
    }

    let sink = CollectionFileSink::from_settings(&settings)?;
    run(&sink, family, &args.files)?;
    println!("Collection: {}", sink.path_for(family).display());
    Ok(())
}

fn run(sink: &dyn RecordSink, family: ReportFamily, files: &[PathBuf]) -> Result<()> {
    let pipeline = IngestPipeline::new(sink);
    let mut total = 0usize;
    let mut skipped = 0usize;

    for file in files {
        let outcome = pipeline
            .ingest_file(file, family)
            .with_context(|| format!("Ingesting {}", file.display()))?;

        match outcome {
            IngestOutcome::Ingested { grammar, records } => {
                println!("{}: {} records ({})", file.display(), records, grammar);
                total += records;
            }
            IngestOutcome::Skipped => {
                println!("{}: skipped, no account token in the name", file.display());
                skipped += 1;
            }
        }
    }

    tracing::info!("{} files, {} skipped, {} records", files.len(), skipped, total);
    println!("Total: {} records from {} files ({} skipped)", total, files.len(), skipped);
    Ok(())
}
