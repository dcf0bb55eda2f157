use anyhow::{Context, Result};
use clap::Parser;
use gaia_extract::{config::Config, export, storage::GcsBucket, ObjectStore};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Write};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "gaia-metadata")]
#[command(about = "Convert a GAIA metadata.jsonl task file into CSV")]
#[command(version)]
struct Cli {
    /// Local metadata.jsonl file
    #[arg(value_name = "FILE", required_unless_present = "object", conflicts_with = "object")]
    input: Option<PathBuf>,

    /// Read the metadata from this object of the configured bucket instead
    #[arg(long, value_name = "NAME")]
    object: Option<String>,

    /// Bucket name (overrides config)
    #[arg(long)]
    bucket: Option<String>,

    /// CSV destination (defaults to stdout)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load().unwrap_or_default(),
    };
    if let Some(bucket) = cli.bucket {
        config.storage.bucket = bucket;
    }

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let rows = match (&cli.input, &cli.object) {
        (Some(path), _) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            export::jsonl_to_csv(BufReader::new(file), writer)?
        }
        (None, object) => {
            let name = object.as_deref().context("Either FILE or --object is required")?;
            let store = GcsBucket::from_config(&config);
            let bytes = store
                .fetch(name)
                .with_context(|| format!("Failed to download gs://{}/{}", config.storage.bucket, name))?;
            export::jsonl_to_csv(Cursor::new(bytes), writer)?
        }
    };

    match &cli.output {
        Some(path) => info!("Wrote {} tasks to {}", rows, path.display()),
        None => info!("Wrote {} tasks", rows),
    }
    Ok(())
}
