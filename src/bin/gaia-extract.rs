use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gaia_extract::{
    config::Config,
    export,
    models::{ExtractionBatch, ExtractionRecord},
    storage::GcsBucket,
    utils, BatchWalker, ExtractorRegistry,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "gaia-extract")]
#[command(about = "Extract plain text from GAIA task attachments")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to config/settings.toml or ~/.config/gaia-extract/settings.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a single file and print its text
    File {
        /// File to extract
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Extract every file directly under a directory
    Dir {
        /// Directory to scan
        #[arg(value_name = "DIR")]
        dir: PathBuf,
        /// Additional file names to skip (repeatable)
        #[arg(long, value_name = "NAME")]
        ignore: Vec<String>,
        /// Write the batch here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Extract every object of a Cloud Storage bucket
    Bucket {
        /// Bucket name (overrides config)
        #[arg(long)]
        bucket: Option<String>,
        /// Only objects whose name starts with this prefix
        #[arg(long)]
        prefix: Option<String>,
        /// Additional object base names to skip (repeatable)
        #[arg(long, value_name = "NAME")]
        ignore: Vec<String>,
        /// Write the batch here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Ok(Config::load().unwrap_or_default()),
    }
}

/// Warn up front about external tools the image and audio extractors need
fn check_tools(config: &Config) {
    if !utils::command_available(&config.ocr.executable) {
        warn!(
            "{} not found in PATH; image files will report OCR failures",
            config.ocr.executable
        );
    }
    if !utils::command_available(&config.audio.ffmpeg) {
        warn!(
            "{} not found in PATH; only WAV audio can be transcribed",
            config.audio.ffmpeg
        );
    }
    if config.speech_api_key().is_none() {
        warn!("No speech API key configured; transcription requests are sent unauthenticated");
    }
}

fn progress_bar(len: Option<u64>) -> Result<ProgressBar> {
    let (pb, template) = match len {
        Some(len) => (
            ProgressBar::new(len),
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} files ({msg})",
        ),
        None => (
            ProgressBar::new_spinner(),
            "{spinner:.green} [{elapsed_precise}] {pos} objects ({msg})",
        ),
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template(template)
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn tick(pb: &ProgressBar, record: &ExtractionRecord) {
    pb.set_message(record.source.clone());
    pb.inc(1);
}

fn write_text<W: Write>(batch: &ExtractionBatch, mut writer: W) -> Result<()> {
    for record in batch {
        writeln!(writer, "=== {} ===", record.source)?;
        writeln!(writer, "{}", record.text())?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_batch(batch: &ExtractionBatch, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    match format {
        OutputFormat::Text => write_text(batch, writer),
        OutputFormat::Csv => export::write_csv(batch, writer),
        OutputFormat::Json => export::write_json(batch, writer),
    }?;

    if let Some(path) = output {
        info!("Wrote {} records to {}", batch.len(), path.display());
    }
    Ok(())
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

    let mut config = load_config(cli.config.as_deref())?;
    check_tools(&config);

    match cli.command {
        Commands::File { file } => {
            let registry = ExtractorRegistry::new(&config);
            match registry.extract_path(&file) {
                Ok(text) => println!("{}", text),
                Err(failure) => bail!("{}: {}", file.display(), failure),
            }
        }
        Commands::Dir {
            dir,
            ignore,
            output,
            format,
        } => {
            config.extract.ignore.extend(ignore);
            let registry = ExtractorRegistry::new(&config);
            let walker = BatchWalker::from_config(&registry, &config);

            let entries = walker.entries(&dir)?;
            info!("Extracting {} files from {}", entries.len(), dir.display());
            let pb = progress_bar(Some(entries.len() as u64))?;
            let batch = walker.extract_entries_with(&entries, |record| tick(&pb, record));
            pb.finish_with_message(format!("{} failed", batch.failures()));

            write_batch(&batch, output.as_deref(), format)?;
        }
        Commands::Bucket {
            bucket,
            prefix,
            ignore,
            output,
            format,
        } => {
            if let Some(bucket) = bucket {
                config.storage.bucket = bucket;
            }
            config.extract.ignore.extend(ignore);

            let mut store = GcsBucket::from_config(&config);
            if let Some(prefix) = prefix {
                store = store.with_prefix(prefix);
            }
            info!("Scanning gs://{}", config.storage.bucket);

            let registry = ExtractorRegistry::new(&config);
            let walker = BatchWalker::from_config(&registry, &config);
            let pb = progress_bar(None)?;
            let batch = walker.extract_objects_with(&store, |record| tick(&pb, record))?;
            pb.finish_with_message(format!("{} failed", batch.failures()));

            write_batch(&batch, output.as_deref(), format)?;
        }
    }

    Ok(())
}
