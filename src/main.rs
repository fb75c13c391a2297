use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use energuide_etl::app::{OnError, TransformUseCase};
use energuide_etl::config::Config;
use energuide_etl::infra::JsonlDwellingOutputAdapter;
use energuide_etl::observability::init_logging;
use energuide_etl::pipeline::extract::run_extract;
use energuide_etl::pipeline::ingestion::{read_jsonl, read_zip};
use energuide_etl::pipeline::output_schema::validate_jsonl;
use energuide_etl::pipeline::processing::RawRecord;

#[derive(Parser)]
#[command(name = "energuide")]
#[command(about = "Extract and transform EnerGuide home evaluation data")]
#[command(version)]
struct Cli {
    /// Config file (defaults to energuide.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn a CSV export into a zip of per-evaluation documents
    Extract {
        #[arg(long)]
        infile: PathBuf,
        #[arg(long)]
        outfile: PathBuf,
    },
    /// Transform extracted evaluations (.zip or .jsonl) into dwelling documents
    Transform {
        #[arg(long)]
        input: PathBuf,
        /// JSON-lines output, one dwelling per line
        #[arg(long)]
        output: PathBuf,
        /// skip or halt on a bad house; overrides the config file
        #[arg(long)]
        on_error: Option<OnError>,
    },
    /// Check a JSON-lines dwelling file against the output schema
    ValidateOutput {
        #[arg(long)]
        input: PathBuf,
    },
}

fn read_records(input: &Path) -> Result<Vec<RawRecord>> {
    let extension = input
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let records = match extension.as_deref() {
        Some("zip") => read_zip(input)?.collect::<energuide_etl::error::Result<Vec<_>>>(),
        Some("jsonl") | Some("json") => read_jsonl(input)?.collect(),
        _ => bail!("Unsupported input file '{}', expected .zip or .jsonl", input.display()),
    };
    records.with_context(|| format!("Failed to read records from {}", input.display()))
}

fn transform(config: &Config, input: &Path, output: &Path, on_error: Option<OnError>) -> Result<()> {
    let records = read_records(input)?;
    let adapter = JsonlDwellingOutputAdapter::new(output)?;

    let mut use_case = TransformUseCase::new(Box::new(adapter))
        .with_on_error(on_error.unwrap_or(config.transform.on_error))
        .with_label_policy(config.transform.label_policy)
        .with_parallel(config.transform.parallel);

    let summary = use_case.run(records)?;
    println!("Transform results:");
    println!("   Rows: {}", summary.rows);
    println!("   Houses: {}", summary.groups);
    println!("   Written: {}", summary.dwellings_written);
    println!("   Failed: {}", summary.groups_failed);
    println!("   Evaluations dropped: {}", summary.evaluations_dropped);
    println!("   Output file: {}", output.display());
    Ok(())
}

fn validate_output(input: &Path) -> Result<()> {
    let check = validate_jsonl(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    if check.is_ok() {
        println!("valid: {} documents", check.valid);
        return Ok(());
    }

    eprintln!("invalid:");
    for (line, messages) in &check.invalid {
        for message in messages {
            eprintln!("- line {}: {}", line, message);
        }
    }
    bail!("{} of {} documents failed validation", check.invalid.len(), check.valid + check.invalid.len())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let _guard = init_logging(&config.logging.directory)
        .with_context(|| format!("Failed to open log directory {}", config.logging.directory.display()))?;

    let result = match cli.command {
        Commands::Extract { infile, outfile } => run_extract(&infile, &outfile)
            .map(|summary| {
                println!("Extracted {} rows ({} failed) to {}", summary.written, summary.failed, outfile.display());
            })
            .map_err(anyhow::Error::from),
        Commands::Transform { input, output, on_error } => transform(&config, &input, &output, on_error),
        Commands::ValidateOutput { input } => validate_output(&input),
    };

    match &result {
        Ok(()) => info!("Done"),
        Err(e) => error!(error = %e, "Command failed"),
    }
    result
}
