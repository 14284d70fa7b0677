//! formfill
//!
//! Fills supply contract (VV) and object-list (OL) forms for every row of a
//! JSON export and writes one merged PDF per row, plus helpers to install
//! new templates.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use formfill_core::{normalize_rotation, split_contract_template, BatchRunner, FormFillConfig, TemplateSet};
use shared_types::{BatchSummary, Row, RowFailure};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const MANIFEST: &str = "manifest.json";

#[derive(Parser, Debug)]
#[command(name = "formfill")]
#[command(version, about = "Fill supply contract and object-list PDF forms")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill one document per row
    Fill {
        /// JSON array of rows keyed by column label
        #[arg(long)]
        rows: PathBuf,

        /// TOML configuration; built-in defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// Date agreement start dates are computed from (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Split an uploaded two-page contract into its page templates
    SplitTemplate {
        input: PathBuf,

        /// Where the fillable first page goes
        #[arg(long)]
        first: PathBuf,

        /// Where the terms page goes
        #[arg(long)]
        terms: PathBuf,
    },

    /// Bake page rotation into a template so overlays land upright
    NormalizeTemplate { input: PathBuf, output: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Fill {
            rows,
            config,
            out,
            today,
        } => {
            let summary = fill(&rows, config.as_deref(), &out, today)?;
            if !summary.is_clean() {
                warn!(failed = summary.failures.len(), "Some rows were skipped, see {}", MANIFEST);
            }
        }
        Command::SplitTemplate { input, first, terms } => {
            let bytes = read(&input)?;
            let (first_page, terms_page) = split_contract_template(&bytes)?;
            write(&first, &first_page)?;
            write(&terms, &terms_page)?;
            info!(first = %first.display(), terms = %terms.display(), "Contract template split");
        }
        Command::NormalizeTemplate { input, output } => {
            let bytes = read(&input)?;
            write(&output, &normalize_rotation(&bytes)?)?;
            info!(output = %output.display(), "Template normalized");
        }
    }

    Ok(())
}

fn fill(rows: &Path, config: Option<&Path>, out: &Path, today: Option<NaiveDate>) -> anyhow::Result<BatchSummary> {
    let config = match config {
        Some(path) => FormFillConfig::from_file(path)?,
        None => FormFillConfig::default(),
    };
    let templates = TemplateSet::load(&config.templates)?;
    let input = read_rows(rows)?;

    let mut positions = Vec::new();
    let mut valid = Vec::new();
    let mut rejected = Vec::new();
    for (index, entry) in input.into_iter().enumerate() {
        match entry {
            Ok(row) => {
                positions.push(index);
                valid.push(row);
            }
            Err(error) => {
                warn!(row = index, error = %error, "Row skipped");
                rejected.push(RowFailure {
                    row: index,
                    label: String::new(),
                    error,
                });
            }
        }
    }

    let mut runner = BatchRunner::new(&templates, &config);
    if let Some(today) = today {
        runner = runner.with_today(today);
    }
    let summary = restore_row_numbers(runner.run(&valid, out)?, &positions, rejected);

    let manifest = out.join(MANIFEST);
    let writer = BufWriter::new(
        File::create(&manifest).with_context(|| format!("Failed to create {}", manifest.display()))?,
    );
    serde_json::to_writer_pretty(writer, &summary).context("Failed to write manifest")?;
    info!(
        written = summary.outputs.len(),
        manifest = %manifest.display(),
        "Done"
    );
    Ok(summary)
}

/// Rows of the input file in order. A row whose cells cannot be read is
/// kept as its error message so the rest of the file still gets filled.
fn read_rows(path: &Path) -> anyhow::Result<Vec<Result<Row, String>>> {
    let file = File::open(path).with_context(|| format!("Failed to open rows file: {}", path.display()))?;
    let values: Vec<serde_json::Value> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Rows file is not a JSON array: {}", path.display()))?;
    Ok(values
        .into_iter()
        .map(|value| serde_json::from_value::<Row>(value).map_err(|e| e.to_string()))
        .collect())
}

/// Map summary row numbers from the filtered batch back to input
/// positions and add the rows rejected while reading.
fn restore_row_numbers(mut summary: BatchSummary, positions: &[usize], rejected: Vec<RowFailure>) -> BatchSummary {
    let position = |row: usize| positions.get(row).copied().unwrap_or(row);
    for output in &mut summary.outputs {
        output.row = position(output.row);
    }
    for failure in &mut summary.failures {
        failure.row = position(failure.row);
    }
    summary.failures.extend(rejected);
    summary.failures.sort_by_key(|failure| failure.row);
    summary
}

fn read(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
