//! Batch command - extract records from every OCR text file matching a glob.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use fatura_core::models::config::OutputFormat;
use fatura_core::{ExtractionCoordinator, InvoiceExtractor, InvoiceRecord};

use super::config::load_config;
use super::extract::{format_record, FormatArg};

#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for OCR text files, e.g. "scans/*.txt"
    #[arg(required = true)]
    pattern: String,

    /// Write one output file per input here (default: print to stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each record (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Write summary.csv with one row per input file
    #[arg(long)]
    summary: bool,

    /// Files extracted in parallel
    #[arg(short = 'j', long, default_value_t = 4)]
    jobs: usize,

    /// Keep going when a file cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome for one input file.
struct FileOutcome {
    path: PathBuf,
    record: Result<InvoiceRecord, String>,
    elapsed_ms: u64,
}

/// One row of `summary.csv`.
#[derive(Serialize)]
struct SummaryRow<'a> {
    filename: &'a str,
    status: &'static str,
    invoice_number: &'a str,
    supplier_name: &'a str,
    date: String,
    total_amount: String,
    is_low_confidence: String,
    processing_time_ms: u64,
    error: &'a str,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or(config.output.default_format);

    let files = find_text_files(&args.pattern)?;
    if files.is_empty() {
        anyhow::bail!("No matching .txt files found for pattern: {}", args.pattern);
    }
    eprintln!("{} Found {} files to process", style("ℹ").blue(), files.len());

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let outcomes = extract_all(files, &config.extraction, args.jobs, &progress).await?;
    progress.finish_and_clear();

    let mut failures = 0;
    let mut needs_review = 0;

    for outcome in &outcomes {
        let record = match &outcome.record {
            Ok(record) => record,
            Err(message) if args.continue_on_error => {
                warn!("Failed to process {}: {}", outcome.path.display(), message);
                failures += 1;
                continue;
            }
            Err(message) => {
                error!("Failed to process {}: {}", outcome.path.display(), message);
                anyhow::bail!("Processing failed for {}: {}", outcome.path.display(), message);
            }
        };

        if record.is_low_confidence {
            needs_review += 1;
        }

        let rendered = format_record(record, format, &config)?;
        match &args.output_dir {
            Some(dir) => {
                let target = output_path_for(dir, &outcome.path, format);
                fs::write(&target, rendered)?;
                debug!("Wrote output to {}", target.display());
            }
            // Stdout would be cluttered next to the summary file
            None if args.summary => {}
            None => println!("{}", rendered),
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_deref()
            .unwrap_or(Path::new("."))
            .join("summary.csv");
        write_summary(&summary_path, &outcomes)?;
        eprintln!("{} Summary written to {}", style("✓").green(), summary_path.display());
    }

    eprintln!(
        "\n{} Processed {} files in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful ({} need careful review), {} failed",
        style(outcomes.len() - failures).green(),
        style(needs_review).yellow(),
        style(failures).red()
    );

    for outcome in &outcomes {
        if let Err(message) = &outcome.record {
            eprintln!("  {} {}: {}", style("✗").red(), outcome.path.display(), message);
        }
    }

    Ok(())
}

/// Expand the glob, keeping only `.txt` files.
fn find_text_files(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    Ok(glob::glob(pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect())
}

/// Extract every file on the blocking pool, at most `jobs` at a time.
/// Outcomes keep the input order.
async fn extract_all(
    files: Vec<PathBuf>,
    config: &fatura_core::ExtractionConfig,
    jobs: usize,
    progress: &ProgressBar,
) -> anyhow::Result<Vec<FileOutcome>> {
    let coordinator = Arc::new(ExtractionCoordinator::from_config(config));
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let permit = semaphore.clone().acquire_owned().await?;
        let coordinator = coordinator.clone();
        let progress = progress.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();
            let record = read_and_extract(&path, &coordinator).map_err(|e| e.to_string());
            progress.inc(1);

            FileOutcome {
                path,
                record,
                elapsed_ms: file_start.elapsed().as_millis() as u64,
            }
        }));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.await?);
    }
    Ok(outcomes)
}

fn read_and_extract(path: &Path, coordinator: &ExtractionCoordinator) -> anyhow::Result<InvoiceRecord> {
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        warn!("{} is empty, every field will use its fallback value", path.display());
    }
    Ok(coordinator.extract(&text))
}

fn output_path_for(dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("invoice");
    dir.join(format!("{}.{}", stem, format.extension()))
}

fn write_summary(path: &Path, outcomes: &[FileOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for outcome in outcomes {
        let filename = outcome
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let row = match &outcome.record {
            Ok(record) => SummaryRow {
                filename,
                status: "success",
                invoice_number: &record.invoice_number,
                supplier_name: &record.supplier_name,
                date: record.date.to_string(),
                total_amount: record.total_amount.to_string(),
                is_low_confidence: record.is_low_confidence.to_string(),
                processing_time_ms: outcome.elapsed_ms,
                error: "",
            },
            Err(message) => SummaryRow {
                filename,
                status: "error",
                invoice_number: "",
                supplier_name: "",
                date: String::new(),
                total_amount: String::new(),
                is_low_confidence: String::new(),
                processing_time_ms: outcome.elapsed_ms,
                error: message,
            },
        };
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}
