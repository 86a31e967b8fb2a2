//! Extract command - build an invoice record from a single OCR text file.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use tracing::{debug, info, warn};

use fatura_core::models::config::{FaturaConfig, OutputFormat};
use fatura_core::{ExtractionCoordinator, InvoiceParser, InvoiceRecord};

use super::config::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input OCR text file ("-" reads stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Print fields that fell back to defaults
    #[arg(long)]
    show_warnings: bool,

    /// Date to use when none is found (YYYY-MM-DD, default: today)
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum FormatArg {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Text => OutputFormat::Text,
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let text = read_input(&args.input)?;
    if text.trim().is_empty() {
        warn!("Input is empty, every field will use its fallback value");
    }

    info!("Extracting from {}", args.input.display());

    let mut coordinator = ExtractionCoordinator::from_config(&config.extraction);
    if let Some(today) = args.today {
        coordinator = coordinator.with_reference_date(today);
    }

    let result = coordinator.parse(&text);
    let record = &result.record;

    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or(config.output.default_format);
    let output = format_record(record, format, &config)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if record.is_low_confidence {
        eprintln!(
            "{} Total amount not recognized - data may be inaccurate, review carefully.",
            style("⚠").yellow()
        );
    }

    if args.show_warnings {
        for warning in &result.warnings {
            eprintln!("{} {}", style("ℹ").blue(), warning);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(fs::read_to_string(input)?)
}

/// Render a record in the requested format.
pub fn format_record(
    record: &InvoiceRecord,
    format: OutputFormat,
    config: &FaturaConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if config.output.pretty_json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &InvoiceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "invoice_number",
        "supplier_name",
        "date",
        "total_amount",
        "is_low_confidence",
        "item_name",
        "quantity",
        "unit_price",
        "total_price",
    ])?;

    // One row per line item
    for item in &record.line_items {
        wtr.write_record([
            &record.invoice_number,
            &record.supplier_name,
            &record.date.to_string(),
            &record.total_amount.to_string(),
            &record.is_low_confidence.to_string(),
            &item.name,
            &item.quantity.to_string(),
            &item.unit_price.to_string(),
            &item.total_price.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &InvoiceRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice:  {}\n", record.invoice_number));
    output.push_str(&format!("Supplier: {}\n", record.supplier_name));
    output.push_str(&format!("Date:     {}\n", record.date));
    output.push_str(&format!("Total:    {}\n", record.total_amount));
    output.push('\n');

    output.push_str("Items:\n");
    for item in &record.line_items {
        output.push_str(&format!(
            "  {} x {} @ {} = {}\n",
            item.quantity, item.name, item.unit_price, item.total_price
        ));
    }

    if record.is_low_confidence {
        output.push_str("\nLow confidence: total amount not recognized\n");
    }

    output
}
