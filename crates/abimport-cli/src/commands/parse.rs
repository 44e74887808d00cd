//! Parse command - run response cleanup and parsing on a saved model answer.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use abimport_core::extraction::{parse_line_items, ExtractionResult, RecoveryPolicy};
use abimport_core::LineItemRecord;

use super::load_config;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// File containing the raw completion text
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Drop malformed positions instead of rejecting the whole answer
    #[arg(long)]
    skip_invalid: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let policy = if args.skip_invalid {
        RecoveryPolicy::SkipInvalid
    } else {
        config.extraction.recovery
    };

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let raw = fs::read_to_string(&args.input)?;
    info!("Parsing {} ({} chars)", args.input.display(), raw.len());

    let (records, skipped) = match parse_line_items(&raw, policy) {
        ExtractionResult::Records {
            records, skipped, ..
        } => (records, skipped),
        ExtractionResult::ParseFailure { reason, .. } => {
            anyhow::bail!("Could not parse the model response: {}", reason);
        }
    };

    for s in &skipped {
        eprintln!(
            "{} Skipped position {}: {}",
            style("⚠").yellow(),
            s.index + 1,
            s.reason
        );
    }

    let output = format_records(&records, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_records(records: &[LineItemRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_csv(records: &[LineItemRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "Pos",
        "Titel",
        "Beschreibung",
        "Menge",
        "Einzelpreis",
        "Gesamtpreis",
        "Aufwand",
    ])?;

    for record in records {
        wtr.write_record([
            &record.position_id,
            &record.title,
            &record.description,
            &record.quantity_raw,
            &record.unit_price,
            &record.total_price,
            &record.effort().to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[LineItemRecord]) -> String {
    if records.is_empty() {
        return "No positions found.\n".to_string();
    }

    let mut output = String::new();
    for record in records {
        output.push_str(&format!("Pos {}: {}\n", record.position_id, record.title));
        for line in record.description.lines() {
            output.push_str(&format!("  {}\n", line));
        }
        output.push_str(&format!(
            "  Menge: {} (Aufwand {})\n",
            record.quantity_raw,
            record.effort()
        ));
        if !record.unit_price.is_empty() || !record.total_price.is_empty() {
            output.push_str(&format!(
                "  Preis: {} / {}\n",
                record.unit_price, record.total_price
            ));
        }
        output.push('\n');
    }
    output
}
