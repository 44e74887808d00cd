//! Process command - extract positions from a PDF and fill the template.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use abimport_core::extraction::{LlmSettings, Orchestrator, RecoveryPolicy};
use abimport_core::models::config::{AppConfig, LlmConfig};
use abimport_core::template::workbook::save_table;
use abimport_core::{
    ImportOutcome, ImportPipeline, ImportReport, LineItemRecord, OpenAiBackend, PdfTextExtractor,
    TemplateSource,
};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Order confirmation PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Import template (default from config)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Worksheet of the template to fill
    #[arg(short, long)]
    sheet: Option<String>,

    /// Output workbook (default from config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Drop malformed positions instead of rejecting the whole answer
    #[arg(long)]
    skip_invalid: bool,

    /// Print the text extracted from the PDF
    #[arg(long)]
    show_text: bool,
}

impl ProcessArgs {
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(template) = &self.template {
            config.template.path = template.clone();
        }
        if let Some(sheet) = &self.sheet {
            config.template.sheet = Some(sheet.clone());
        }
        if let Some(output) = &self.output {
            config.template.output_file = output.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if self.skip_invalid {
            config.extraction.recovery = RecoveryPolicy::SkipInvalid;
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.apply_to(&mut config);

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    // The key is required before any work is done
    let api_key = config.llm.api_key()?;

    info!("Processing file: {}", args.input.display());
    let pdf_bytes = fs::read(&args.input)?;

    let llm = config.llm.clone();
    let recovery = config.extraction.recovery;
    let source = TemplateSource::Path {
        path: config.template.path.clone(),
        sheet: config.template.sheet.clone(),
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Extracting positions with {}...", config.llm.model));

    // The blocking HTTP client must be created and dropped off the runtime
    let report = tokio::task::spawn_blocking(move || -> anyhow::Result<ImportReport> {
        let pipeline = build_pipeline(&llm, api_key, recovery)?;
        Ok(pipeline.run(&pdf_bytes, &source)?)
    })
    .await;
    pb.finish_and_clear();
    let report = report??;

    if args.show_text {
        println!("{}", style("Extracted text:").bold());
        println!("{}", report.document_text);
        println!();
    }

    match report.outcome {
        ImportOutcome::Filled {
            records,
            table,
            skipped,
        } => {
            print!("{}", format_positions(&records));
            println!();

            for s in &skipped {
                eprintln!(
                    "{} Skipped position {}: {}",
                    style("⚠").yellow(),
                    s.index + 1,
                    s.reason
                );
            }

            let output_path = &config.template.output_file;
            save_table(&table.table, output_path)?;
            println!(
                "{} {} positions added to {}",
                style("✓").green(),
                table.appended_rows,
                output_path.display()
            );
        }
        ImportOutcome::ParseFailure {
            raw_response,
            reason,
        } => {
            eprintln!(
                "{} Could not parse the model response: {}",
                style("✗").red(),
                reason
            );
            eprintln!("{}", style("Raw response:").dim());
            eprintln!("{}", raw_response);
        }
        ImportOutcome::EmptyExtraction { skipped } => {
            println!(
                "{} No positions found in {}",
                style("ℹ").blue(),
                args.input.display()
            );
            if !skipped.is_empty() {
                println!(
                    "{} {} malformed positions were skipped",
                    style("⚠").yellow(),
                    skipped.len()
                );
            }
        }
        ImportOutcome::SchemaIncompatible { missing, headers } => {
            let missing: Vec<String> = missing.iter().map(|f| f.to_string()).collect();
            eprintln!(
                "{} Template {} has no column for: {}",
                style("✗").red(),
                config.template.path.display(),
                missing.join(", ")
            );
            eprintln!("  Columns found: {}", headers.join(", "));
            eprintln!(
                "  Run 'abimport template {}' to see the accepted names.",
                config.template.path.display()
            );
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn build_pipeline(
    llm: &LlmConfig,
    api_key: String,
    recovery: RecoveryPolicy,
) -> anyhow::Result<ImportPipeline> {
    let backend = OpenAiBackend::new(&llm.base_url, api_key, llm.timeout_secs)?;
    let orchestrator = Orchestrator::new(Box::new(backend), LlmSettings::from(llm));
    Ok(ImportPipeline::new(Box::new(PdfTextExtractor::new()), orchestrator).with_recovery(recovery))
}

fn format_positions(records: &[LineItemRecord]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<6} {:<40} {:<14} {:>8}\n",
        "Pos", "Titel", "Menge", "Aufwand"
    ));
    for record in records {
        output.push_str(&format!(
            "{:<6} {:<40} {:<14} {:>8}\n",
            record.position_id,
            truncate(&record.title, 40),
            truncate(&record.quantity_raw, 14),
            record.effort()
        ));
    }

    output
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
