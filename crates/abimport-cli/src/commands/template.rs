//! Template command - show how a template's columns are recognized.

use std::path::PathBuf;

use clap::Args;
use console::style;

use abimport_core::template::workbook::read_template;
use abimport_core::{LogicalField, TemplateSchema};

use super::load_config;

/// Arguments for the template command.
#[derive(Args)]
pub struct TemplateArgs {
    /// Template workbook (default from config)
    path: Option<PathBuf>,

    /// Worksheet to inspect
    #[arg(short, long)]
    sheet: Option<String>,
}

pub async fn run(args: TemplateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let path = args.path.unwrap_or(config.template.path);
    let sheet = args.sheet.or(config.template.sheet);

    if !path.exists() {
        anyhow::bail!("Template not found: {}", path.display());
    }

    let table = read_template(&path, sheet.as_deref())?;

    println!(
        "Template: {} (sheet '{}', {} rows)",
        path.display(),
        table.sheet_name,
        table.row_count()
    );
    println!();
    println!("Columns:");
    for (index, header) in table.headers.iter().enumerate() {
        println!("  {:>3}  {}", index + 1, header);
    }
    println!();

    let schema = TemplateSchema::resolve(&table.headers);
    println!("Fields:");
    for field in LogicalField::ALL {
        match schema.column(field) {
            Some(column) => println!(
                "  {} {:<16} -> '{}' (column {})",
                style("✓").green(),
                field.to_string(),
                column.name,
                column.index + 1
            ),
            None => println!(
                "  {} {:<16} -> not found (accepted: {})",
                style("✗").red(),
                field.to_string(),
                field.aliases().join(", ")
            ),
        }
    }

    let missing = schema.missing();
    println!();
    if missing.is_empty() {
        println!("{} Template is compatible", style("✓").green());
    } else {
        println!(
            "{} Template cannot be filled: {} missing",
            style("✗").red(),
            missing.len()
        );
    }

    Ok(())
}
