//! Appending extracted line items to a template table.

use serde::Serialize;
use tracing::debug;

use super::schema::{ResolvedColumns, SchemaIncompatible, TemplateSchema};
use super::table::{Cell, Table};
use crate::models::line_item::LineItemRecord;

/// Template rows followed by one appended row per record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedTable {
    pub table: Table,
    pub original_rows: usize,
    pub appended_rows: usize,
}

impl MergedTable {
    /// Only the rows produced from records.
    pub fn appended(&self) -> &[Vec<Cell>] {
        &self.table.rows[self.original_rows..]
    }
}

/// Append one row per record below the template's existing rows.
///
/// Each new row carries the title, description and numeric effort in the
/// resolved columns; every other column is left empty. The template itself is
/// not modified.
pub fn merge_rows(
    template: &Table,
    columns: &ResolvedColumns,
    records: &[LineItemRecord],
) -> MergedTable {
    let width = template
        .width()
        .max(columns.title.index + 1)
        .max(columns.description.index + 1)
        .max(columns.effort.index + 1);

    let mut table = template.clone();
    table.rows.reserve(records.len());

    for record in records {
        let mut row = vec![Cell::Empty; width];
        row[columns.title.index] = Cell::Text(record.title.clone());
        row[columns.description.index] = Cell::Text(record.description.clone());
        row[columns.effort.index] = Cell::Number(record.effort());
        table.rows.push(row);
    }

    debug!(
        "Merged {} records below {} template rows",
        records.len(),
        template.row_count()
    );

    MergedTable {
        table,
        original_rows: template.row_count(),
        appended_rows: records.len(),
    }
}

/// Resolve the template's columns and merge the records into it.
pub fn fill_template(
    template: &Table,
    records: &[LineItemRecord],
) -> Result<MergedTable, SchemaIncompatible> {
    let columns = TemplateSchema::resolve(&template.headers).require()?;
    Ok(merge_rows(template, &columns, records))
}
