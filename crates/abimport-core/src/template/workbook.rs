//! Reading templates from and writing filled tables to `.xlsx` workbooks.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::{debug, info};

use super::table::{Cell, Table};
use crate::error::TemplateError;

/// Excel's hard worksheet limits.
pub const MAX_ROWS: usize = 1_048_576;
pub const MAX_COLUMNS: usize = 16_384;

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm";

/// Read a template workbook from disk.
///
/// `sheet` selects a worksheet by name; `None` takes the first one.
pub fn read_template(path: &Path, sheet: Option<&str>) -> Result<Table, TemplateError> {
    info!("Reading template: {}", path.display());
    let bytes = std::fs::read(path)
        .map_err(|e| TemplateError::Open(format!("{}: {}", path.display(), e)))?;
    read_template_bytes(&bytes, sheet)
}

/// Read a template workbook from memory.
///
/// The first row of the used range is the header row. Its sheet row is kept
/// in [`Table::header_row`], and columns left of the used range are kept as
/// empty columns, so every cell keeps its position when written back.
pub fn read_template_bytes(bytes: &[u8], sheet: Option<&str>) -> Result<Table, TemplateError> {
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e: calamine::XlsxError| TemplateError::Open(format!("{e}")))?;

    let sheet_name = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(TemplateError::SheetNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(TemplateError::NoWorksheet)?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| TemplateError::Open(format!("sheet '{sheet_name}': {e}")))?;

    let (row_offset, column_offset) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));
    let mut rows = range.rows();

    let header_row = rows
        .next()
        .ok_or_else(|| TemplateError::MissingHeader(sheet_name.clone()))?;

    let header_cells: Vec<Cell> = std::iter::repeat_n(Cell::Empty, column_offset)
        .chain(header_row.iter().map(cell_from_data))
        .collect();

    let rows: Vec<Vec<Cell>> = rows
        .map(|row| {
            std::iter::repeat_n(Cell::Empty, column_offset)
                .chain(row.iter().map(cell_from_data))
                .collect()
        })
        .collect();

    debug!(
        "Template sheet '{}': header on row {}, {} columns, {} rows",
        sheet_name,
        row_offset + 1,
        header_cells.len(),
        rows.len()
    );

    Ok(Table::from_header_cells(sheet_name, header_cells)
        .with_header_row(row_offset)
        .with_rows(rows))
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}

/// Serialize a table into an `.xlsx` workbook with a single sheet.
///
/// The header goes on [`Table::header_row`] in bold, data rows directly
/// below it. Cells keep their types: numbers stay numeric so the import tool
/// can sum them, dates get a date format. Formula error values have no
/// literal cell form in the writer and are written as their text.
pub fn write_table(table: &Table) -> Result<Vec<u8>, TemplateError> {
    let used_rows = table.header_row + table.rows.len() + 1;
    if used_rows > MAX_ROWS {
        return Err(TemplateError::TooLarge(format!(
            "{} rows exceed the worksheet limit of {}",
            used_rows, MAX_ROWS
        )));
    }
    if table.width() > MAX_COLUMNS {
        return Err(TemplateError::TooLarge(format!(
            "{} columns exceed the worksheet limit of {}",
            table.width(),
            MAX_COLUMNS
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(&table.sheet_name)
        .map_err(|e| TemplateError::Write(format!("sheet name '{}': {}", table.sheet_name, e)))?;

    let header_format = Format::new().set_bold();
    let header_date_format = Format::new().set_bold().set_num_format(DATE_FORMAT);
    let cell_format = Format::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    let header_row = table.header_row as u32;
    for (col, cell) in table.header_cells.iter().enumerate() {
        write_cell(worksheet, header_row, col as u16, cell, &header_format, &header_date_format)
            .map_err(|e| TemplateError::Write(format!("header column {}: {}", col + 1, e)))?;
    }

    for (row_index, row) in table.rows.iter().enumerate() {
        let row_number = header_row + 1 + row_index as u32;
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, row_number, col as u16, cell, &cell_format, &date_format)
                .map_err(|e| {
                    TemplateError::Write(format!("cell ({}, {}): {}", row_number + 1, col + 1, e))
                })?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| TemplateError::Write(e.to_string()))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    format: &Format,
    date_format: &Format,
) -> Result<(), XlsxError> {
    if cell.is_empty() {
        return Ok(());
    }

    match cell {
        Cell::Empty => {}
        Cell::Text(s) | Cell::Error(s) => {
            worksheet.write_string_with_format(row, col, s, format)?;
        }
        Cell::Int(i) => {
            worksheet.write_number_with_format(row, col, *i as f64, format)?;
        }
        Cell::Number(n) => {
            worksheet.write_number_with_format(row, col, *n, format)?;
        }
        Cell::Bool(b) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        Cell::DateTime(serial) => {
            worksheet.write_number_with_format(row, col, *serial, date_format)?;
        }
    }
    Ok(())
}

/// Write a table to `path`, replacing any existing file.
pub fn save_table(table: &Table, path: &Path) -> Result<(), TemplateError> {
    let bytes = write_table(table)?;
    std::fs::write(path, bytes)
        .map_err(|e| TemplateError::Write(format!("{}: {}", path.display(), e)))?;
    info!("Wrote {} rows to {}", table.row_count(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::line_item::LineItemRecord;
    use crate::template::fill_template;
    use pretty_assertions::assert_eq;

    fn template() -> Table {
        Table::new(
            "Aufgaben",
            vec![
                "Projekt".into(),
                "Aufgabenname".into(),
                "Beschreibung".into(),
                "Geplanter Aufwand".into(),
            ],
        )
        .with_rows(vec![
            vec![
                Cell::Text("Intern".into()),
                Cell::Text("Kickoff".into()),
                Cell::Text("Termin vereinbaren".into()),
                Cell::Number(2.0),
            ],
            vec![
                Cell::Text("Intern".into()),
                Cell::Text("Review".into()),
                Cell::Text("Abnahme".into()),
                Cell::Number(1.5),
            ],
        ])
    }

    #[test]
    fn test_table_round_trip() {
        let table = template();
        let bytes = write_table(&table).unwrap();
        let read = read_template_bytes(&bytes, None).unwrap();
        assert_eq!(read, table);
    }

    #[test]
    fn test_select_sheet_by_name() {
        let bytes = write_table(&template()).unwrap();
        let read = read_template_bytes(&bytes, Some("Aufgaben")).unwrap();
        assert_eq!(read.sheet_name, "Aufgaben");

        let err = read_template_bytes(&bytes, Some("Tabelle1")).unwrap_err();
        assert!(matches!(err, TemplateError::SheetNotFound(name) if name == "Tabelle1"));
    }

    #[test]
    fn test_filled_template_preserves_original_rows() {
        let template = template();
        let records = vec![
            LineItemRecord {
                title: "Planung".into(),
                description: "- Schritt 1\n- Schritt 2".into(),
                quantity_raw: "8 Tage".into(),
                ..Default::default()
            },
            LineItemRecord {
                title: "Umsetzung".into(),
                description: "Entwicklung".into(),
                quantity_raw: "16".into(),
                ..Default::default()
            },
        ];
        let merged = fill_template(&template, &records).unwrap();

        let bytes = write_table(&merged.table).unwrap();
        let read = read_template_bytes(&bytes, None).unwrap();

        assert_eq!(read.row_count(), template.row_count() + records.len());
        assert_eq!(&read.rows[..2], &template.rows[..]);
        assert_eq!(read.rows[2][1], Cell::Text("Planung".into()));
        assert_eq!(read.rows[2][2], Cell::Text("- Schritt 1\n- Schritt 2".into()));
        assert_eq!(read.rows[2][3], Cell::Number(8.0));
        assert_eq!(read.rows[3][3], Cell::Number(16.0));
        assert!(read.rows[3][0].is_empty());
    }

    #[test]
    fn test_save_and_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vorlage.xlsx");
        save_table(&template(), &path).unwrap();

        let read = read_template(&path, None).unwrap();
        assert_eq!(read.headers, template().headers);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_template(&dir.path().join("fehlt.xlsx"), None).unwrap_err();
        assert!(matches!(err, TemplateError::Open(_)));
    }

    #[test]
    fn test_not_a_workbook() {
        let err = read_template_bytes(b"this is not a zip archive", None).unwrap_err();
        assert!(matches!(err, TemplateError::Open(_)));
    }

    #[test]
    fn test_header_only_template() {
        let table = Table::new("Sheet1", vec!["Task Name".into(), "Description".into()]);
        let bytes = write_table(&table).unwrap();
        let read = read_template_bytes(&bytes, None).unwrap();
        assert_eq!(read.headers, table.headers);
        assert!(read.rows.is_empty());
    }

    #[test]
    fn test_invalid_sheet_name_rejected() {
        let table = Table::new("a/b", vec!["Task Name".into()]);
        let err = write_table(&table).unwrap_err();
        assert!(matches!(err, TemplateError::Write(_)));
    }

    fn used_range_start(bytes: &[u8]) -> Option<(u32, u32)> {
        let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let name = workbook.sheet_names()[0].clone();
        workbook.worksheet_range(&name).unwrap().start()
    }

    #[test]
    fn test_header_below_blank_rows_keeps_position() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Aufgaben").unwrap();
        sheet.write_string(1, 0, "Aufgabenname").unwrap();
        sheet.write_string(1, 1, "Beschreibung").unwrap();
        sheet.write_string(1, 2, "Geplanter Aufwand").unwrap();
        sheet.write_string(2, 0, "Kickoff").unwrap();
        let original = workbook.save_to_buffer().unwrap();

        let read = read_template_bytes(&original, None).unwrap();
        assert_eq!(read.header_row, 1);
        assert_eq!(read.rows[0][0], Cell::Text("Kickoff".into()));

        let merged = fill_template(
            &read,
            &[LineItemRecord {
                title: "Planung".into(),
                quantity_raw: "8".into(),
                ..Default::default()
            }],
        )
        .unwrap();
        let written = write_table(&merged.table).unwrap();
        assert_eq!(used_range_start(&written), Some((1, 0)));

        let reread = read_template_bytes(&written, None).unwrap();
        assert_eq!(reread.header_row, 1);
        assert_eq!(reread.headers, read.headers);
        assert_eq!(reread.rows[0], read.rows[0]);
        assert_eq!(reread.rows[1][0], Cell::Text("Planung".into()));
    }

    #[test]
    fn test_offset_table_round_trip() {
        let table = template().with_header_row(3);
        let bytes = write_table(&table).unwrap();
        assert_eq!(used_range_start(&bytes), Some((3, 0)));
        assert_eq!(read_template_bytes(&bytes, None).unwrap(), table);
    }

    #[test]
    fn test_typed_header_cells_round_trip() {
        let table = Table::from_header_cells(
            "Aufgaben",
            vec![
                Cell::Text("Aufgabenname".into()),
                Cell::Number(2024.0),
                Cell::Bool(true),
            ],
        );
        let bytes = write_table(&table).unwrap();
        let read = read_template_bytes(&bytes, None).unwrap();
        assert_eq!(read.header_cells, table.header_cells);
        assert_eq!(read.headers, vec!["Aufgabenname", "2024", "true"]);
    }

    #[test]
    fn test_error_cells_written_as_text() {
        let table = Table::new("Aufgaben", vec!["Aufgabenname".into()])
            .with_rows(vec![vec![Cell::Error("#DIV/0!".into())]]);
        let bytes = write_table(&table).unwrap();
        let read = read_template_bytes(&bytes, None).unwrap();
        assert_eq!(read.rows[0][0], Cell::Text("#DIV/0!".into()));
    }
}
