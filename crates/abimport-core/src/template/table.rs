//! In-memory worksheet: one header row followed by data rows.

use serde::Serialize;

/// A single worksheet value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Number(f64),
    Bool(bool),
    /// Excel serial date number.
    DateTime(f64),
    /// Formula error value such as `#DIV/0!`.
    Error(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

/// Sheet contents with a header row.
///
/// `header_row` is the zero-based sheet row holding the headers; data rows
/// follow directly below it. `headers` is the text of each header cell and
/// `header_cells` keeps the cells with their original types. Rows may be
/// shorter than the header; missing trailing cells are empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub sheet_name: String,
    pub header_row: usize,
    pub headers: Vec<String>,
    pub header_cells: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Table with text headers on the first sheet row.
    pub fn new(sheet_name: impl Into<String>, headers: Vec<String>) -> Self {
        let header_cells = headers
            .iter()
            .map(|h| {
                if h.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(h.clone())
                }
            })
            .collect();

        Self {
            sheet_name: sheet_name.into(),
            header_row: 0,
            headers,
            header_cells,
            rows: Vec::new(),
        }
    }

    /// Table whose headers are typed cells, as read from a workbook.
    pub fn from_header_cells(sheet_name: impl Into<String>, header_cells: Vec<Cell>) -> Self {
        let headers = header_cells.iter().map(header_text).collect();
        Self {
            sheet_name: sheet_name.into(),
            header_row: 0,
            headers,
            header_cells,
            rows: Vec::new(),
        }
    }

    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn with_rows(mut self, rows: Vec<Vec<Cell>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Text used to match a header cell against column aliases.
fn header_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(s) | Cell::Error(s) => s.clone(),
        Cell::Int(i) => i.to_string(),
        Cell::Number(n) | Cell::DateTime(n) => n.to_string(),
        Cell::Bool(b) => b.to_string(),
    }
}
