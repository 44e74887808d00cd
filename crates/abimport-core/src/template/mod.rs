//! Import template handling: column resolution, row merging, workbook I/O.

mod merge;
pub mod quantity;
mod schema;
mod table;
pub mod workbook;

pub use merge::{fill_template, merge_rows, MergedTable};
pub use quantity::normalize_quantity;
pub use schema::{ColumnRef, LogicalField, ResolvedColumns, SchemaIncompatible, TemplateSchema};
pub use table::{Cell, Table};
