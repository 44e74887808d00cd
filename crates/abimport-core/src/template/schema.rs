//! Mapping of logical fields to template columns.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Fields every import template must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    Title,
    Description,
    Effort,
}

/// Recognized header names per field, lowercase.
const ALIAS_TABLE: [(LogicalField, &[&str]); 3] = [
    (LogicalField::Title, &["aufgabenname", "titel", "task name"]),
    (LogicalField::Description, &["beschreibung", "description"]),
    (
        LogicalField::Effort,
        &["geplanter aufwand", "geplante stunden", "planned effort"],
    ),
];

impl LogicalField {
    pub const ALL: [LogicalField; 3] = [
        LogicalField::Title,
        LogicalField::Description,
        LogicalField::Effort,
    ];

    /// Header names accepted for this field.
    pub fn aliases(self) -> &'static [&'static str] {
        ALIAS_TABLE
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }

    /// Case-insensitive, whitespace-trimmed exact match against the aliases.
    pub fn matches(self, header: &str) -> bool {
        let folded = header.trim().to_lowercase();
        self.aliases().iter().any(|alias| *alias == folded)
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalField::Title => write!(f, "title"),
            LogicalField::Description => write!(f, "description"),
            LogicalField::Effort => write!(f, "planned effort"),
        }
    }
}

/// A header column by position and original name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRef {
    pub index: usize,
    pub name: String,
}

/// Per-field resolution result; `None` means no header matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateSchema {
    pub title_column: Option<ColumnRef>,
    pub description_column: Option<ColumnRef>,
    pub effort_column: Option<ColumnRef>,
}

/// All three fields resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumns {
    pub title: ColumnRef,
    pub description: ColumnRef,
    pub effort: ColumnRef,
}

/// The template lacks a column for one or more fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("template has no column for: {}", list_fields(.missing))]
pub struct SchemaIncompatible {
    pub missing: Vec<LogicalField>,
}

fn list_fields(fields: &[LogicalField]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl TemplateSchema {
    /// Resolve each field to the first matching header, in header order.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        let find = |field: LogicalField| {
            headers
                .iter()
                .enumerate()
                .find(|(_, h)| field.matches(h.as_ref()))
                .map(|(index, h)| ColumnRef {
                    index,
                    name: h.as_ref().to_string(),
                })
        };

        Self {
            title_column: find(LogicalField::Title),
            description_column: find(LogicalField::Description),
            effort_column: find(LogicalField::Effort),
        }
    }

    pub fn column(&self, field: LogicalField) -> Option<&ColumnRef> {
        match field {
            LogicalField::Title => self.title_column.as_ref(),
            LogicalField::Description => self.description_column.as_ref(),
            LogicalField::Effort => self.effort_column.as_ref(),
        }
    }

    /// Fields without a matching column, in declaration order.
    pub fn missing(&self) -> Vec<LogicalField> {
        LogicalField::ALL
            .into_iter()
            .filter(|f| self.column(*f).is_none())
            .collect()
    }

    /// Require all three columns; otherwise report every missing field.
    pub fn require(&self) -> Result<ResolvedColumns, SchemaIncompatible> {
        match (&self.title_column, &self.description_column, &self.effort_column) {
            (Some(title), Some(description), Some(effort)) => Ok(ResolvedColumns {
                title: title.clone(),
                description: description.clone(),
                effort: effort.clone(),
            }),
            _ => Err(SchemaIncompatible {
                missing: self.missing(),
            }),
        }
    }
}
