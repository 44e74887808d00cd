//! End-to-end import: PDF text, extraction, parsing, template fill.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::extraction::{parse_line_items, ExtractionResult, Orchestrator, RecoveryPolicy, SkippedRecord};
use crate::models::line_item::LineItemRecord;
use crate::pdf::TextExtractor;
use crate::template::workbook::read_template;
use crate::template::{merge_rows, LogicalField, MergedTable, Table, TemplateSchema};

/// Where the template table comes from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Read from an `.xlsx` file when needed.
    Path { path: PathBuf, sheet: Option<String> },
    /// Already in memory.
    Loaded(Table),
}

impl TemplateSource {
    fn load(&self) -> Result<Table> {
        match self {
            TemplateSource::Path { path, sheet } => Ok(read_template(path, sheet.as_deref())?),
            TemplateSource::Loaded(table) => Ok(table.clone()),
        }
    }
}

/// Terminal state of one import run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportOutcome {
    /// Records were appended to the template.
    Filled {
        records: Vec<LineItemRecord>,
        table: MergedTable,
        skipped: Vec<SkippedRecord>,
    },
    /// The completion could not be parsed; nothing was filled.
    ParseFailure { raw_response: String, reason: String },
    /// Valid answer without any positions.
    EmptyExtraction { skipped: Vec<SkippedRecord> },
    /// The template lacks required columns.
    SchemaIncompatible {
        missing: Vec<LogicalField>,
        headers: Vec<String>,
    },
}

/// Result of [`ImportPipeline::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    /// Text extracted from the PDF, as sent to the model.
    pub document_text: String,
    pub outcome: ImportOutcome,
}

/// Runs one document through extraction and template filling.
pub struct ImportPipeline {
    extractor: Box<dyn TextExtractor>,
    orchestrator: Orchestrator,
    recovery: RecoveryPolicy,
}

impl ImportPipeline {
    pub fn new(extractor: Box<dyn TextExtractor>, orchestrator: Orchestrator) -> Self {
        Self {
            extractor,
            orchestrator,
            recovery: RecoveryPolicy::default(),
        }
    }

    /// Set how malformed positions are handled.
    pub fn with_recovery(mut self, recovery: RecoveryPolicy) -> Self {
        self.recovery = recovery;
        self
    }

    /// Extract line items from `pdf_bytes` and append them to the template.
    ///
    /// Parse failures, empty extractions and incompatible templates are
    /// returned as outcomes. Errors are reserved for PDF, service and
    /// template I/O failures. The template is read only after records were
    /// found, and is never modified.
    pub fn run(&self, pdf_bytes: &[u8], template: &TemplateSource) -> Result<ImportReport> {
        let start = Instant::now();

        // Step 1: PDF text
        info!(
            "Extracting text with {} ({} bytes)",
            self.extractor.backend_name(),
            pdf_bytes.len()
        );
        let document_text = self.extractor.extract_text(pdf_bytes)?;

        // Step 2: one completion request
        let raw = self.orchestrator.extract(&document_text)?;

        // Step 3: parse the answer
        let (records, skipped) = match parse_line_items(&raw, self.recovery) {
            ExtractionResult::Records {
                records, skipped, ..
            } => (records, skipped),
            ExtractionResult::ParseFailure {
                raw_response,
                reason,
            } => {
                return Ok(ImportReport {
                    document_text,
                    outcome: ImportOutcome::ParseFailure {
                        raw_response,
                        reason,
                    },
                });
            }
        };

        if records.is_empty() {
            info!("No line items found");
            return Ok(ImportReport {
                document_text,
                outcome: ImportOutcome::EmptyExtraction { skipped },
            });
        }
        info!("Extracted {} line items", records.len());

        // Step 4: resolve template columns
        let table = template.load()?;
        let schema = TemplateSchema::resolve(&table.headers);
        let columns = match schema.require() {
            Ok(columns) => columns,
            Err(incompatible) => {
                warn!("{}", incompatible);
                return Ok(ImportReport {
                    document_text,
                    outcome: ImportOutcome::SchemaIncompatible {
                        missing: incompatible.missing,
                        headers: table.headers,
                    },
                });
            }
        };

        // Step 5: append rows
        let merged = merge_rows(&table, &columns, &records);

        info!(
            "Import finished in {:.2}s: {} rows appended",
            start.elapsed().as_secs_f64(),
            merged.appended_rows
        );

        Ok(ImportReport {
            document_text,
            outcome: ImportOutcome::Filled {
                records,
                table: merged,
                skipped,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ImportError, PdfError};
    use crate::extraction::LlmSettings;
    use crate::template::Cell;
    use abimport_inference::{CannedBackend, InferenceError};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    struct MockExtractor {
        text: Option<&'static str>,
    }

    impl TextExtractor for MockExtractor {
        fn extract_text(&self, _pdf_bytes: &[u8]) -> crate::pdf::Result<String> {
            self.text
                .map(str::to_string)
                .ok_or_else(|| PdfError::Parse("not a PDF".into()))
        }

        fn backend_name(&self) -> &str {
            "mock"
        }
    }

    const DOCUMENT: &str = "Pos 01 Planung 8 Tage 100,00 800,00";
    const PAYLOAD: &str = r#"[{"Pos":"01","Titel":"Planung","Beschreibung":"- Schritt 1\n- Schritt 2","Menge":"8","Einzelpreis":"100.00","Gesamtpreis":"800.00"}]"#;

    fn pipeline(response: &str) -> (ImportPipeline, Arc<CannedBackend>) {
        let backend = Arc::new(CannedBackend::new(response));
        let pipeline = ImportPipeline::new(
            Box::new(MockExtractor {
                text: Some(DOCUMENT),
            }),
            Orchestrator::new(Box::new(backend.clone()), LlmSettings::default()),
        );
        (pipeline, backend)
    }

    fn template(headers: &[&str]) -> TemplateSource {
        let headers = headers.iter().map(|h| h.to_string()).collect();
        TemplateSource::Loaded(Table::new("Aufgaben", headers))
    }

    fn awork_template() -> TemplateSource {
        template(&["Aufgabenname", "Beschreibung", "Geplanter Aufwand"])
    }

    #[test]
    fn test_plain_response_fills_template() {
        let (pipeline, backend) = pipeline(PAYLOAD);
        let report = pipeline.run(b"%PDF", &awork_template()).unwrap();

        assert_eq!(report.document_text, DOCUMENT);
        assert_eq!(backend.received().len(), 1);

        match report.outcome {
            ImportOutcome::Filled { records, table, skipped } => {
                assert_eq!(records.len(), 1);
                assert!(skipped.is_empty());
                assert_eq!(
                    table.appended()[0],
                    vec![
                        Cell::Text("Planung".into()),
                        Cell::Text("- Schritt 1\n- Schritt 2".into()),
                        Cell::Number(8.0),
                    ]
                );
            }
            other => panic!("expected Filled, got {other:?}"),
        }
    }

    #[test]
    fn test_fenced_response_matches_plain() {
        let (plain, _) = pipeline(PAYLOAD);
        let (fenced, _) = pipeline(&format!("```json\n{}\n```", PAYLOAD));

        let a = plain.run(b"%PDF", &awork_template()).unwrap();
        let b = fenced.run(b"%PDF", &awork_template()).unwrap();
        assert_eq!(a.outcome, b.outcome);
    }

    #[test]
    fn test_invalid_json_is_parse_failure() {
        let (pipeline, _) = pipeline("not valid json");
        let report = pipeline.run(b"%PDF", &awork_template()).unwrap();
        match report.outcome {
            ImportOutcome::ParseFailure { raw_response, .. } => {
                assert_eq!(raw_response, "not valid json")
            }
            other => panic!("expected ParseFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_effort_column() {
        let (pipeline, _) = pipeline(PAYLOAD);
        let report = pipeline
            .run(b"%PDF", &template(&["Task Name", "Description", "Other"]))
            .unwrap();
        assert_eq!(
            report.outcome,
            ImportOutcome::SchemaIncompatible {
                missing: vec![LogicalField::Effort],
                headers: vec!["Task Name".into(), "Description".into(), "Other".into()],
            }
        );
    }

    #[test]
    fn test_empty_array_is_empty_extraction() {
        let (pipeline, _) = pipeline("[]");
        let report = pipeline.run(b"%PDF", &awork_template()).unwrap();
        assert_eq!(
            report.outcome,
            ImportOutcome::EmptyExtraction { skipped: vec![] }
        );
    }

    #[test]
    fn test_template_not_read_without_records() {
        let (pipeline, _) = pipeline("[]");
        let missing = TemplateSource::Path {
            path: "/nonexistent/vorlage.xlsx".into(),
            sheet: None,
        };
        let report = pipeline.run(b"%PDF", &missing).unwrap();
        assert!(matches!(report.outcome, ImportOutcome::EmptyExtraction { .. }));
    }

    #[test]
    fn test_unreadable_template_is_error() {
        let (pipeline, _) = pipeline(PAYLOAD);
        let missing = TemplateSource::Path {
            path: "/nonexistent/vorlage.xlsx".into(),
            sheet: None,
        };
        let err = pipeline.run(b"%PDF", &missing).unwrap_err();
        assert!(matches!(err, ImportError::Template(_)));
    }

    #[test]
    fn test_service_failure_is_error() {
        let backend = Arc::new(CannedBackend::failing(503, "unavailable"));
        let pipeline = ImportPipeline::new(
            Box::new(MockExtractor {
                text: Some(DOCUMENT),
            }),
            Orchestrator::new(Box::new(backend.clone()), LlmSettings::default()),
        );

        let err = pipeline.run(b"%PDF", &awork_template()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::Service(InferenceError::Status { status: 503, .. })
        ));
        assert_eq!(backend.received().len(), 1);
    }

    #[test]
    fn test_pdf_failure_skips_service() {
        let backend = Arc::new(CannedBackend::new(PAYLOAD));
        let pipeline = ImportPipeline::new(
            Box::new(MockExtractor { text: None }),
            Orchestrator::new(Box::new(backend.clone()), LlmSettings::default()),
        );

        let err = pipeline.run(b"garbage", &awork_template()).unwrap_err();
        assert!(matches!(err, ImportError::Pdf(_)));
        assert!(backend.received().is_empty());
    }

    #[test]
    fn test_skip_invalid_reports_dropped_positions() {
        let (pipeline, _) = pipeline(r#"[{"Titel":"Planung","Menge":"8"},{"Titel":""}]"#);
        let pipeline = pipeline.with_recovery(RecoveryPolicy::SkipInvalid);
        let report = pipeline.run(b"%PDF", &awork_template()).unwrap();
        match report.outcome {
            ImportOutcome::Filled { records, skipped, .. } => {
                assert_eq!(records.len(), 1);
                assert_eq!(skipped.len(), 1);
                assert_eq!(skipped[0].index, 1);
            }
            other => panic!("expected Filled, got {other:?}"),
        }
    }
}
