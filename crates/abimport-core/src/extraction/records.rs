//! Parsing of the model's answer into line-item records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::normalize::{find_fenced_block, strip_code_fences};
use crate::models::line_item::LineItemRecord;

/// How to treat a malformed position inside an otherwise valid array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// One bad position fails the whole batch.
    #[default]
    FailFast,
    /// Drop bad positions and report them as skipped.
    SkipInvalid,
}

/// Which cleanup step produced parseable JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    /// The response was JSON as-is.
    Direct,
    /// JSON after removing a fence around the whole response.
    Unfenced,
    /// JSON found in a fenced block inside prose.
    EmbeddedBlock,
}

/// A position dropped under [`RecoveryPolicy::SkipInvalid`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// Zero-based index in the JSON array.
    pub index: usize,
    pub reason: String,
}

/// Outcome of parsing one completion.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    /// Valid JSON array; `records` may be empty.
    Records {
        records: Vec<LineItemRecord>,
        skipped: Vec<SkippedRecord>,
        stage: ParseStage,
    },
    /// The response could not be turned into records.
    ParseFailure {
        /// Completion text exactly as received.
        raw_response: String,
        reason: String,
    },
}

impl ExtractionResult {
    /// Parsed records; empty on failure.
    pub fn records(&self) -> &[LineItemRecord] {
        match self {
            ExtractionResult::Records { records, .. } => records,
            ExtractionResult::ParseFailure { .. } => &[],
        }
    }

    pub fn is_parse_failure(&self) -> bool {
        matches!(self, ExtractionResult::ParseFailure { .. })
    }

    /// Raw completion text, kept only when parsing failed.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            ExtractionResult::ParseFailure { raw_response, .. } => Some(raw_response),
            ExtractionResult::Records { .. } => None,
        }
    }
}

/// Parse a raw completion into line-item records.
///
/// The response is tried as-is first. Only if that fails is a surrounding
/// code fence stripped, and after that a fenced block inside prose is
/// searched for. The top-level value must be an array of objects.
pub fn parse_line_items(raw: &str, policy: RecoveryPolicy) -> ExtractionResult {
    let (stage, value) = match locate_json(raw) {
        Ok(found) => found,
        Err(reason) => return failure(raw, reason),
    };
    debug!("Parsed completion as JSON ({:?})", stage);

    let items = match value {
        Value::Array(items) => items,
        other => {
            return failure(
                raw,
                format!("expected a JSON array of positions, found {}", json_kind(&other)),
            );
        }
    };

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match convert_record(item) {
            Ok(record) => records.push(record),
            Err(reason) => match policy {
                RecoveryPolicy::FailFast => {
                    return failure(raw, format!("position {}: {}", index + 1, reason));
                }
                RecoveryPolicy::SkipInvalid => {
                    warn!("Skipping position {}: {}", index + 1, reason);
                    skipped.push(SkippedRecord { index, reason });
                }
            },
        }
    }

    ExtractionResult::Records {
        records,
        skipped,
        stage,
    }
}

fn failure(raw: &str, reason: String) -> ExtractionResult {
    warn!("Could not parse completion: {}", reason);
    ExtractionResult::ParseFailure {
        raw_response: raw.to_string(),
        reason,
    }
}

fn locate_json(raw: &str) -> Result<(ParseStage, Value), String> {
    let direct = raw.trim();
    let direct_err = match serde_json::from_str(direct) {
        Ok(value) => return Ok((ParseStage::Direct, value)),
        Err(e) => e,
    };

    let unfenced = strip_code_fences(raw);
    let unfenced_err = if unfenced != direct {
        match serde_json::from_str(unfenced) {
            Ok(value) => return Ok((ParseStage::Unfenced, value)),
            Err(e) => e,
        }
    } else {
        direct_err
    };

    if let Some(block) = find_fenced_block(raw).filter(|b| *b != unfenced) {
        if let Ok(value) = serde_json::from_str(block) {
            return Ok((ParseStage::EmbeddedBlock, value));
        }
    }

    Err(format!("invalid JSON: {}", unfenced_err))
}

fn convert_record(item: &Value) -> Result<LineItemRecord, String> {
    let obj = item
        .as_object()
        .ok_or_else(|| format!("expected an object, found {}", json_kind(item)))?;

    let record = LineItemRecord {
        position_id: field_text(obj, "Pos")?,
        title: field_text(obj, "Titel")?,
        description: field_text(obj, "Beschreibung")?,
        quantity_raw: field_text(obj, "Menge")?,
        unit_price: field_text(obj, "Einzelpreis")?,
        total_price: field_text(obj, "Gesamtpreis")?,
    };

    if !record.is_usable() {
        return Err("field Titel is missing or empty".to_string());
    }

    Ok(record)
}

/// Text of a field; numbers keep their JSON spelling, missing and null are empty.
fn field_text(obj: &Map<String, Value>, key: &str) -> Result<String, String> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(format!(
            "field {} must be text or a number, found {}",
            key,
            json_kind(other)
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
