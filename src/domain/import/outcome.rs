// ============================================================
// VALIDATION OUTCOME TYPES
// ============================================================
// Typed cell values and the per-row result of coercion

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::field_schema::FieldKind;

/// A coerced, typed cell value.
///
/// Serializes untagged so committed records read as plain scalars
/// (`{"amount": 125.5, "reconciled": false}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Boolean(bool),
    Enum(String),
}

impl FieldValue {
    /// The field kind this value satisfies
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::Boolean(_) => FieldKind::Boolean,
            FieldValue::Enum(_) => FieldKind::Enum,
        }
    }
}

/// One validation failure, tagged with the field it belongs to.
///
/// The tag lets the preview flag the offending cell without inferring
/// the column from the message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub field: String,
    pub message: String,
}

/// Per-row result of coercing mapped raw text into typed values.
/// Pure function of (mapping, row, schema); identical inputs always
/// yield an identical outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: Vec<RowError>,
    pub data: HashMap<String, FieldValue>,
}

impl ValidationOutcome {
    /// True when any error in this outcome names the given field
    pub fn has_error_for(&self, field_key: &str) -> bool {
        self.errors.iter().any(|e| e.field == field_key)
    }
}
