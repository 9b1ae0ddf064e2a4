// ============================================================
// ROW VALIDATOR / COERCER
// ============================================================
// Pure mapping of raw row cells into typed record values

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::domain::import::{
    ColumnMapping, FieldDescriptor, FieldKind, FieldValue, RowError, ValidationOutcome,
};

/// Literal YYYY-MM-DD shape; calendar validity is checked separately
/// because chrono alone accepts unpadded fields.
static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Resolve a field's mapped header to the raw cell content.
///
/// Unmapped fields, headers missing from the document and ragged rows
/// (fewer cells than headers) all read as the empty string. This is the
/// single place that rule lives.
pub fn cell_value<'a>(
    mapping: &ColumnMapping,
    headers: &[String],
    row: &'a [String],
    field_key: &str,
) -> &'a str {
    let Some(header) = mapping.header_for(field_key) else {
        return "";
    };
    let Some(idx) = headers.iter().position(|h| h == header) else {
        return "";
    };
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Validate and coerce one raw row against the schema.
///
/// Pure and idempotent: identical inputs always yield identical outcomes.
/// Errors never abort the row; every descriptor is checked.
pub fn validate_row(
    mapping: &ColumnMapping,
    headers: &[String],
    row: &[String],
    fields: &[FieldDescriptor],
) -> ValidationOutcome {
    let mut errors: Vec<RowError> = Vec::new();
    let mut data: HashMap<String, FieldValue> = HashMap::new();

    for field in fields {
        let raw = cell_value(mapping, headers, row, &field.key);

        if raw.is_empty() {
            if field.required {
                errors.push(RowError {
                    field: field.key.clone(),
                    message: format!("{} is required", field.label),
                });
            } else if let Some(default) = &field.default_value {
                data.insert(field.key.clone(), default.clone());
            }
            continue;
        }

        match coerce(raw, field) {
            Ok(value) => {
                data.insert(field.key.clone(), value);
            }
            Err(message) => errors.push(RowError {
                field: field.key.clone(),
                message,
            }),
        }
    }

    ValidationOutcome {
        valid: errors.is_empty(),
        errors,
        data,
    }
}

/// Coerce a non-empty cell per the field kind
fn coerce(raw: &str, field: &FieldDescriptor) -> std::result::Result<FieldValue, String> {
    match field.kind {
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Number => raw
            .parse::<f64>()
            .map(FieldValue::Number)
            .map_err(|_| format!("{} must be a valid number", field.label)),
        FieldKind::Date => {
            if DATE_SHAPE.is_match(raw) {
                if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                    return Ok(FieldValue::Date(date));
                }
            }
            Err(format!("{} must be a valid date (YYYY-MM-DD)", field.label))
        }
        FieldKind::Boolean => match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(FieldValue::Boolean(true)),
            "false" | "no" | "0" => Ok(FieldValue::Boolean(false)),
            _ => Err(format!(
                "{} must be true/false, yes/no, or 1/0",
                field.label
            )),
        },
        FieldKind::Enum => {
            let lowered = raw.to_lowercase();
            if field.enum_values.iter().any(|v| v.to_lowercase() == lowered) {
                Ok(FieldValue::Enum(lowered))
            } else {
                Err(format!(
                    "{} must be one of: {}",
                    field.label,
                    field.enum_values.join(", ")
                ))
            }
        }
    }
}
