// ============================================================
// PARSE RESULT TYPES
// ============================================================
// Structured output of the delimited-text tokenizer

use serde::{Deserialize, Serialize};

/// A non-fatal anomaly collected while tokenizing.
///
/// Row numbers are 1-based ordinals over emitted rows (the header line
/// counts when present; dropped blank lines are never numbered).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseIssue {
    pub row_number: usize,
    pub message: String,
}

/// Everything one tokenizer run produced. Treated as immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    /// Header names, taken from the first row or synthesized as
    /// "Column 1".."Column N" when the document has no header row
    pub headers: Vec<String>,

    /// Data rows, possibly capped by the tokenizer's row limit
    pub rows: Vec<Vec<String>>,

    /// Count of all data rows found, independent of any applied cap
    pub total_rows: usize,

    /// Anomalies encountered along the way; never fatal
    pub parse_errors: Vec<ParseIssue>,
}

impl ParseResult {
    /// True when the document parsed without a single anomaly
    pub fn is_clean(&self) -> bool {
        self.parse_errors.is_empty()
    }
}
