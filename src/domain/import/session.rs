// ============================================================
// IMPORT SESSION
// ============================================================
// Transient state spanning one upload through commit or cancel

use serde::{Deserialize, Serialize};

use super::mapping::ColumnMapping;
use super::parse::ParseResult;

/// State for one wizard flow. Created at upload, mutated through mapping
/// and preview, destroyed at commit or cancel. Never persisted, never
/// shared between flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSession {
    pub parse: ParseResult,
    pub mapping: ColumnMapping,

    /// Rows that validated cleanly in the latest full pass
    pub valid_count: usize,

    /// Rows with at least one validation error in the latest full pass
    pub error_count: usize,

    /// Whether commit also submits rows that failed validation
    pub include_invalid_rows: bool,
}

impl ImportSession {
    pub fn new(parse: ParseResult, mapping: ColumnMapping) -> Self {
        Self {
            parse,
            mapping,
            valid_count: 0,
            error_count: 0,
            include_invalid_rows: false,
        }
    }
}
