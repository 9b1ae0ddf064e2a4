// ============================================================
// COLUMN MAPPING
// ============================================================
// Partial association between field keys and document headers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field key -> chosen source-document header. A missing entry means
/// "skip this field".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnMapping {
    bindings: HashMap<String, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a header to a field, replacing any previous assignment
    pub fn bind(&mut self, field_key: &str, header: &str) {
        self.bindings
            .insert(field_key.to_string(), header.to_string());
    }

    /// Remove a field's assignment so it is skipped
    pub fn unbind(&mut self, field_key: &str) {
        self.bindings.remove(field_key);
    }

    /// The header assigned to a field, if any
    pub fn header_for(&self, field_key: &str) -> Option<&str> {
        self.bindings.get(field_key).map(String::as_str)
    }

    /// True when some field is already bound to this header
    pub fn claims_header(&self, header: &str) -> bool {
        self.bindings.values().any(|h| h == header)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
