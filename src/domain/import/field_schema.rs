// ============================================================
// FIELD SCHEMA TYPES
// ============================================================
// Per-entity field descriptors and sample documents

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::outcome::FieldValue;

/// Value coercion rule applied to a mapped cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Boolean,
    Enum,
}

/// Schema entry describing one importable attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Unique key within a schema
    pub key: String,

    /// Display name, used verbatim in validation messages
    pub label: String,

    /// Whether an empty cell is a validation error
    pub required: bool,

    /// Coercion rule for non-empty cells
    pub kind: FieldKind,

    /// Accepted values, non-empty only when kind is Enum
    pub enum_values: Vec<String>,

    /// Stored when the field is optional and the cell is empty
    pub default_value: Option<FieldValue>,

    /// Alternate header spellings recognized by the resolver
    pub aliases: Vec<String>,
}

impl FieldDescriptor {
    /// Create an optional field with no aliases
    pub fn new(key: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            required: false,
            kind,
            enum_values: Vec::new(),
            default_value: None,
            aliases: Vec::new(),
        }
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the accepted enum values
    pub fn with_enum_values(mut self, values: &[&str]) -> Self {
        self.enum_values = values.iter().map(|v| v.to_string()).collect();
        self
    }

    /// Set the value stored for an empty optional cell
    pub fn with_default(mut self, value: FieldValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Set the recognized header aliases
    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }
}

/// A downloadable example document for one entity kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleDocument {
    pub file_name: String,
    pub content_type: String,
    pub content: String,
}

/// Ordered field descriptors plus a literal sample document for one
/// importable entity kind. Static configuration; never mutated at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySchema {
    pub entity: String,
    pub fields: Vec<FieldDescriptor>,
    pub sample: String,
}

impl EntitySchema {
    pub fn new(entity: &str, fields: Vec<FieldDescriptor>, sample: &str) -> Self {
        Self {
            entity: entity.to_string(),
            fields,
            sample: sample.to_string(),
        }
    }

    /// Look up a descriptor by key
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// The sample document, served as text/csv under "<entity>-sample.csv"
    pub fn sample_document(&self) -> SampleDocument {
        SampleDocument {
            file_name: format!("{}-sample.csv", self.entity),
            content_type: "text/csv".to_string(),
            content: self.sample.clone(),
        }
    }

    /// Validate schema invariants
    pub fn validate(&self) -> Result<(), String> {
        let mut seen: HashSet<&str> = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.key.as_str()) {
                return Err(format!(
                    "Duplicate field key '{}' in schema '{}'",
                    field.key, self.entity
                ));
            }
            if field.kind == FieldKind::Enum && field.enum_values.is_empty() {
                return Err(format!(
                    "Enum field '{}' in schema '{}' declares no values",
                    field.key, self.entity
                ));
            }
            if field.kind != FieldKind::Enum && !field.enum_values.is_empty() {
                return Err(format!(
                    "Non-enum field '{}' in schema '{}' declares enum values",
                    field.key, self.entity
                ));
            }
            if let Some(default) = &field.default_value {
                if default.kind() != field.kind {
                    return Err(format!(
                        "Default for field '{}' in schema '{}' has the wrong kind",
                        field.key, self.entity
                    ));
                }
            }
        }
        Ok(())
    }
}
