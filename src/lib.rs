// ============================================================
// KANTOR IMPORT
// ============================================================
// Bulk tabular-data import pipeline: tokenize delimited text, map
// headers onto an entity schema, validate and coerce every row, and
// hand the committed batch to the insert collaborator.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::use_cases::entity_schemas;
pub use application::use_cases::header_resolver;
pub use application::use_cases::import_wizard::{
    ImportPreview, ImportWizard, PreviewCell, PreviewRow, RecordSink, WizardStage,
};
pub use application::use_cases::row_validator;
pub use domain::error::{AppError, Result};
pub use domain::import::{
    ColumnMapping, EntitySchema, FieldDescriptor, FieldKind, FieldValue, ImportRecord,
    ImportSession, ParseIssue, ParseResult, RowError, SampleDocument, ValidationOutcome,
};
pub use infrastructure::config::ImportConfig;
pub use infrastructure::csv::CsvTokenizer;
