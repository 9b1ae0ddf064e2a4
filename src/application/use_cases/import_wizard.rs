// ============================================================
// IMPORT WIZARD
// ============================================================
// State machine owning one import session: upload, map, preview,
// commit. The insert collaborator fires exactly once, at commit.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::application::use_cases::{entity_schemas, header_resolver, row_validator};
use crate::domain::error::{AppError, Result};
use crate::domain::import::{
    EntitySchema, ImportRecord, ImportSession, RowError, ValidationOutcome,
};
use crate::infrastructure::config::ImportConfig;
use crate::infrastructure::csv::CsvTokenizer;
use crate::infrastructure::encoding::decode_upload;

/// External collaborator that durably persists the committed batch.
/// Receives the ordered record sequence in a single call; its atomicity
/// and duplicate handling are its own concern.
pub trait RecordSink {
    fn insert_batch(&mut self, records: Vec<ImportRecord>) -> Result<()>;
}

/// Observable wizard stage. Committed and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStage {
    Uploading,
    Mapped,
    Previewed,
    Committed,
    Cancelled,
}

/// One rendered preview cell, in schema field order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewCell {
    pub field: String,
    pub header: Option<String>,
    pub value: String,
    pub has_error: bool,
}

/// One rendered preview row with its validation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRow {
    pub cells: Vec<PreviewCell>,
    pub valid: bool,
    pub errors: Vec<RowError>,
}

/// Exact validation totals plus a bounded rendering sample.
/// Totals always cover every row; only the sample is capped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreview {
    pub valid_count: usize,
    pub error_count: usize,
    pub sample: Vec<PreviewRow>,
}

enum WizardState {
    Uploading,
    Mapped { session: ImportSession },
    Previewed { session: ImportSession, preview: ImportPreview },
    Committed { submitted: usize },
    Cancelled,
}

/// Orchestrates one import flow against one entity schema.
///
/// Linear stages Uploading -> Mapped -> Previewed -> Committed, with
/// Cancelled reachable from any non-terminal stage. Every transition is
/// an explicit method; a call from the wrong stage is rejected with a
/// state error and leaves the wizard unchanged.
pub struct ImportWizard {
    schema: EntitySchema,
    config: ImportConfig,
    delimiter: Option<char>,
    state: WizardState,
}

impl ImportWizard {
    pub fn new(schema: EntitySchema, config: ImportConfig) -> Self {
        Self {
            schema,
            config,
            delimiter: None,
            state: WizardState::Uploading,
        }
    }

    /// Start a wizard for a registered entity kind
    pub fn for_entity(entity: &str, config: ImportConfig) -> Result<Self> {
        let schema = entity_schemas::schema_for(entity)?;
        Ok(Self::new(schema.clone(), config))
    }

    /// Force a field separator instead of auto-detecting one
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn stage(&self) -> WizardStage {
        match self.state {
            WizardState::Uploading => WizardStage::Uploading,
            WizardState::Mapped { .. } => WizardStage::Mapped,
            WizardState::Previewed { .. } => WizardStage::Previewed,
            WizardState::Committed { .. } => WizardStage::Committed,
            WizardState::Cancelled => WizardStage::Cancelled,
        }
    }

    /// The active session, once an upload has been accepted
    pub fn session(&self) -> Option<&ImportSession> {
        match &self.state {
            WizardState::Mapped { session } | WizardState::Previewed { session, .. } => {
                Some(session)
            }
            _ => None,
        }
    }

    /// Records submitted to the insert collaborator, once committed
    pub fn submitted_count(&self) -> Option<usize> {
        match self.state {
            WizardState::Committed { submitted } => Some(submitted),
            _ => None,
        }
    }

    /// Accept an uploaded document. Extension and size are checked before
    /// any parse attempt; a rejection keeps the wizard in Uploading so the
    /// user can retry with another file.
    pub fn upload(&mut self, bytes: &[u8], file_name: &str) -> Result<()> {
        if !matches!(self.state, WizardState::Uploading) {
            return Err(AppError::StateError(
                "Upload is only accepted at the start of a session".to_string(),
            ));
        }

        self.check_extension(file_name)?;
        self.check_size(bytes)?;

        let text = decode_upload(bytes);
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| CsvTokenizer::detect_delimiter(&text));
        let parse = CsvTokenizer::new().with_delimiter(delimiter).parse(&text);

        if !parse.parse_errors.is_empty() {
            warn!(
                file = file_name,
                anomalies = parse.parse_errors.len(),
                "Document parsed with anomalies"
            );
        }
        info!(
            file = file_name,
            entity = %self.schema.entity,
            rows = parse.total_rows,
            "Upload accepted"
        );

        let mapping = header_resolver::resolve(&parse.headers, &self.schema.fields);
        self.state = WizardState::Mapped {
            session: ImportSession::new(parse, mapping),
        };
        Ok(())
    }

    /// Assign a document header to a schema field. In Previewed the
    /// preview is recomputed immediately.
    pub fn map_field(&mut self, field_key: &str, header: &str) -> Result<()> {
        let schema_has_field = self.schema.field(field_key).is_some();
        let session = self.session_for_mapping()?;

        if !schema_has_field {
            return Err(AppError::ValidationError(format!(
                "Unknown field: {}",
                field_key
            )));
        }
        if !session.parse.headers.iter().any(|h| h == header) {
            return Err(AppError::ValidationError(format!(
                "Unknown header: {}",
                header
            )));
        }

        session.mapping.bind(field_key, header);
        self.refresh_preview();
        Ok(())
    }

    /// Remove a field's assignment so the field is skipped
    pub fn unmap_field(&mut self, field_key: &str) -> Result<()> {
        let session = self.session_for_mapping()?;
        session.mapping.unbind(field_key);
        self.refresh_preview();
        Ok(())
    }

    /// Validate every row for exact totals and build the bounded
    /// rendering sample. Explicit transition to Previewed.
    pub fn preview(&mut self) -> Result<ImportPreview> {
        match std::mem::replace(&mut self.state, WizardState::Cancelled) {
            WizardState::Mapped { mut session } | WizardState::Previewed { mut session, .. } => {
                let preview =
                    compute_preview(&mut session, &self.schema, self.config.preview_rows);
                let snapshot = preview.clone();
                self.state = WizardState::Previewed { session, preview };
                Ok(snapshot)
            }
            other => {
                self.state = other;
                Err(AppError::StateError(
                    "Preview requires an uploaded document".to_string(),
                ))
            }
        }
    }

    /// Re-validate every row, filter per the include-invalid choice and
    /// hand the batch to the insert collaborator in one call. Terminal:
    /// the same session can never fire the collaborator twice.
    pub fn commit(
        &mut self,
        include_invalid_rows: bool,
        sink: &mut dyn RecordSink,
    ) -> Result<usize> {
        match std::mem::replace(&mut self.state, WizardState::Cancelled) {
            WizardState::Previewed { mut session, .. } => {
                session.include_invalid_rows = include_invalid_rows;

                let mut records: Vec<ImportRecord> = Vec::new();
                let mut valid_count = 0usize;
                let mut error_count = 0usize;

                for row in &session.parse.rows {
                    let outcome = validate(&session, &self.schema, row);
                    if outcome.valid {
                        valid_count += 1;
                    } else {
                        error_count += 1;
                    }
                    // An invalid row contributes whatever fields did parse;
                    // its errors are discarded at this point
                    if outcome.valid || include_invalid_rows {
                        records.push(outcome.data);
                    }
                }

                session.valid_count = valid_count;
                session.error_count = error_count;

                let submitted = records.len();
                info!(
                    entity = %self.schema.entity,
                    submitted,
                    skipped = session.parse.rows.len() - submitted,
                    "Committing import batch"
                );

                // Submission is final once the collaborator is invoked,
                // even if it reports a failure
                self.state = WizardState::Committed { submitted };
                sink.insert_batch(records)?;
                Ok(submitted)
            }
            other => {
                self.state = other;
                Err(AppError::StateError(
                    "Commit requires a computed preview".to_string(),
                ))
            }
        }
    }

    /// Abandon the session, discarding all in-memory state
    pub fn cancel(&mut self) -> Result<()> {
        match self.state {
            WizardState::Committed { .. } | WizardState::Cancelled => Err(AppError::StateError(
                "Session is already finished".to_string(),
            )),
            _ => {
                info!(entity = %self.schema.entity, "Import session cancelled");
                self.state = WizardState::Cancelled;
                Ok(())
            }
        }
    }

    fn check_extension(&self, file_name: &str) -> Result<()> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension {
            Some(ext) if self.config.allowed_extensions.iter().any(|a| *a == ext) => Ok(()),
            _ => Err(AppError::ValidationError(format!(
                "Unsupported file type: {}",
                file_name
            ))),
        }
    }

    fn check_size(&self, bytes: &[u8]) -> Result<()> {
        if bytes.len() as u64 > self.config.max_upload_bytes {
            return Err(AppError::ValidationError(format!(
                "File too large: {} bytes (limit {})",
                bytes.len(),
                self.config.max_upload_bytes
            )));
        }
        Ok(())
    }

    fn session_for_mapping(&mut self) -> Result<&mut ImportSession> {
        match &mut self.state {
            WizardState::Mapped { session } | WizardState::Previewed { session, .. } => {
                Ok(session)
            }
            _ => Err(AppError::StateError(
                "Mapping requires an uploaded document".to_string(),
            )),
        }
    }

    /// Keep a computed preview in sync after a mapping change
    fn refresh_preview(&mut self) {
        if let WizardState::Previewed { session, preview } = &mut self.state {
            *preview = compute_preview(session, &self.schema, self.config.preview_rows);
        }
    }
}

fn validate(session: &ImportSession, schema: &EntitySchema, row: &[String]) -> ValidationOutcome {
    row_validator::validate_row(&session.mapping, &session.parse.headers, row, &schema.fields)
}

fn compute_preview(
    session: &mut ImportSession,
    schema: &EntitySchema,
    sample_rows: usize,
) -> ImportPreview {
    let mut valid_count = 0usize;
    let mut error_count = 0usize;
    let mut sample: Vec<PreviewRow> = Vec::new();

    for (idx, row) in session.parse.rows.iter().enumerate() {
        let outcome = validate(session, schema, row);
        if outcome.valid {
            valid_count += 1;
        } else {
            error_count += 1;
        }

        if idx < sample_rows {
            let cells = schema
                .fields
                .iter()
                .map(|field| PreviewCell {
                    field: field.key.clone(),
                    header: session.mapping.header_for(&field.key).map(str::to_string),
                    value: row_validator::cell_value(
                        &session.mapping,
                        &session.parse.headers,
                        row,
                        &field.key,
                    )
                    .to_string(),
                    has_error: outcome.has_error_for(&field.key),
                })
                .collect();
            sample.push(PreviewRow {
                cells,
                valid: outcome.valid,
                errors: outcome.errors,
            });
        }
    }

    session.valid_count = valid_count;
    session.error_count = error_count;

    ImportPreview {
        valid_count,
        error_count,
        sample,
    }
}
