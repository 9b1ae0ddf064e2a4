// ============================================================
// KANTOR IMPORT CLI
// ============================================================
// Drive one full import from the command line: useful for trying a
// document against an entity schema without the suite around it.

use std::io::Write;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kantor_import::{entity_schemas, ImportConfig, ImportRecord, ImportWizard, RecordSink, Result};

/// Writes each committed record as one JSON line on stdout
struct JsonLinesSink;

impl RecordSink for JsonLinesSink {
    fn insert_batch(&mut self, records: Vec<ImportRecord>) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for record in records {
            let line = serde_json::to_string(&record).map_err(|e| {
                kantor_import::AppError::Internal(format!("Failed to encode record: {}", e))
            })?;
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

fn run(entity: &str, path: &str, include_invalid: bool) -> Result<usize> {
    let config = ImportConfig::load()?;
    let bytes = std::fs::read(path)?;
    let file_name = std::path::Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);

    let mut wizard = ImportWizard::for_entity(entity, config)?;
    wizard.upload(&bytes, file_name)?;

    let preview = wizard.preview()?;
    info!(
        valid = preview.valid_count,
        invalid = preview.error_count,
        "Validated document"
    );
    for row in preview.sample.iter().filter(|r| !r.valid) {
        for err in &row.errors {
            info!(field = %err.field, "{}", err.message);
        }
    }

    let mut sink = JsonLinesSink;
    wizard.commit(include_invalid, &mut sink)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let include_invalid = args.iter().any(|a| a == "--include-invalid");
    let positional: Vec<&String> = args[1..].iter().filter(|a| !a.starts_with("--")).collect();

    let (entity, path) = match positional.as_slice() {
        [entity, path] => (entity.as_str(), path.as_str()),
        _ => {
            eprintln!("Usage: kantor-import <entity> <file.csv> [--include-invalid]");
            eprintln!("Entities: {}", entity_schemas::entity_kinds().join(", "));
            return ExitCode::FAILURE;
        }
    };

    match run(entity, path, include_invalid) {
        Ok(submitted) => {
            info!(submitted, "Import finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
