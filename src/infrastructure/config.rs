// ============================================================
// IMPORT CONFIGURATION
// ============================================================
// Upload limits and preview sizing, layered from defaults, an optional
// config file and the environment

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// Product default upload cap: 10 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Tunables for the import pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Hard cap on uploaded document size, checked before any parse
    pub max_upload_bytes: u64,

    /// Accepted trailing file extensions, without the dot
    pub allowed_extensions: Vec<String>,

    /// Number of rows rendered in the mapping preview sample
    pub preview_rows: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: vec!["csv".to_string()],
            preview_rows: 10,
        }
    }
}

impl ImportConfig {
    /// Load configuration: defaults, then `kantor-import.toml` when present,
    /// then `KANTOR_IMPORT_*` environment variables.
    pub fn load() -> Result<Self> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file("kantor-import.toml"))
            .merge(Env::prefixed("KANTOR_IMPORT_"))
            .extract()
            .map_err(|e| AppError::Internal(format!("Failed to load import config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.max_upload_bytes == 0 {
            return Err(AppError::ValidationError(
                "max_upload_bytes must be > 0".to_string(),
            ));
        }
        if self.allowed_extensions.is_empty() {
            return Err(AppError::ValidationError(
                "allowed_extensions must not be empty".to_string(),
            ));
        }
        if self.preview_rows == 0 {
            return Err(AppError::ValidationError(
                "preview_rows must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();

        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.allowed_extensions, vec!["csv"]);
        assert_eq!(config.preview_rows, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let config = ImportConfig {
            max_upload_bytes: 0,
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_allow_list() {
        let config = ImportConfig {
            allowed_extensions: Vec::new(),
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }
}
