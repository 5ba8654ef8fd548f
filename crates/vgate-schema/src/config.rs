//! # Validation Configuration
//!
//! Every recognized option with its type and default. Loaded once at
//! startup (from YAML or built in code) and checked with
//! [`ValidationConfig::validate`] before discovery runs.
//!
//! ```yaml
//! schema_paths:
//!   - app/validation
//!   - vendor/schemas
//! fail_code: 100
//! fail_status: 400
//! engine:
//!   draft: draft7
//!   validate_formats: true
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Failure code attached to validation failures when none is configured.
pub const DEFAULT_FAIL_CODE: u32 = 100;

/// Options for schema discovery and validation dispatch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Root directories scanned for schema files, in order.
    pub schema_paths: Vec<PathBuf>,
    /// Code attached to every validation failure.
    pub fail_code: u32,
    /// HTTP status for validation failures. `None` lets the hosting
    /// pipeline choose.
    pub fail_status: Option<u16>,
    /// Options passed through to the schema engine on every compile.
    pub engine: EngineOptions,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            schema_paths: vec![default_schema_path()],
            fail_code: DEFAULT_FAIL_CODE,
            fail_status: None,
            engine: EngineOptions::default(),
        }
    }
}

/// `<cwd>/app/validation`, or the relative `app/validation` if the working
/// directory cannot be determined.
fn default_schema_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_default()
        .join("app")
        .join("validation")
}

impl ValidationConfig {
    /// Load configuration from a YAML file. Missing fields take their
    /// defaults; unknown fields are rejected.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|reason| ConfigError::Parse {
            path: path.display().to_string(),
            reason,
        })
    }

    fn from_yaml_str(content: &str) -> Result<Self, String> {
        // An empty file parses as YAML null; treat it as "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(status) = self.fail_status {
            if !(100..=599).contains(&status) {
                return Err(ConfigError::InvalidFailStatus(status));
            }
        }
        Ok(())
    }
}

/// JSON Schema drafts the engine can be pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SchemaDraft {
    #[serde(rename = "draft4")]
    Draft4,
    #[serde(rename = "draft6")]
    Draft6,
    #[serde(rename = "draft7")]
    Draft7,
    #[serde(rename = "draft2019-09")]
    Draft201909,
    #[serde(rename = "draft2020-12")]
    Draft202012,
}

impl From<SchemaDraft> for jsonschema::Draft {
    fn from(draft: SchemaDraft) -> Self {
        match draft {
            SchemaDraft::Draft4 => jsonschema::Draft::Draft4,
            SchemaDraft::Draft6 => jsonschema::Draft::Draft6,
            SchemaDraft::Draft7 => jsonschema::Draft::Draft7,
            SchemaDraft::Draft201909 => jsonschema::Draft::Draft201909,
            SchemaDraft::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

/// Engine-specific compile options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Pin every schema to one draft. `None` detects it from `$schema`.
    pub draft: Option<SchemaDraft>,
    /// Force `format` assertions on or off. `None` keeps the draft default.
    pub validate_formats: Option<bool>,
    /// Accept `format` values the engine does not know.
    pub ignore_unknown_formats: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            draft: None,
            validate_formats: None,
            ignore_unknown_formats: true,
        }
    }
}

impl EngineOptions {
    /// Start a `jsonschema` options builder with these settings applied.
    pub(crate) fn to_validation_options(self) -> jsonschema::ValidationOptions {
        let mut opts = jsonschema::options();
        if let Some(draft) = self.draft {
            opts.with_draft(draft.into());
        }
        if let Some(validate_formats) = self.validate_formats {
            opts.should_validate_formats(validate_formats);
        }
        opts.should_ignore_unknown_formats(self.ignore_unknown_formats);
        opts
    }
}
