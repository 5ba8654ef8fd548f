//! # Bootstrap
//!
//! Turns an [`AppConfig`] into a ready [`AppState`]:
//!
//! 1. **Load configuration**: optional YAML file, then command-line overrides.
//! 2. **Discover schemas**: walk every root and compile the registry.
//! 3. **Log banner**: structured startup summary.
//!
//! Any failure here stops the process before it binds a port.

use std::path::{Path, PathBuf};

use vgate_schema::{ConfigError, SetupError, ValidationConfig, ValidationService};

use crate::state::{AppConfig, AppState};

/// Errors during startup.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("schema setup failed: {0}")]
    Schemas(#[from] SetupError),
}

/// Load the validation configuration.
///
/// Reads `path` when given, otherwise starts from defaults. A non-empty
/// `schema_paths` replaces the configured roots.
pub fn load_config(
    path: Option<&Path>,
    schema_paths: Vec<PathBuf>,
) -> Result<ValidationConfig, BootstrapError> {
    let mut config = match path {
        Some(path) => ValidationConfig::from_yaml_file(path)?,
        None => ValidationConfig::default(),
    };
    if !schema_paths.is_empty() {
        config.schema_paths = schema_paths;
    }
    Ok(config)
}

/// Discover and compile every schema, returning the application state.
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let service = ValidationService::from_config(&config.validation)?;
    log_banner(&config, &service);
    Ok(AppState::new(service, config))
}

fn log_banner(config: &AppConfig, service: &ValidationService) {
    let roots: Vec<String> = config
        .validation
        .schema_paths
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    tracing::info!(
        port = config.port,
        schemas = service.registry().len(),
        roots = ?roots,
        fail_code = service.fail_code(),
        fail_status = ?service.fail_status(),
        "vgate ready"
    );
}
