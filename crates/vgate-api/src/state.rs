//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. The [`ValidationService`] is built once at
//! startup and shared read-only; handlers reach it through
//! [`FromRef`] (see [`crate::extractors::Validation`]).

use std::sync::Arc;

use axum::extract::FromRef;
use vgate_schema::{ValidationConfig, ValidationService};

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Schema discovery and failure reporting settings.
    pub validation: ValidationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            validation: ValidationConfig::default(),
        }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub validation: Arc<ValidationService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(validation: impl Into<Arc<ValidationService>>, config: AppConfig) -> Self {
        Self {
            validation: validation.into(),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Arc<ValidationService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.validation)
    }
}
