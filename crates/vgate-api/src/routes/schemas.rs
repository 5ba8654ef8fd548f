//! # Schema Validation API
//!
//! Lists registered schemas and validates request bodies against them,
//! either by name (ambient payload) or with a caller-supplied schema.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vgate_schema::{DispatchError, SchemaRef};

use crate::error::AppError;
use crate::extractors::{extract_json, Validation};
use crate::state::AppState;

/// Registered schema listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct SchemaListResponse {
    pub schemas: Vec<String>,
}

/// Body of an inline validation request.
#[derive(Debug, Deserialize)]
pub struct InlineValidationRequest {
    /// A schema value, or a string naming a registered schema.
    pub schema: Value,
    #[serde(default)]
    pub data: Value,
}

/// Build the schemas router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/schemas", get(list_schemas))
        .route("/v1/schemas/validate/{*id}", post(validate_named))
        .route("/v1/validate", post(validate_inline))
}

/// GET /v1/schemas: Sorted identifiers of every registered schema.
async fn list_schemas(State(state): State<AppState>) -> Json<SchemaListResponse> {
    let schemas = state
        .validation
        .registry()
        .ids()
        .into_iter()
        .map(|id| id.to_string())
        .collect();
    Json(SchemaListResponse { schemas })
}

/// POST /v1/schemas/validate/{*id}: Validate the body against a registered schema.
async fn validate_named(
    Path(id): Path<String>,
    validation: Validation,
) -> Result<StatusCode, AppError> {
    validation.validate(id.trim_start_matches('/'))?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/validate: Validate `data` against a caller-supplied schema.
///
/// The schema comes from the client here, so an unknown name is a 404 and
/// an uncompilable schema is a 400.
async fn validate_inline(
    State(state): State<AppState>,
    body: Result<Json<InlineValidationRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_json(body)?;
    state
        .validation
        .validate(SchemaRef::from_value(&req.schema), &req.data)
        .map_err(|err| match err {
            DispatchError::SchemaNotDefined(id) => {
                AppError::NotFound(format!("schema {id}"))
            }
            DispatchError::Compile(e) => AppError::BadRequest(e.to_string()),
            other => AppError::from(other),
        })?;
    Ok(StatusCode::NO_CONTENT)
}
