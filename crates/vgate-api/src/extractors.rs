//! # Custom Extractors & Validation
//!
//! [`Validation`] gives handlers the request body together with the shared
//! [`ValidationService`], so a handler validates the body it received by
//! naming a schema:
//!
//! ```ignore
//! async fn create_user(v: Validation) -> Result<StatusCode, AppError> {
//!     v.validate("user/create")?;
//!     let user: NewUser = v.into_inner()?;
//!     // ...
//! }
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;
use vgate_schema::{SchemaRef, ValidationService};

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// The request payload plus the validation service that checks it.
///
/// Works for any router state from which an `Arc<ValidationService>` can
/// be obtained via [`FromRef`].
#[derive(Debug, Clone)]
pub struct Validation {
    service: Arc<ValidationService>,
    payload: Value,
}

impl Validation {
    /// Build directly from a service and a payload.
    pub fn new(service: Arc<ValidationService>, payload: Value) -> Self {
        Self { service, payload }
    }

    /// Validate the request payload against `schema`.
    pub fn validate<'a>(&self, schema: impl Into<SchemaRef<'a>>) -> Result<(), AppError> {
        self.validate_data(schema, &self.payload)
    }

    /// Validate explicit `data` against `schema`.
    pub fn validate_data<'a>(
        &self,
        schema: impl Into<SchemaRef<'a>>,
        data: &Value,
    ) -> Result<(), AppError> {
        self.service.validate(schema, data).map_err(AppError::from)
    }

    pub fn service(&self) -> &ValidationService {
        &self.service
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }

    /// Deserialize the payload into a typed request.
    pub fn into_inner<T: DeserializeOwned>(self) -> Result<T, AppError> {
        serde_json::from_value(self.payload).map_err(|e| AppError::BadRequest(e.to_string()))
    }
}

impl<S> FromRequest<S> for Validation
where
    Arc<ValidationService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let service = Arc::<ValidationService>::from_ref(state);
        let payload = extract_json(Json::<Value>::from_request(req, state).await)?;
        Ok(Self { service, payload })
    }
}
