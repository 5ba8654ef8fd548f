//! # Validation Dispatch
//!
//! [`ValidationService`] is the per-request entry point. It resolves a
//! [`SchemaRef`] against the registry (or compiles it inline), runs the
//! validator over the data, and returns:
//!
//! - `Ok(())` when the data conforms;
//! - [`DispatchError::Failed`] carrying a [`ValidationFailure`] when it
//!   does not;
//! - [`DispatchError::SchemaNotDefined`] / [`DispatchError::Compile`] when
//!   the schema reference itself is wrong.
//!
//! The service holds no mutable state; calls are independent and may run
//! concurrently.

use std::sync::Arc;

use jsonschema::error::ValidationErrorKind;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::ValidationConfig;
use crate::document::SchemaId;
use crate::error::{DispatchError, SetupError};
use crate::registry::{SchemaRegistry, SchemaRegistryBuilder};

/// Message attached to every validation failure.
pub const VALIDATE_ERROR_MESSAGE: &str = "validate error";

/// Which schema to validate against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaRef<'a> {
    /// A registered schema, by identifier.
    Named(&'a str),
    /// An anonymous schema value, compiled on demand.
    Inline(&'a Value),
}

impl<'a> SchemaRef<'a> {
    /// Interpret a JSON value as a schema reference: a string names a
    /// registered schema, anything else is an inline schema.
    pub fn from_value(value: &'a Value) -> Self {
        match value {
            Value::String(id) => Self::Named(id),
            other => Self::Inline(other),
        }
    }
}

impl<'a> From<&'a str> for SchemaRef<'a> {
    fn from(id: &'a str) -> Self {
        Self::Named(id)
    }
}

impl<'a> From<&'a String> for SchemaRef<'a> {
    fn from(id: &'a String) -> Self {
        Self::Named(id)
    }
}

impl<'a> From<&'a SchemaId> for SchemaRef<'a> {
    fn from(id: &'a SchemaId) -> Self {
        Self::Named(id.as_str())
    }
}

impl<'a> From<&'a Value> for SchemaRef<'a> {
    fn from(value: &'a Value) -> Self {
        Self::from_value(value)
    }
}

/// A single violation reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON Pointer to the violating value in the data.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that failed.
    pub schema_path: String,
    /// The failing keyword, e.g. `required`, or `false` for a `false`
    /// subschema.
    pub keyword: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    fn from_engine(error: &jsonschema::ValidationError<'_>) -> Self {
        let schema_path = error.schema_path.to_string();
        let keyword = match keyword_of(&error.kind) {
            Some(keyword) => keyword.to_string(),
            None => schema_path.rsplit('/').next().unwrap_or_default().to_string(),
        };
        Self {
            instance_path: error.instance_path.to_string(),
            schema_path,
            keyword,
            message: error.to_string(),
        }
    }
}

/// The keyword behind an engine error. `None` for errors that do not map
/// to a single keyword (custom checks, regex or reference failures).
fn keyword_of(kind: &ValidationErrorKind) -> Option<&'static str> {
    use ValidationErrorKind as K;

    let keyword = match kind {
        K::AdditionalItems { .. } => "additionalItems",
        K::AdditionalProperties { .. } => "additionalProperties",
        K::AnyOf { .. } => "anyOf",
        K::Constant { .. } => "const",
        K::Contains { .. } => "contains",
        K::ContentEncoding { .. } => "contentEncoding",
        K::ContentMediaType { .. } => "contentMediaType",
        K::Enum { .. } => "enum",
        K::ExclusiveMaximum { .. } => "exclusiveMaximum",
        K::ExclusiveMinimum { .. } => "exclusiveMinimum",
        K::FalseSchema { .. } => "false",
        K::Format { .. } => "format",
        K::MaxItems { .. } => "maxItems",
        K::Maximum { .. } => "maximum",
        K::MaxLength { .. } => "maxLength",
        K::MaxProperties { .. } => "maxProperties",
        K::MinItems { .. } => "minItems",
        K::Minimum { .. } => "minimum",
        K::MinLength { .. } => "minLength",
        K::MinProperties { .. } => "minProperties",
        K::MultipleOf { .. } => "multipleOf",
        K::Not { .. } => "not",
        K::OneOfMultipleValid { .. } | K::OneOfNotValid { .. } => "oneOf",
        K::Pattern { .. } => "pattern",
        K::PropertyNames { .. } => "propertyNames",
        K::Required { .. } => "required",
        K::Type { .. } => "type",
        K::UnevaluatedItems { .. } => "unevaluatedItems",
        K::UnevaluatedProperties { .. } => "unevaluatedProperties",
        K::UniqueItems { .. } => "uniqueItems",
        _ => return None,
    };
    Some(keyword)
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Data failed validation. Carries everything a failure reporter needs to
/// render the rejection.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message} ({} violation(s))", .errors.len())]
pub struct ValidationFailure {
    /// Configured failure code.
    pub code: u32,
    /// Configured HTTP status override, if any.
    pub status: Option<u16>,
    /// Always [`VALIDATE_ERROR_MESSAGE`].
    pub message: String,
    /// Every violation, in engine order. Never empty.
    pub errors: Vec<Violation>,
}

/// Resolves schema references and validates data against them.
#[derive(Debug)]
pub struct ValidationService {
    registry: Arc<SchemaRegistry>,
    fail_code: u32,
    fail_status: Option<u16>,
}

impl ValidationService {
    /// Wrap a built registry with the failure settings from `config`.
    pub fn new(registry: impl Into<Arc<SchemaRegistry>>, config: &ValidationConfig) -> Self {
        Self {
            registry: registry.into(),
            fail_code: config.fail_code,
            fail_status: config.fail_status,
        }
    }

    /// Validate `config`, discover every configured root in order, and
    /// compile the registry.
    ///
    /// # Errors
    ///
    /// Any configuration, discovery or compile error; the process should
    /// not serve traffic after one.
    pub fn from_config(config: &ValidationConfig) -> Result<Self, SetupError> {
        config.validate()?;
        tracing::debug!(?config, "validation options");

        let mut builder = SchemaRegistryBuilder::new(config.engine);
        for root in &config.schema_paths {
            builder.discover(root)?;
        }
        let registry = builder.build()?;
        Ok(Self::new(registry, config))
    }

    /// The underlying registry.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Failure code attached to validation failures.
    pub fn fail_code(&self) -> u32 {
        self.fail_code
    }

    /// HTTP status override attached to validation failures.
    pub fn fail_status(&self) -> Option<u16> {
        self.fail_status
    }

    /// Validate `data` against `schema`.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::SchemaNotDefined`] if a named schema is not
    ///   registered.
    /// - [`DispatchError::Compile`] if an inline schema does not compile.
    /// - [`DispatchError::Failed`] if `data` does not conform.
    pub fn validate<'a>(
        &self,
        schema: impl Into<SchemaRef<'a>>,
        data: &Value,
    ) -> Result<(), DispatchError> {
        let inline;
        let validator = match schema.into() {
            SchemaRef::Named(id) => self
                .registry
                .get(id)
                .ok_or_else(|| DispatchError::SchemaNotDefined(id.to_string()))?,
            SchemaRef::Inline(value) => {
                inline = self.registry.compile_inline(value)?;
                &inline
            }
        };

        let errors: Vec<Violation> = validator
            .iter_errors(data)
            .map(|e| Violation::from_engine(&e))
            .collect();
        if errors.is_empty() {
            return Ok(());
        }

        tracing::debug!(violations = errors.len(), "validation failed");
        Err(DispatchError::Failed(ValidationFailure {
            code: self.fail_code,
            status: self.fail_status,
            message: VALIDATE_ERROR_MESSAGE.to_string(),
            errors,
        }))
    }
}
