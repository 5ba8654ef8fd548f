//! # Error Types
//!
//! One `thiserror` enum per phase:
//!
//! - [`ConfigError`]: configuration could not be loaded or is invalid.
//! - [`DiscoveryError`]: a schema root could not be walked, or a schema
//!   file could not be read, parsed or identified.
//! - [`RegistryError`]: a schema identifier collided or a schema failed
//!   to compile.
//! - [`SetupError`]: any of the above, raised while building a
//!   [`ValidationService`](crate::ValidationService) from configuration.
//! - [`DispatchError`]: the outcome of a failed `validate` call.
//!
//! Everything except [`DispatchError::Failed`] is a deployment defect and
//! is never retried.

use thiserror::Error;

use crate::dispatch::ValidationFailure;

/// Configuration could not be loaded or failed validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML or has unknown fields.
    #[error("invalid config {path}: {reason}")]
    Parse {
        /// Path of the configuration file.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// `fail_status` is not an HTTP status code.
    #[error("fail_status {0} is not a valid HTTP status code")]
    InvalidFailStatus(u16),
}

/// Errors raised while discovering schema files under a root directory.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The configured root exists but is not a directory.
    #[error("schema root {path} is not a directory")]
    NotADirectory {
        /// The configured root.
        path: String,
    },

    /// The directory walk itself failed (permissions, symlink loop).
    #[error("failed to walk schema root {root}: {reason}")]
    Walk {
        /// The root being walked.
        root: String,
        /// Walker message.
        reason: String,
    },

    /// A schema file could not be read or parsed.
    #[error("schema error [{path}]: {reason}")]
    SchemaLoad {
        /// Full path of the offending file.
        path: String,
        /// Read or parse failure.
        reason: String,
    },

    /// A schema file without `$id` produced an empty derived identifier.
    #[error("schema error [{path}]: derived identifier is empty")]
    EmptyIdentifier {
        /// Full path of the offending file.
        path: String,
    },

    /// The loaded documents could not be staged in the registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors raised by the schema registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Two documents resolved to the same identifier.
    #[error("duplicate schema identifier '{id}': {source_path} conflicts with {existing}")]
    DuplicateId {
        /// The colliding identifier.
        id: String,
        /// Source of the rejected document.
        source_path: String,
        /// Source of the document registered first.
        existing: String,
    },

    /// The engine rejected a schema.
    #[error("failed to compile schema {schema_id} ({source_path}): {reason}")]
    Compile {
        /// Identifier of the schema, or `<inline>`.
        schema_id: String,
        /// Where the schema came from.
        source_path: String,
        /// Engine message.
        reason: String,
    },
}

/// Errors raised while building a validation service from configuration.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Outcome of a `validate` call that did not succeed.
///
/// Only [`DispatchError::Failed`] describes untrusted input. The other
/// variants mean the calling code references a schema that does not exist
/// or supplied an inline schema the engine cannot compile.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A named schema is not registered.
    #[error("validation schema [{0}] not defined")]
    SchemaNotDefined(String),

    /// An inline schema failed to compile.
    #[error(transparent)]
    Compile(#[from] RegistryError),

    /// The data does not conform to the schema.
    #[error(transparent)]
    Failed(#[from] ValidationFailure),
}

impl DispatchError {
    /// Returns the validation failure, if this is one.
    pub fn as_failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}
