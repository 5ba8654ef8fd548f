//! # vgate-schema: Schema Discovery, Registry & Validation Dispatch
//!
//! Loads JSON Schema documents from disk at startup, registers them under
//! stable identifiers, and validates request payloads against them.
//!
//! ## Startup (`discovery`, `registry`)
//!
//! For each configured root directory, [`discovery::discover`] walks the tree
//! for `*.schema.json` / `*.schema.yaml` files, parses each one, and stages it
//! in a [`SchemaRegistryBuilder`]. A document without a `$id` is registered
//! under its path relative to the root, suffix stripped, with `/` separators:
//! `<root>/user/create.schema.json` becomes `user/create`.
//!
//! [`SchemaRegistryBuilder::build`] compiles every staged document into a
//! validator. Any read, parse, duplicate-identifier or compile error aborts
//! startup.
//!
//! ## Per request (`dispatch`)
//!
//! [`ValidationService::validate`] resolves a [`SchemaRef`] (a registered
//! identifier or an inline schema value), runs the validator, and returns
//! `Ok(())` or a [`DispatchError`]. A failed validation carries a
//! [`ValidationFailure`] with the configured failure code, optional HTTP
//! status, the fixed message `"validate error"` and every violation the
//! engine reported. An unknown identifier is a configuration error, never a
//! validation failure.
//!
//! ## Crate Policy
//!
//! - No HTTP dependency. The hosting pipeline maps [`DispatchError`] into
//!   its own response type.
//! - The registry is immutable after [`SchemaRegistryBuilder::build`] and is
//!   safe to share across threads without locks.
//! - Schema `$ref`s resolve only against registered documents. The engine
//!   never fetches remote schemas.

pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod locate;
pub mod registry;

pub use config::{EngineOptions, SchemaDraft, ValidationConfig};
pub use discovery::discover;
pub use dispatch::{SchemaRef, ValidationFailure, ValidationService, Violation, VALIDATE_ERROR_MESSAGE};
pub use document::{SchemaDocument, SchemaFormat, SchemaId};
pub use error::{ConfigError, DiscoveryError, DispatchError, RegistryError, SetupError};
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};
