//! # Schema Registry
//!
//! Two phases:
//!
//! 1. **Staging**: [`SchemaRegistryBuilder`] collects [`SchemaDocument`]s
//!    from discovery (or direct [`add`](SchemaRegistryBuilder::add) calls)
//!    and rejects duplicate identifiers.
//! 2. **Compilation**: [`SchemaRegistryBuilder::build`] compiles every
//!    staged document into a `jsonschema::Validator` and freezes the result
//!    into a [`SchemaRegistry`].
//!
//! Compiling after all roots are staged lets any registered schema `$ref`
//! any other, regardless of discovery order.
//!
//! ## Schema Resolution
//!
//! A schema registered under a derived identifier is compiled with that
//! identifier as its `$id`, under the engine's default base
//! `json-schema:///`. Relative `$ref`s therefore resolve against the
//! schema's own path: inside `user/create`, `"address"` means
//! `user/address` and `"../order/item"` means `order/item`. The stored
//! document is left as it was read.
//!
//! Every compile installs a [`LocalSchemaRetriever`] backed by the staged
//! documents. A `$ref` resolves to a registered schema when its URI is the
//! schema's declared `$id` or `json-schema:///<identifier>`. Anything else
//! fails to compile; the engine never fetches remote documents.

use std::borrow::Cow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;

use crate::config::EngineOptions;
use crate::document::{SchemaDocument, SchemaId, ID_KEYWORD};
use crate::error::RegistryError;

/// Base URI the engine resolves relative references against.
const DEFAULT_BASE_URI: &str = "json-schema:///";

/// Placeholder identifier used in errors about inline schemas.
const INLINE_SCHEMA_ID: &str = "<inline>";

type DocumentMap = HashMap<SchemaId, SchemaDocument>;

/// Retriever that resolves `$ref` URIs to registered documents.
struct LocalSchemaRetriever {
    documents: Arc<DocumentMap>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let candidates = [Some(uri_str), uri_str.strip_prefix(DEFAULT_BASE_URI)];
        candidates
            .into_iter()
            .flatten()
            .find_map(|key| self.documents.get(key))
            .map(|document| document.schema().clone())
            .ok_or_else(|| format!("schema not registered for URI: {uri_str}").into())
    }
}

fn compile(
    options: EngineOptions,
    documents: &Arc<DocumentMap>,
    schema: &Value,
) -> Result<Validator, String> {
    options
        .to_validation_options()
        .with_retriever(LocalSchemaRetriever {
            documents: Arc::clone(documents),
        })
        .build(schema)
        .map_err(|e| e.to_string())
}

/// The schema as handed to the engine. An undeclared identifier becomes
/// the document's `$id` so that relative references resolve against it.
fn with_base(document: &SchemaDocument) -> Cow<'_, Value> {
    let schema = document.schema();
    match schema {
        Value::Object(map) if SchemaId::declared(schema).is_none() => {
            let id = document.id().as_str();
            let base = if id.contains("://") {
                id.to_string()
            } else {
                format!("{DEFAULT_BASE_URI}{id}")
            };
            let mut map = map.clone();
            map.insert(ID_KEYWORD.to_string(), Value::String(base));
            Cow::Owned(Value::Object(map))
        }
        _ => Cow::Borrowed(schema),
    }
}

/// Staging area for schema documents prior to compilation.
#[derive(Debug)]
pub struct SchemaRegistryBuilder {
    options: EngineOptions,
    documents: DocumentMap,
}

impl SchemaRegistryBuilder {
    /// Create an empty builder compiling with the given engine options.
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            documents: HashMap::new(),
        }
    }

    /// Stage a document under its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] if the identifier is already
    /// staged; the existing document is kept.
    pub fn add(&mut self, document: SchemaDocument) -> Result<&SchemaId, RegistryError> {
        match self.documents.entry(document.id().clone()) {
            Entry::Occupied(existing) => Err(duplicate(existing.get(), &document)),
            Entry::Vacant(slot) => Ok(slot.insert(document).id()),
        }
    }

    /// Stage a batch of documents atomically: either all are staged or, on
    /// the first conflict (with a staged document or within the batch),
    /// none are.
    pub fn add_all(&mut self, documents: Vec<SchemaDocument>) -> Result<usize, RegistryError> {
        let mut batch: HashMap<&SchemaId, &SchemaDocument> = HashMap::with_capacity(documents.len());
        for document in &documents {
            if let Some(existing) = self.documents.get(document.id()) {
                return Err(duplicate(existing, document));
            }
            if let Some(existing) = batch.insert(document.id(), document) {
                return Err(duplicate(existing, document));
            }
        }

        let count = documents.len();
        for document in documents {
            self.documents.insert(document.id().clone(), document);
        }
        Ok(count)
    }

    /// Discover schema files under `root` into this builder.
    /// See [`crate::discovery::discover`].
    pub fn discover(
        &mut self,
        root: &std::path::Path,
    ) -> Result<usize, crate::error::DiscoveryError> {
        crate::discovery::discover(self, root)
    }

    /// A staged document by identifier.
    pub fn get(&self, id: &str) -> Option<&SchemaDocument> {
        self.documents.get(id)
    }

    /// Number of staged documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether nothing has been staged.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Compile every staged document and freeze the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Compile`] naming the first schema the engine
    /// rejects, including unresolvable `$ref`s.
    pub fn build(self) -> Result<SchemaRegistry, RegistryError> {
        let Self { options, documents } = self;
        let documents = Arc::new(documents);

        let mut validators = HashMap::with_capacity(documents.len());
        for (id, document) in documents.iter() {
            let validator = compile(options, &documents, &with_base(document)).map_err(|reason| {
                RegistryError::Compile {
                    schema_id: id.to_string(),
                    source_path: document.origin(),
                    reason,
                }
            })?;
            validators.insert(id.clone(), validator);
        }

        tracing::debug!(count = validators.len(), "compiled schema registry");
        Ok(SchemaRegistry {
            options,
            documents,
            validators,
        })
    }
}

fn duplicate(existing: &SchemaDocument, rejected: &SchemaDocument) -> RegistryError {
    RegistryError::DuplicateId {
        id: rejected.id().to_string(),
        source_path: rejected.origin(),
        existing: existing.origin(),
    }
}

/// The compiled, immutable set of registered schemas.
///
/// `Send + Sync`; share it behind an `Arc` and read it concurrently
/// without locking.
pub struct SchemaRegistry {
    options: EngineOptions,
    documents: Arc<DocumentMap>,
    validators: HashMap<SchemaId, Validator>,
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("options", &self.options)
            .field("schema_count", &self.validators.len())
            .finish()
    }
}

impl SchemaRegistry {
    /// An empty registry; every named lookup misses.
    pub fn empty(options: EngineOptions) -> Self {
        Self {
            options,
            documents: Arc::new(HashMap::new()),
            validators: HashMap::new(),
        }
    }

    /// The compiled validator registered under `id`.
    pub fn get(&self, id: &str) -> Option<&Validator> {
        self.validators.get(id)
    }

    /// The source document registered under `id`.
    pub fn document(&self, id: &str) -> Option<&SchemaDocument> {
        self.documents.get(id)
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.validators.contains_key(id)
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether no schemas are registered.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// All registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&SchemaId> {
        let mut ids: Vec<&SchemaId> = self.validators.keys().collect();
        ids.sort();
        ids
    }

    /// Compile an anonymous schema without registering it.
    ///
    /// The schema may `$ref` registered schemas. Nothing is cached; each
    /// call compiles afresh.
    pub fn compile_inline(&self, schema: &Value) -> Result<Validator, RegistryError> {
        compile(self.options, &self.documents, schema).map_err(|reason| RegistryError::Compile {
            schema_id: INLINE_SCHEMA_ID.to_string(),
            source_path: INLINE_SCHEMA_ID.to_string(),
            reason,
        })
    }
}
