//! # Schema Documents & Identifiers
//!
//! A [`SchemaDocument`] is a parsed schema plus the [`SchemaId`] it is
//! registered under. The identifier is the document's own `$id` when it
//! declares a non-empty string one, otherwise it is derived from the file
//! path relative to the discovery root:
//!
//! ```text
//! <root>/user/create.schema.json   ->  user/create
//! <root>/orders/line.schema.yaml   ->  orders/line
//! ```
//!
//! Derived identifiers always use `/` separators regardless of platform.

use std::borrow::Borrow;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The JSON member a schema uses to declare its own identifier.
pub const ID_KEYWORD: &str = "$id";

/// File formats recognized during discovery, keyed by file-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// `*.schema.json`
    Json,
    /// `*.schema.yaml` / `*.schema.yml`
    Yaml,
}

const SCHEMA_SUFFIXES: [(&str, SchemaFormat); 3] = [
    (".schema.json", SchemaFormat::Json),
    (".schema.yaml", SchemaFormat::Yaml),
    (".schema.yml", SchemaFormat::Yaml),
];

impl SchemaFormat {
    /// Detect the format of a file from its name. Returns `None` for files
    /// that do not follow the `*.schema.<ext>` convention.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::split_suffix(name).map(|(_, format)| format)
    }

    /// Split a file name into its stem and format, e.g.
    /// `create.schema.json` -> (`create`, `Json`).
    fn split_suffix(name: &str) -> Option<(&str, Self)> {
        SCHEMA_SUFFIXES
            .iter()
            .find_map(|(suffix, format)| name.strip_suffix(suffix).map(|stem| (stem, *format)))
    }
}

/// Identifier a schema is registered and referenced under.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaId(String);

impl SchemaId {
    /// Create an identifier. Returns `None` for the empty string.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    /// The identifier a document declares for itself via `$id`, if any.
    ///
    /// Only non-empty strings count; a missing, empty or non-string `$id`
    /// means the identifier must be derived.
    pub fn declared(schema: &Value) -> Option<Self> {
        schema
            .get(ID_KEYWORD)
            .and_then(Value::as_str)
            .and_then(Self::new)
    }

    /// Derive an identifier from a path relative to the discovery root:
    /// the schema suffix is stripped and components are joined with `/`.
    ///
    /// Returns `None` when the path is not a schema file, escapes the root,
    /// or leaves nothing once the suffix is removed.
    pub fn from_relative_path(relative: &Path) -> Option<Self> {
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?),
                Component::CurDir => {}
                _ => return None,
            }
        }
        let file_name = parts.pop()?;
        let (stem, _) = SchemaFormat::split_suffix(file_name)?;
        parts.push(stem);
        Self::new(parts.join("/"))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SchemaId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SchemaId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SchemaId {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("schema identifier must not be empty")
    }
}

impl From<SchemaId> for String {
    fn from(id: SchemaId) -> Self {
        id.0
    }
}

/// A parsed schema and the identifier it is registered under.
///
/// Immutable once constructed; the registry takes ownership on `add`.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    id: SchemaId,
    schema: Value,
    source: Option<PathBuf>,
}

impl SchemaDocument {
    /// Create a document with an explicit identifier and no source file.
    pub fn new(id: SchemaId, schema: Value) -> Self {
        Self {
            id,
            schema,
            source: None,
        }
    }

    /// Create a document registered under its declared `$id`.
    ///
    /// Returns `None` if the schema does not declare one.
    pub fn from_declared(schema: Value) -> Option<Self> {
        SchemaId::declared(&schema).map(|id| Self::new(id, schema))
    }

    /// Record the file this document was loaded from.
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// The registration identifier.
    pub fn id(&self) -> &SchemaId {
        &self.id
    }

    /// The schema value.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// The file this document was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Human-readable origin for error messages.
    pub(crate) fn origin(&self) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => format!("<{}>", self.id),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = String> {
        "[a-z0-9_-]{1,12}"
    }

    proptest! {
        #[test]
        fn derived_id_is_relative_path_without_suffix(
            dirs in prop::collection::vec(segment(), 0..4),
            stem in "[a-z0-9_.-]{0,8}[a-z0-9_-]",
            suffix in prop::sample::select(vec![".schema.json", ".schema.yaml", ".schema.yml"]),
        ) {
            let mut rel: PathBuf = dirs.iter().collect();
            rel.push(format!("{stem}{suffix}"));

            let id = SchemaId::from_relative_path(&rel).unwrap();

            let mut expected = dirs.clone();
            expected.push(stem);
            prop_assert_eq!(id.as_str(), expected.join("/"));
            prop_assert!(!id.as_str().contains('\\'));
        }
    }
}
