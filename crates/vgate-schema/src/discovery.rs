//! # Schema Discovery
//!
//! Loads every schema file under a root directory into a
//! [`SchemaRegistryBuilder`]. Files are parsed as data (JSON or YAML by
//! suffix) and never evaluated.
//!
//! Discovery is all-or-nothing per root: the first file that fails to read,
//! parse or identify aborts the root with an error naming its full path,
//! and nothing from that root is staged.

use std::path::Path;

use serde_json::Value;

use crate::document::{SchemaDocument, SchemaFormat, SchemaId};
use crate::error::DiscoveryError;
use crate::locate::{locate, LocatedSchema};
use crate::registry::SchemaRegistryBuilder;

/// Discover all schema files under `root` and stage them in `builder`.
///
/// Returns the number of schemas loaded from this root. A root that does
/// not exist contributes nothing and is logged as a warning.
///
/// # Errors
///
/// - [`DiscoveryError::NotADirectory`] if `root` exists but is a file.
/// - [`DiscoveryError::SchemaLoad`] if a file cannot be read or parsed.
/// - [`DiscoveryError::EmptyIdentifier`] if a file without `$id` derives
///   an empty identifier.
/// - [`DiscoveryError::Registry`] if an identifier is already staged.
pub fn discover(builder: &mut SchemaRegistryBuilder, root: &Path) -> Result<usize, DiscoveryError> {
    if !root.exists() {
        tracing::warn!(root = %root.display(), "schema root does not exist, skipping");
        return Ok(0);
    }
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory {
            path: root.display().to_string(),
        });
    }

    let mut documents = Vec::new();
    for located in locate(root) {
        let located = located?;
        let document = load_schema(&located)?;
        tracing::debug!(id = %document.id(), path = %located.path.display(), "loaded schema");
        documents.push(document);
    }

    let count = builder.add_all(documents)?;
    tracing::info!(root = %root.display(), count, "discovered schemas");
    Ok(count)
}

/// Read and parse one located file, resolving its identifier.
pub fn load_schema(located: &LocatedSchema) -> Result<SchemaDocument, DiscoveryError> {
    let load_error = |reason: String| DiscoveryError::SchemaLoad {
        path: located.path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(&located.path).map_err(|e| load_error(e.to_string()))?;

    let schema: Value = match located.format {
        SchemaFormat::Json => {
            serde_json::from_str(&content).map_err(|e| load_error(format!("invalid JSON: {e}")))?
        }
        SchemaFormat::Yaml => {
            serde_yaml::from_str(&content).map_err(|e| load_error(format!("invalid YAML: {e}")))?
        }
    };

    if !schema.is_object() {
        return Err(load_error("schema document must be an object".to_string()));
    }

    let id = resolve_id(&schema, &located.relative).ok_or_else(|| DiscoveryError::EmptyIdentifier {
        path: located.path.display().to_string(),
    })?;

    Ok(SchemaDocument::new(id, schema).with_source(located.path.clone()))
}

/// The declared `$id` if present, otherwise the identifier derived from the
/// file's path relative to its discovery root.
pub fn resolve_id(schema: &Value, relative: &Path) -> Option<SchemaId> {
    SchemaId::declared(schema).or_else(|| SchemaId::from_relative_path(relative))
}
