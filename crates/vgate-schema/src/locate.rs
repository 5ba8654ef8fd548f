//! # Schema File Locator
//!
//! Lazily walks a root directory for files following the
//! `*.schema.<ext>` naming convention. Other files are skipped.
//! Entries are yielded in file-name order so discovery is deterministic.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::document::SchemaFormat;
use crate::error::DiscoveryError;

/// A schema file found under a discovery root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSchema {
    /// Full path: the root joined with `relative`.
    pub path: PathBuf,
    /// Path relative to the discovery root.
    pub relative: PathBuf,
    /// Format implied by the file-name suffix.
    pub format: SchemaFormat,
}

/// Walk `root` recursively and yield every schema file beneath it.
///
/// Symlinks are followed. Walk errors (unreadable directories, symlink
/// loops) are yielded in place and do not end the iteration.
pub fn locate(root: &Path) -> impl Iterator<Item = Result<LocatedSchema, DiscoveryError>> {
    let base = root.to_path_buf();
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Err(DiscoveryError::Walk {
                        root: base.display().to_string(),
                        reason: e.to_string(),
                    }))
                }
            };
            if !entry.file_type().is_file() {
                return None;
            }
            let format = entry.file_name().to_str().and_then(SchemaFormat::from_file_name)?;
            let relative = entry.path().strip_prefix(&base).ok()?.to_path_buf();
            Some(Ok(LocatedSchema {
                path: entry.path().to_path_buf(),
                relative,
                format,
            }))
        })
}
