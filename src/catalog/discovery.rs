//! Stable trait asset enumeration
//!
//! Directory iteration order is platform-dependent, so listings are sorted
//! lexicographically by filename. The sorted order is load-bearing: it is the
//! index space that explicit rarity weights align with.

use crate::io::error::{Result, file_system};
use std::path::Path;

/// List trait asset filenames under a layer directory in sorted order
///
/// Hidden entries (leading dot) and subdirectories are excluded.
///
/// # Errors
///
/// Returns an error if the directory or one of its entries cannot be read
pub fn list_trait_assets(layer_dir: &Path) -> Result<Vec<String>> {
    let entries =
        std::fs::read_dir(layer_dir).map_err(|e| file_system(layer_dir, "list assets", e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| file_system(layer_dir, "list assets", e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| file_system(&entry.path(), "inspect asset", e))?;
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        names.push(name);
    }

    names.sort();
    Ok(names)
}
