//! JSON files consumed and produced by a run: the allow-list and checkpoints.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{FormCopyError, Result};
use crate::models::fields::{AllowList, FieldValues};

/// Load the `fields_to_copy` allow-list.
///
/// A missing key yields an empty list; unreadable or malformed files are
/// `AllowListRead` errors the caller may recover from.
pub fn load_allow_list(path: &Path) -> Result<AllowList> {
    let read_error = |reason: String| FormCopyError::AllowListRead {
        path: path.to_path_buf(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| read_error(e.to_string()))?;
    let list: AllowList = serde_json::from_str(&content).map_err(|e| read_error(e.to_string()))?;

    debug!("Loaded {} allowed fields from {}", list.len(), path.display());
    Ok(list)
}

/// Read a checkpoint as raw text, for pattern selection.
pub fn read_checkpoint_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| FormCopyError::CheckpointRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Read a checkpoint as a field map.
pub fn read_checkpoint(path: &Path) -> Result<FieldValues> {
    let content = read_checkpoint_text(path)?;
    serde_json::from_str(&content).map_err(|e| FormCopyError::CheckpointRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write a checkpoint, replacing any previous content.
///
/// Output is indented UTF-8 with non-ASCII characters kept as is.
pub fn write_checkpoint(path: &Path, values: &FieldValues) -> Result<()> {
    let write_error = |reason: String| FormCopyError::CheckpointWrite {
        path: path.to_path_buf(),
        reason,
    };

    let content = serde_json::to_string_pretty(values).map_err(|e| write_error(e.to_string()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
    }
    fs::write(path, content).map_err(|e| write_error(e.to_string()))?;

    debug!("Wrote {} fields to {}", values.len(), path.display());
    Ok(())
}

/// Delete a checkpoint left by an earlier run.
pub fn invalidate_checkpoint(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed stale checkpoint {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FormCopyError::CheckpointWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}
