//! Resolving a configured directory to the PDF inside it.

use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use tracing::debug;

use crate::error::{FormCopyError, Result};

/// First regular file ending in `.pdf` inside `dir`, in name order.
///
/// The extension match is case-sensitive.
pub fn find_pdf_in_directory(dir: &Path) -> Result<PathBuf> {
    let not_found = || FormCopyError::NoMatchingDirectoryFile(dir.to_path_buf());

    let escaped = Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{escaped}/*.pdf");
    let entries = glob(&pattern).map_err(|_| not_found())?;

    let found = entries
        .filter_map(|entry| entry.ok())
        .find(|path| path.is_file())
        .ok_or_else(not_found)?;

    debug!("Resolved {} to {}", dir.display(), found.display());
    Ok(found)
}
