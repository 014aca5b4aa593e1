//! Output directory preparation.

use std::fs;
use std::path::Path;

use crate::error::AppError;

/// Create `path` (and any missing parents) if it does not exist yet.
///
/// Returns `true` when the directory had to be created, `false` when it was
/// already present. Safe to call repeatedly on the same path.
pub fn ensure_dir(path: &Path) -> Result<bool, AppError> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create directory '{}': {e}", path.display()),
        )
    })?;
    Ok(true)
}
