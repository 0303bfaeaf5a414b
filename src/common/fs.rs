use std::{fs, io::{self, Write}, path::Path};

use tempfile::NamedTempFile;

use crate::error::WriteError;

/// Create the directory if it doesn’t exist; error if a non-directory exists there.
pub(crate) fn ensure_dir_exists(path: &Path) -> io::Result<()> {
    if path.exists() {
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("path exists but is not a directory: {}", path.display()),
            ));
        }
    } else {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Write `bytes` to `path` through a temporary file in the same directory, then rename it
/// over the target. On failure the target is left as it was.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir_exists(dir)
        .map_err(|source| WriteError::Directory { path: dir.to_path_buf(), source })?;

    let mut staged = NamedTempFile::new_in(dir)
        .map_err(|source| WriteError::Stage { path: path.to_path_buf(), source })?;
    staged.write_all(bytes)
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|source| WriteError::Stage { path: path.to_path_buf(), source })?;

    // Dropping the temp file on error removes it.
    staged.persist(path)
        .map_err(|e| WriteError::Persist { path: path.to_path_buf(), source: e.error })?;
    Ok(())
}
