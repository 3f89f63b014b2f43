//! Atomic write-back of transformed stylesheets.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Replace the contents of `path` with `contents`.
///
/// The text is written to a temporary file in the same directory, which is
/// then renamed over the target, so readers never observe a partial file.
/// The target's permissions are carried over when it already exists.
pub fn persist(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| Error::persist(path, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| Error::persist(path, e))?;
    file.as_file()
        .sync_all()
        .map_err(|e| Error::persist(path, e))?;

    if let Ok(metadata) = std::fs::metadata(path) {
        std::fs::set_permissions(file.path(), metadata.permissions())
            .map_err(|e| Error::persist(path, e))?;
    }

    file.persist(path).map_err(|e| Error::persist(path, e.error))?;
    Ok(())
}
