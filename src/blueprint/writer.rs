// src/blueprint/writer.rs

//! Atomic replacement of the generated file

use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Write `contents` to `path` via a temp file in the same directory
///
/// Readers never observe a half-written module file, and a failed run leaves
/// the previous file in place.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(contents.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
