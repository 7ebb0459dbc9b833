//! Destination directory handling.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Make sure the destination directory exists, creating parents as needed.
///
/// Returns the directory path unchanged so callers can keep using it.
pub fn prepare_storage_dir(destination: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(destination)?;
    Ok(destination.to_path_buf())
}

/// Map an identifier to a file name inside the destination directory.
///
/// FACT identifiers are `<sha256>_<size>` and pass through untouched. Anything
/// that could leave the directory (separators, `..`, control characters) is
/// replaced with `_`. Returns `None` for identifiers that are empty after
/// trimming.
pub fn file_name_for_uid(uid: &str) -> Option<String> {
    let uid = uid.trim();
    if uid.is_empty() {
        return None;
    }

    let name: String = uid
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '\0' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect();

    if name.chars().all(|ch| ch == '.') {
        return Some(name.replace('.', "_"));
    }
    Some(name.replace("..", "__"))
}

/// Full target path for an identifier
pub fn artifact_path(destination: &Path, uid: &str) -> Option<PathBuf> {
    file_name_for_uid(uid).map(|name| destination.join(name))
}

/// Write `bytes` to `path` so that it either appears complete or not at all.
///
/// The data goes to a temporary file next to `path` first, which is renamed
/// into place once fully written. The temporary file is removed on failure.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
