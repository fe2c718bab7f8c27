//! File writing helpers.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

/// Mode given to files that do not exist yet.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Replaces the file at `path` with `bytes`, all or nothing.
///
/// The content goes to a temporary file in the destination directory first and
/// is then renamed over `path`, so a failed write never leaves a truncated file
/// behind. An existing file keeps its permissions; a new one gets `rw-r--r--`.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    debug!(path = %path.display(), "writing file atomically");

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    let perms = target_permissions(path, tmp.as_file())?;
    tmp.as_file().set_permissions(perms)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Permissions the replacement file should carry.
fn target_permissions(path: &Path, tmp: &fs::File) -> io::Result<fs::Permissions> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.permissions()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => new_file_permissions(tmp),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn new_file_permissions(_tmp: &fs::File) -> io::Result<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::Permissions::from_mode(NEW_FILE_MODE))
}

#[cfg(not(unix))]
fn new_file_permissions(tmp: &fs::File) -> io::Result<fs::Permissions> {
    Ok(tmp.metadata()?.permissions())
}
