//! Filesystem helpers shared by key storage, packing and unpacking.

use std::io;
use std::io::Write;
use std::path::Path;

use crate::error::Crx3Error;
use crate::error::Result;

/// Mode for private keys.
pub(crate) const SECRET_FILE_MODE: u32 = 0o600;
/// Mode for containers and public keys.
pub(crate) const PUBLIC_FILE_MODE: u32 = 0o644;

/// Directory a relative or absolute file path lives in, `.` for bare file names.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Write `contents` to a temporary file beside `path`, then rename it into place.
///
/// Readers never observe a partially written file; on error nothing is left behind.
pub(crate) fn write_atomic(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    let mut file = tempfile::Builder::new().prefix(".crx3-").tempfile_in(parent_dir(path))?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file().set_permissions(std::fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    file.persist(path).map_err(|e| Crx3Error::Io(e.error))?;
    Ok(())
}

/// Read a whole file, mapping a missing file to [`Crx3Error::PathNotFound`].
pub(crate) fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| not_found_or_io(path, e))
}

pub(crate) fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| not_found_or_io(path, e))
}

pub(crate) fn not_found_or_io(path: &Path, err: io::Error) -> Crx3Error {
    if err.kind() == io::ErrorKind::NotFound {
        Crx3Error::PathNotFound(path.to_path_buf())
    } else {
        Crx3Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"old").unwrap();

        write_atomic(&path, b"new", PUBLIC_FILE_MODE).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");

        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1, "temporary file should have been renamed");
    }

    #[test]
    fn parent_of_bare_name_is_cwd() {
        assert_eq!(parent_dir(Path::new("ext.crx")), Path::new("."));
        assert_eq!(parent_dir(Path::new("a/ext.crx")), Path::new("a"));
    }

    #[test]
    fn missing_file_maps_to_path_not_found() {
        let err = read(Path::new("/nonexistent/crx3-file")).unwrap_err();
        assert!(matches!(err, Crx3Error::PathNotFound(_)));
    }
}
