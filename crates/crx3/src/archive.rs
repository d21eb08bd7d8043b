//! Zip archive transform for the container payload.
//!
//! The engines treat the archive as opaque bytes; this module only turns a
//! directory into those bytes and back.

use std::fs;
use std::io;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipArchive;
use zip::ZipWriter;

use crate::error::Crx3Error;
use crate::error::Result;

/// Whether `path` names a zip archive by extension.
pub fn is_zip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Compress the contents of `dir` into an in-memory zip archive.
///
/// Entries are added in sorted order with paths relative to `dir`, so the same
/// tree always yields the same archive.
pub fn compress_dir(dir: &Path) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    add_dir(&mut writer, dir, "", options)?;
    let bytes = writer.finish()?.into_inner();
    debug!(dir = %dir.display(), bytes = bytes.len(), "compressed directory");
    Ok(bytes)
}

fn add_dir<W: Write + io::Seek>(
    writer: &mut ZipWriter<W>,
    dir: &Path,
    prefix: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            return Err(Crx3Error::UnsupportedFileFormat(format!(
                "non UTF-8 file name in {}",
                dir.display()
            )));
        };
        let entry_name = format!("{prefix}{name}");
        let path = entry.path();

        if fs::metadata(&path)?.is_dir() {
            writer.add_directory(format!("{entry_name}/"), options)?;
            add_dir(writer, &path, &format!("{entry_name}/"), options)?;
        } else {
            writer.start_file(entry_name, options)?;
            writer.write_all(&fs::read(&path)?)?;
        }
    }
    Ok(())
}

/// Extract a zip archive into `dest`, creating it if needed.
///
/// Entries whose names would escape `dest` are rejected.
pub fn extract(archive: &[u8], dest: &Path) -> Result<()> {
    let mut zip = ZipArchive::new(Cursor::new(archive))?;
    fs::create_dir_all(dest)?;

    for index in 0..zip.len() {
        let mut file = zip.by_index(index)?;
        let Some(relative) = file.enclosed_name() else {
            return Err(Crx3Error::UnsupportedFileFormat(format!("archive entry '{}' escapes the output", file.name())));
        };
        let target = dest.join(relative);

        if file.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&target)?;
        io::copy(&mut file, &mut out)?;

        #[cfg(unix)]
        if let Some(mode) = file.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode((mode & 0o777) | 0o600))?;
        }
    }
    debug!(dest = %dest.display(), entries = zip.len(), "extracted archive");
    Ok(())
}
