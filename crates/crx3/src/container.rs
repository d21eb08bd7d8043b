//! Binary framing of a CRX3 file.
//!
//! ```text
//! magic "Cr24" | version u32 LE | header_len u32 LE | header | archive
//! ```

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::Crx3Error;
use crate::error::Result;

/// File magic.
pub const MAGIC: &[u8; 4] = b"Cr24";

/// The only container version this crate reads or writes.
pub const VERSION: u32 = 3;

/// Size of the fixed prefix: magic, version, header length.
pub const PREFIX_LEN: usize = 12;

/// File extension of containers.
pub const FILE_EXTENSION: &str = "crx";

/// Whether `path` names a container by extension.
pub fn has_crx_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(FILE_EXTENSION))
}

/// Borrowed view of a decoded container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container<'a> {
    pub header: &'a [u8],
    pub archive: &'a [u8],
}

/// Frame `header` and `archive` into `out`.
pub fn write<W: Write + ?Sized>(out: &mut W, header: &[u8], archive: &[u8]) -> Result<()> {
    let header_len = u32::try_from(header.len())
        .map_err(|_| Crx3Error::UnsupportedFileFormat(format!("header of {} bytes is too large", header.len())))?;
    out.write_all(MAGIC)?;
    out.write_all(&VERSION.to_le_bytes())?;
    out.write_all(&header_len.to_le_bytes())?;
    out.write_all(header)?;
    out.write_all(archive)?;
    Ok(())
}

/// Frame `header` and `archive` into a new buffer.
pub fn encode(header: &[u8], archive: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(PREFIX_LEN + header.len() + archive.len());
    write(&mut out, header, archive)?;
    Ok(out)
}

/// Split a container into its header and archive sections.
///
/// The declared header length must fit inside `bytes`; everything after the
/// header is the archive.
pub fn decode(bytes: &[u8]) -> Result<Container<'_>> {
    if bytes.len() < PREFIX_LEN {
        return Err(Crx3Error::UnsupportedFileFormat(format!(
            "{} bytes is shorter than the {PREFIX_LEN} byte prefix",
            bytes.len()
        )));
    }
    if &bytes[..4] != MAGIC {
        return Err(Crx3Error::UnsupportedFileFormat("bad magic, not a CRX file".into()));
    }

    let version = read_u32_le(&bytes[4..8]);
    if version != VERSION {
        return Err(Crx3Error::UnsupportedVersion { found: version, expected: VERSION });
    }

    let header_len = read_u32_le(&bytes[8..12]) as usize;
    let rest = &bytes[PREFIX_LEN..];
    if rest.len() < header_len {
        return Err(Crx3Error::UnsupportedFileFormat(format!(
            "header length {header_len} exceeds the {} bytes available",
            rest.len()
        )));
    }
    let (header, archive) = rest.split_at(header_len);
    debug!(header_len, archive_len = archive.len(), "decoded container frame");

    Ok(Container { header, archive })
}

fn read_u32_le(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}
