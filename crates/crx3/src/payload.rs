//! The exact byte sequence key proofs sign.
//!
//! ```text
//! SIGNED_DATA_PREFIX || u32_le(len(signed_header_data)) || signed_header_data || archive
//! ```
//!
//! Signing and verification both go through this module so the two paths can
//! never disagree on layout.

use std::io;
use std::io::Read;
use std::io::Write;

/// Domain separator prefixed to every signed payload.
pub const SIGNED_DATA_PREFIX: &[u8; 16] = b"CRX3 SignedData\x00";

/// Stream the signed payload into `out`, reading the archive from `archive`.
///
/// Returns the number of archive bytes copied.
pub fn write_signed_payload<W, R>(out: &mut W, signed_header_data: &[u8], archive: &mut R) -> io::Result<u64>
where
    W: Write + ?Sized,
    R: Read + ?Sized,
{
    let len = u32::try_from(signed_header_data.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "signed header data exceeds u32::MAX bytes"))?;
    out.write_all(SIGNED_DATA_PREFIX)?;
    out.write_all(&len.to_le_bytes())?;
    out.write_all(signed_header_data)?;
    io::copy(archive, out)
}

/// Build the signed payload in memory.
pub fn signed_payload(signed_header_data: &[u8], mut archive: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(SIGNED_DATA_PREFIX.len() + 4 + signed_header_data.len() + archive.len());
    write_signed_payload(&mut out, signed_header_data, &mut archive)?;
    Ok(out)
}
