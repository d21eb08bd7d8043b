//! Identity values derived from public keys.
//!
//! Two distinct identities exist:
//!
//! - the **extension ID**: `SHA-256(DER public key)[..16]`, embedded in the header
//!   and rendered Chrome-style as 32 letters in `a..=p`;
//! - the **checksummed identity**: `BASE32_NOPAD(raw_key || SHA-512/256(raw_key)[28..])`,
//!   the string users share to pin a signer when unpacking.

use data_encoding::BASE32_NOPAD;
use sha2::Digest;
use sha2::Sha256;
use sha2::Sha512_256;

use crate::error::Crx3Error;
use crate::error::Result;
use crate::keys::PublicKey;

/// Length of an extension ID in bytes.
pub const EXTENSION_ID_LEN: usize = 16;

/// Length of the checksum suffix of a checksummed identity.
pub const CHECKSUM_LEN: usize = 4;

/// Extension ID of a public key.
pub fn extension_id(key: &PublicKey) -> Result<[u8; EXTENSION_ID_LEN]> {
    Ok(extension_id_from_der(&key.to_der()?))
}

/// Extension ID over already-encoded DER public key bytes.
pub fn extension_id_from_der(der: &[u8]) -> [u8; EXTENSION_ID_LEN] {
    let digest = Sha256::digest(der);
    let mut id = [0u8; EXTENSION_ID_LEN];
    id.copy_from_slice(&digest[..EXTENSION_ID_LEN]);
    id
}

/// Render an extension ID the way browsers display it: each hex digit mapped to `a..=p`.
pub fn extension_id_text(id: &[u8]) -> String {
    hex::encode(id)
        .chars()
        .map(|c| {
            let nibble = c.to_digit(16).unwrap_or(0) as u8;
            char::from(b'a' + nibble)
        })
        .collect()
}

/// Checksummed, base-32 identity of a public key.
pub fn checksummed_identity(key: &PublicKey) -> String {
    checksummed_identity_from_raw(&key.raw_bytes())
}

/// Checksummed identity over raw public key bytes.
pub fn checksummed_identity_from_raw(raw: &[u8]) -> String {
    let mut data = Vec::with_capacity(raw.len() + CHECKSUM_LEN);
    data.extend_from_slice(raw);
    data.extend_from_slice(&checksum(raw));
    BASE32_NOPAD.encode(&data)
}

fn checksum(raw: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha512_256::digest(raw);
    let mut sum = [0u8; CHECKSUM_LEN];
    sum.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
    sum
}

/// Validate a checksummed identity string and return its canonical form.
///
/// Surrounding whitespace and lowercase letters are tolerated.
pub fn parse_checksummed_identity(text: &str) -> Result<String> {
    let canonical = text.trim().to_ascii_uppercase();
    let data = BASE32_NOPAD
        .decode(canonical.as_bytes())
        .map_err(|e| Crx3Error::InvalidIdentity(format!("not base32: {e}")))?;
    if data.len() <= CHECKSUM_LEN {
        return Err(Crx3Error::InvalidIdentity(format!("{} bytes is too short", data.len())));
    }

    let (raw, sum) = data.split_at(data.len() - CHECKSUM_LEN);
    if checksum(raw) != sum {
        return Err(Crx3Error::InvalidIdentity("checksum mismatch".into()));
    }
    Ok(canonical)
}

/// The signer a caller is willing to accept when unpacking.
#[derive(Debug, Clone)]
pub enum PermittedKey {
    /// A checksummed identity string, e.g. from `--key`.
    Identity(String),
    /// A public key, e.g. loaded from a PEM file.
    PublicKey(PublicKey),
}

impl PermittedKey {
    /// Canonical checksummed identity both forms are compared as.
    pub fn canonical_identity(&self) -> Result<String> {
        match self {
            PermittedKey::Identity(text) => parse_checksummed_identity(text),
            PermittedKey::PublicKey(key) => Ok(checksummed_identity(key)),
        }
    }
}

impl From<PublicKey> for PermittedKey {
    fn from(key: PublicKey) -> Self {
        PermittedKey::PublicKey(key)
    }
}
