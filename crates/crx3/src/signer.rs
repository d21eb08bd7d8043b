//! Building signed CRX3 containers from archive bytes.

use tracing::debug;

use crate::container;
use crate::error::Result;
use crate::header::Header;
use crate::header::IdentityRecord;
use crate::header::KeyProof;
use crate::identity;
use crate::keys::PrivateKey;
use crate::payload;

/// Build the header for `archive` signed by `key`.
///
/// The identity record is derived from the key's extension ID and serialized
/// once; the same bytes are signed and embedded in the header.
pub fn sign_header(archive: &[u8], key: &PrivateKey) -> Result<Header> {
    let public_key = key.public_key();
    let public_key_der = public_key.to_der()?;
    let identity = IdentityRecord::new(identity::extension_id_from_der(&public_key_der));
    let signed_header_data = identity.to_bytes();

    let message = payload::signed_payload(&signed_header_data, archive)?;
    let signature = key.sign(&message);
    debug!(algorithm = %key.algorithm(), payload_len = message.len(), "signed archive");

    Ok(Header {
        proofs: vec![KeyProof { algorithm: key.algorithm(), public_key: public_key_der, signature }],
        signed_header_data,
    })
}

/// Sign `archive` with `key` and frame the result as container bytes.
pub fn sign_archive(archive: &[u8], key: &PrivateKey) -> Result<Vec<u8>> {
    let header = sign_header(archive, key)?;
    container::encode(&header.to_bytes(), archive)
}
