//! Container verification.

use tracing::debug;

use crate::container;
use crate::error::Crx3Error;
use crate::error::Result;
use crate::header::Header;
use crate::header::IdentityRecord;
use crate::identity;
use crate::identity::PermittedKey;
use crate::keys::PublicKey;
use crate::payload;

/// A container whose frame and header parsed, and whose proofs verified when a
/// permitted key was given.
#[derive(Debug)]
pub struct Verified<'a> {
    pub header: Header,
    pub identity: IdentityRecord,
    pub archive: &'a [u8],
    /// Whether the proofs were checked against a permitted key.
    pub authenticated: bool,
}

/// Parse and, if `permitted` is given, authenticate container bytes.
///
/// Steps, stopping at the first failure:
/// 1. Decode the frame and the header
/// 2. Parse the identity record (ID must be 16 bytes)
/// 3. Normalize the permitted key to a checksummed identity
/// 4. For each proof: compare its signer identity, then verify its signature
///    over the payload rebuilt from the header's own identity bytes
///
/// Without a permitted key the proofs are not examined.
pub fn verify_container<'a>(bytes: &'a [u8], permitted: Option<&PermittedKey>) -> Result<Verified<'a>> {
    let frame = container::decode(bytes)?;
    let header = Header::from_bytes(frame.header)?;
    let identity = header.identity()?;

    let Some(permitted) = permitted else {
        debug!("no permitted key given, skipping signature checks");
        return Ok(Verified { header, identity, archive: frame.archive, authenticated: false });
    };
    let permitted_identity = permitted.canonical_identity()?;

    if header.proofs.is_empty() {
        return Err(Crx3Error::PublicKeyNotPermitted("header carries no Ed25519 or ECDSA proofs".into()));
    }

    for (index, proof) in header.proofs.iter().enumerate() {
        let signer = PublicKey::from_der(proof.algorithm, &proof.public_key)?;
        let signer_identity = identity::checksummed_identity(&signer);
        debug!(index, algorithm = %proof.algorithm, signer = %signer_identity, "checking proof");

        if signer_identity != permitted_identity {
            return Err(Crx3Error::PublicKeyNotPermitted(signer_identity));
        }

        let message = payload::signed_payload(&header.signed_header_data, frame.archive)?;
        signer.verify(&message, &proof.signature)?;
    }

    Ok(Verified { header, identity, archive: frame.archive, authenticated: true })
}
