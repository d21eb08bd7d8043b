//! The structured header carried inside a CRX3 container.
//!
//! The wire form is protobuf. Proofs are grouped by algorithm on the wire;
//! [`Header`] flattens them into one ordered list of [`KeyProof`]s (all
//! ECDSA proofs first, then Ed25519, each group in wire order). Fields this
//! crate does not model, such as RSA proofs written by other packers, are
//! skipped when decoding.

use prost::Message;

use crate::error::Crx3Error;
use crate::error::Result;
use crate::identity::EXTENSION_ID_LEN;
use crate::scheme::Algorithm;

/// Wire form of the container header.
#[derive(Clone, PartialEq, Message)]
struct CrxFileHeaderProto {
    #[prost(message, repeated, tag = "3")]
    sha256_with_ecdsa: Vec<AsymmetricKeyProofProto>,
    #[prost(message, repeated, tag = "5")]
    sha256_with_ed25519: Vec<AsymmetricKeyProofProto>,
    #[prost(bytes = "vec", tag = "10000")]
    signed_header_data: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
struct AsymmetricKeyProofProto {
    #[prost(bytes = "vec", tag = "1")]
    public_key: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    signature: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
struct SignedDataProto {
    #[prost(bytes = "vec", tag = "1")]
    crx_id: Vec<u8>,
}

/// One algorithm's public key and signature over the signed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyProof {
    pub algorithm: Algorithm,
    /// DER `SubjectPublicKeyInfo`.
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
}

/// Decoded container header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    pub proofs: Vec<KeyProof>,
    /// Serialized [`IdentityRecord`], kept verbatim so verification signs over
    /// exactly the bytes the signer produced.
    pub signed_header_data: Vec<u8>,
}

impl Header {
    pub fn to_bytes(&self) -> Vec<u8> {
        let proofs_for = |algorithm: Algorithm| -> Vec<AsymmetricKeyProofProto> {
            self.proofs
                .iter()
                .filter(|proof| proof.algorithm == algorithm)
                .map(|proof| AsymmetricKeyProofProto {
                    public_key: proof.public_key.clone(),
                    signature: proof.signature.clone(),
                })
                .collect()
        };
        CrxFileHeaderProto {
            sha256_with_ecdsa: proofs_for(Algorithm::EcdsaP256),
            sha256_with_ed25519: proofs_for(Algorithm::Ed25519),
            signed_header_data: self.signed_header_data.clone(),
        }
        .encode_to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let proto = CrxFileHeaderProto::decode(bytes)
            .map_err(|e| Crx3Error::UnsupportedFileFormat(format!("malformed header: {e}")))?;

        let tagged = |algorithm: Algorithm, proofs: Vec<AsymmetricKeyProofProto>| {
            proofs.into_iter().map(move |proof| KeyProof {
                algorithm,
                public_key: proof.public_key,
                signature: proof.signature,
            })
        };
        let proofs = tagged(Algorithm::EcdsaP256, proto.sha256_with_ecdsa)
            .chain(tagged(Algorithm::Ed25519, proto.sha256_with_ed25519))
            .collect();

        Ok(Header { proofs, signed_header_data: proto.signed_header_data })
    }

    /// Parse the embedded identity record.
    pub fn identity(&self) -> Result<IdentityRecord> {
        IdentityRecord::from_bytes(&self.signed_header_data)
    }
}

/// Identity record covered by every signature in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityRecord {
    pub crx_id: [u8; EXTENSION_ID_LEN],
}

impl IdentityRecord {
    pub fn new(crx_id: [u8; EXTENSION_ID_LEN]) -> Self {
        Self { crx_id }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        SignedDataProto { crx_id: self.crx_id.to_vec() }.encode_to_vec()
    }

    /// Parse a serialized record. Any ID length other than 16 is a format error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let proto = SignedDataProto::decode(bytes)
            .map_err(|e| Crx3Error::UnsupportedFileFormat(format!("malformed signed header data: {e}")))?;
        let crx_id = <[u8; EXTENSION_ID_LEN]>::try_from(proto.crx_id.as_slice()).map_err(|_| {
            Crx3Error::UnsupportedFileFormat(format!(
                "extension id is {} bytes, expected {EXTENSION_ID_LEN}",
                proto.crx_id.len()
            ))
        })?;
        Ok(Self { crx_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proof(algorithm: Algorithm, marker: u8) -> KeyProof {
        KeyProof { algorithm, public_key: vec![marker; 4], signature: vec![marker; 8] }
    }

    #[test]
    fn header_roundtrip_groups_by_algorithm() {
        let header = Header {
            proofs: vec![
                proof(Algorithm::Ed25519, 1),
                proof(Algorithm::EcdsaP256, 2),
                proof(Algorithm::Ed25519, 3),
            ],
            signed_header_data: IdentityRecord::new([9; 16]).to_bytes(),
        };

        let decoded = Header::from_bytes(&header.to_bytes()).unwrap();
        assert_eq!(decoded.signed_header_data, header.signed_header_data);
        let markers: Vec<u8> = decoded.proofs.iter().map(|p| p.public_key[0]).collect();
        assert_eq!(markers, vec![2, 1, 3]);
    }

    #[test]
    fn signed_header_data_is_preserved_byte_for_byte() {
        // Non-canonical encoding: crx_id field repeated; the last one wins on decode.
        let mut blob = IdentityRecord::new([1; 16]).to_bytes();
        blob.extend_from_slice(&IdentityRecord::new([2; 16]).to_bytes());
        let header = Header { proofs: vec![], signed_header_data: blob.clone() };

        let decoded = Header::from_bytes(&header.to_bytes()).unwrap();
        assert_eq!(decoded.signed_header_data, blob);
        assert_eq!(decoded.identity().unwrap().crx_id, [2; 16]);
    }

    #[test]
    fn unknown_rsa_proofs_are_skipped() {
        #[derive(Clone, PartialEq, Message)]
        struct WithRsa {
            #[prost(message, repeated, tag = "2")]
            sha256_with_rsa: Vec<AsymmetricKeyProofProto>,
            #[prost(bytes = "vec", tag = "10000")]
            signed_header_data: Vec<u8>,
        }
        let bytes = WithRsa {
            sha256_with_rsa: vec![AsymmetricKeyProofProto { public_key: vec![1], signature: vec![2] }],
            signed_header_data: IdentityRecord::new([0; 16]).to_bytes(),
        }
        .encode_to_vec();

        let header = Header::from_bytes(&bytes).unwrap();
        assert!(header.proofs.is_empty());
        assert!(header.identity().is_ok());
    }

    #[test]
    fn identity_record_rejects_wrong_length() {
        for len in [0usize, 15, 17, 32] {
            let blob = SignedDataProto { crx_id: vec![0; len] }.encode_to_vec();
            let err = IdentityRecord::from_bytes(&blob).unwrap_err();
            assert!(matches!(err, Crx3Error::UnsupportedFileFormat(_)), "len {len}");
        }
    }

    #[test]
    fn garbage_header_is_unsupported_format() {
        let err = Header::from_bytes(&[0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, Crx3Error::UnsupportedFileFormat(_)));
    }
}
