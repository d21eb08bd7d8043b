//! Signature algorithms that may appear as key proofs in a CRX3 header.
//!
//! Each algorithm implements [`SignatureScheme`] once. The key enums in
//! [`crate::keys`] dispatch to these implementations by [`Algorithm`], so a
//! single header can carry proofs for both algorithms side by side.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::Signer as _;
use ed25519_dalek::Verifier as _;
use pkcs8::DecodePublicKey;
use pkcs8::EncodePublicKey;

use crate::error::Crx3Error;
use crate::error::Result;

/// Algorithm tag of a key proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// Ed25519 over the signed payload.
    #[default]
    Ed25519,
    /// ECDSA on NIST P-256 with SHA-256, DER-encoded signatures.
    EcdsaP256,
}

impl Algorithm {
    /// Short lowercase name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Ed25519 => "ed25519",
            Algorithm::EcdsaP256 => "ecdsa",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ed25519" => Ok(Algorithm::Ed25519),
            "ecdsa" | "p256" | "ecdsa-p256" => Ok(Algorithm::EcdsaP256),
            other => Err(format!("unknown algorithm '{other}' (expected ed25519 or ecdsa)")),
        }
    }
}

/// Capabilities one signature algorithm provides to the engines.
pub trait SignatureScheme {
    /// Tag written into the header for proofs made with this scheme.
    const ALGORITHM: Algorithm;

    type SigningKey;
    type VerifyingKey;

    /// Public half of a signing key.
    fn verifying_key(key: &Self::SigningKey) -> Self::VerifyingKey;

    /// Sign `message`, returning the signature bytes as stored in a proof.
    fn sign(key: &Self::SigningKey, message: &[u8]) -> Vec<u8>;

    /// Verify `signature` over `message`.
    ///
    /// Malformed signature bytes are reported the same way as a mismatch.
    fn verify(key: &Self::VerifyingKey, message: &[u8], signature: &[u8]) -> Result<()>;

    /// Canonical DER `SubjectPublicKeyInfo` encoding of the public key.
    fn encode_public_key(key: &Self::VerifyingKey) -> Result<Vec<u8>>;

    /// Parse a DER `SubjectPublicKeyInfo` produced by [`Self::encode_public_key`].
    fn decode_public_key(der: &[u8]) -> Result<Self::VerifyingKey>;

    /// Raw public point bytes used for the checksummed identity.
    fn raw_public_key(key: &Self::VerifyingKey) -> Vec<u8>;
}

/// Ed25519 (RFC 8032).
pub struct Ed25519;

impl SignatureScheme for Ed25519 {
    const ALGORITHM: Algorithm = Algorithm::Ed25519;

    type SigningKey = ed25519_dalek::SigningKey;
    type VerifyingKey = ed25519_dalek::VerifyingKey;

    fn verifying_key(key: &Self::SigningKey) -> Self::VerifyingKey {
        key.verifying_key()
    }

    fn sign(key: &Self::SigningKey, message: &[u8]) -> Vec<u8> {
        key.sign(message).to_bytes().to_vec()
    }

    fn verify(key: &Self::VerifyingKey, message: &[u8], signature: &[u8]) -> Result<()> {
        let signature =
            ed25519_dalek::Signature::from_slice(signature).map_err(|_| Crx3Error::SignatureDoesNotMatch)?;
        key.verify(message, &signature).map_err(|_| Crx3Error::SignatureDoesNotMatch)
    }

    fn encode_public_key(key: &Self::VerifyingKey) -> Result<Vec<u8>> {
        let doc = key.to_public_key_der().map_err(|e| Crx3Error::KeyEncoding(e.to_string()))?;
        Ok(doc.as_bytes().to_vec())
    }

    fn decode_public_key(der: &[u8]) -> Result<Self::VerifyingKey> {
        ed25519_dalek::VerifyingKey::from_public_key_der(der)
            .map_err(|e| Crx3Error::PublicKeyNotFound(format!("ed25519: {e}")))
    }

    fn raw_public_key(key: &Self::VerifyingKey) -> Vec<u8> {
        key.to_bytes().to_vec()
    }
}

/// ECDSA over P-256 with SHA-256.
pub struct EcdsaP256;

impl SignatureScheme for EcdsaP256 {
    const ALGORITHM: Algorithm = Algorithm::EcdsaP256;

    type SigningKey = p256::ecdsa::SigningKey;
    type VerifyingKey = p256::ecdsa::VerifyingKey;

    fn verifying_key(key: &Self::SigningKey) -> Self::VerifyingKey {
        *key.verifying_key()
    }

    fn sign(key: &Self::SigningKey, message: &[u8]) -> Vec<u8> {
        let signature: p256::ecdsa::Signature = key.sign(message);
        signature.to_der().as_bytes().to_vec()
    }

    fn verify(key: &Self::VerifyingKey, message: &[u8], signature: &[u8]) -> Result<()> {
        let signature = p256::ecdsa::Signature::from_der(signature).map_err(|_| Crx3Error::SignatureDoesNotMatch)?;
        key.verify(message, &signature).map_err(|_| Crx3Error::SignatureDoesNotMatch)
    }

    fn encode_public_key(key: &Self::VerifyingKey) -> Result<Vec<u8>> {
        let doc = key.to_public_key_der().map_err(|e| Crx3Error::KeyEncoding(e.to_string()))?;
        Ok(doc.as_bytes().to_vec())
    }

    fn decode_public_key(der: &[u8]) -> Result<Self::VerifyingKey> {
        p256::ecdsa::VerifyingKey::from_public_key_der(der)
            .map_err(|e| Crx3Error::PublicKeyNotFound(format!("ecdsa-p256: {e}")))
    }

    fn raw_public_key(key: &Self::VerifyingKey) -> Vec<u8> {
        key.to_encoded_point(false).as_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_verify<S: SignatureScheme>(key: &S::SigningKey) {
        let public = S::verifying_key(key);
        let sig = S::sign(key, b"payload");
        S::verify(&public, b"payload", &sig).unwrap();

        let err = S::verify(&public, b"payloae", &sig).unwrap_err();
        assert!(matches!(err, Crx3Error::SignatureDoesNotMatch));

        let der = S::encode_public_key(&public).unwrap();
        let decoded = S::decode_public_key(&der).unwrap();
        assert_eq!(S::raw_public_key(&decoded), S::raw_public_key(&public));
    }

    #[test]
    fn ed25519_sign_verify() {
        sign_verify::<Ed25519>(&ed25519_dalek::SigningKey::generate(&mut rand_core::OsRng));
    }

    #[test]
    fn ecdsa_sign_verify() {
        sign_verify::<EcdsaP256>(&p256::ecdsa::SigningKey::random(&mut rand_core::OsRng));
    }

    #[test]
    fn raw_public_key_lengths() {
        let ed = ed25519_dalek::SigningKey::generate(&mut rand_core::OsRng);
        assert_eq!(Ed25519::raw_public_key(&Ed25519::verifying_key(&ed)).len(), 32);

        let ec = p256::ecdsa::SigningKey::random(&mut rand_core::OsRng);
        let raw = EcdsaP256::raw_public_key(&EcdsaP256::verifying_key(&ec));
        assert_eq!(raw.len(), 65);
        assert_eq!(raw[0], 0x04, "uncompressed SEC1 point");
    }

    #[test]
    fn garbage_signature_is_a_mismatch() {
        let key = ed25519_dalek::SigningKey::generate(&mut rand_core::OsRng);
        let err = Ed25519::verify(&key.verifying_key(), b"m", &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, Crx3Error::SignatureDoesNotMatch));

        let key = p256::ecdsa::SigningKey::random(&mut rand_core::OsRng);
        let err = EcdsaP256::verify(key.verifying_key(), b"m", &[0x30, 0x00]).unwrap_err();
        assert!(matches!(err, Crx3Error::SignatureDoesNotMatch));
    }

    #[test]
    fn algorithm_parses_cli_names() {
        assert_eq!("ed25519".parse::<Algorithm>().unwrap(), Algorithm::Ed25519);
        assert_eq!("ECDSA".parse::<Algorithm>().unwrap(), Algorithm::EcdsaP256);
        assert!("rsa".parse::<Algorithm>().is_err());
        assert_eq!(Algorithm::default(), Algorithm::Ed25519);
    }
}
