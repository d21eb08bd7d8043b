//! Pack, sign, verify and unpack CRX3 browser extension containers.
//!
//! A container frames a protobuf header and a zip archive:
//!
//! ```text
//! "Cr24" | version=3 (u32 LE) | header_len (u32 LE) | header | zip archive
//! ```
//!
//! The header holds one or more key proofs (Ed25519 or ECDSA P-256) and a
//! serialized identity record carrying the 16-byte extension ID. Every proof
//! signs `"CRX3 SignedData\0" || u32_le(len(record)) || record || archive`.
//!
//! # Signing and verifying
//!
//! ```
//! use crx3::identity::{checksummed_identity, PermittedKey};
//! use crx3::{signer, verifier, Algorithm, PrivateKey};
//!
//! let key = PrivateKey::generate(Algorithm::Ed25519);
//! let crx = signer::sign_archive(b"zip bytes", &key).unwrap();
//!
//! let permitted = PermittedKey::Identity(checksummed_identity(&key.public_key()));
//! let verified = verifier::verify_container(&crx, Some(&permitted)).unwrap();
//! assert_eq!(verified.archive, b"zip bytes");
//! ```
//!
//! # Files
//!
//! [`pack::pack`] and [`unpack::unpack`] wrap the engines with filesystem
//! handling: directory compression, key generation and storage, and
//! all-or-nothing output.

pub mod archive;
pub mod container;
pub mod error;
mod fsutil;
pub mod header;
pub mod id;
pub mod identity;
pub mod keys;
pub mod pack;
pub mod payload;
pub mod scheme;
pub mod signer;
pub mod unpack;
pub mod verifier;

pub use error::Crx3Error;
pub use error::Result;
pub use keys::PrivateKey;
pub use keys::PublicKey;
pub use scheme::Algorithm;
