//! Error types for packing and unpacking CRX3 containers.

use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Crx3Error> = std::result::Result<T, E>;

/// Errors from the container codec and the signing/verification engines.
#[derive(Debug, thiserror::Error)]
pub enum Crx3Error {
    /// The file extension is ambiguous or does not match what the operation expects.
    #[error("unknown file extension: {}", .0.display())]
    UnknownFileExtension(PathBuf),

    /// Magic mismatch, malformed header, or malformed identity record.
    #[error("unsupported file format: {0}")]
    UnsupportedFileFormat(String),

    /// The container declares a version other than the one this crate reads.
    #[error("unsupported container version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// An input path does not exist.
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The PEM file holds no private key this crate can decode.
    #[error("private key not found: {0}")]
    PrivateKeyNotFound(String),

    /// The PEM file or proof holds no public key this crate can decode.
    #[error("public key not found: {0}")]
    PublicKeyNotFound(String),

    /// A proof in the header was signed by a key other than the permitted one.
    #[error("public key not permitted: {0}")]
    PublicKeyNotPermitted(String),

    /// A proof's signature did not verify over the signed payload.
    #[error("the signature does not match")]
    SignatureDoesNotMatch,

    /// Packing would generate a key where one already exists.
    #[error("private key already exists at {}; sign with it via --pem instead", .0.display())]
    KeyExists(PathBuf),

    /// The output path exists but is not a directory.
    #[error("path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A checksummed identity string failed to parse.
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    /// The container exceeds the configured size limit.
    #[error("container is {size} bytes, larger than the {limit} byte limit")]
    ContainerTooLarge { size: u64, limit: u64 },

    /// A key could not be serialized to DER or PEM.
    #[error("key encoding failed: {0}")]
    KeyEncoding(String),

    /// The archive payload could not be written or read as a zip archive.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
