//! Packing a directory or zip archive into a signed container on disk.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::info;
use tracing::warn;

use crate::archive;
use crate::container;
use crate::error::Crx3Error;
use crate::error::Result;
use crate::fsutil;
use crate::identity;
use crate::keys;
use crate::keys::PrivateKey;
use crate::scheme::Algorithm;
use crate::signer;

/// File extension of private keys written next to generated containers.
pub const PEM_EXTENSION: &str = "pem";

/// Options for [`pack`].
#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    /// Destination container; must end in `.crx`. Defaults to the source path
    /// with its `.zip` extension replaced, or a directory name plus `.crx`.
    pub outfile: Option<PathBuf>,
    /// Signing key. When absent a key is generated and saved beside the container.
    pub private_key: Option<PrivateKey>,
    /// Algorithm for a generated key.
    pub algorithm: Algorithm,
}

/// What [`pack`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackOutcome {
    pub crx_path: PathBuf,
    /// Path of the generated private key, if one was generated.
    pub generated_key: Option<PathBuf>,
    /// Checksummed identity of the signer.
    pub identity: String,
    /// Browser-style extension ID.
    pub extension_id: String,
}

/// Pack `src`, a directory or `.zip` file, into a signed container.
pub fn pack(src: &Path, options: PackOptions) -> Result<PackOutcome> {
    if let Some(outfile) = &options.outfile {
        if !container::has_crx_extension(outfile) {
            return Err(Crx3Error::UnknownFileExtension(outfile.clone()));
        }
    }

    let archive = read_archive(src)?;
    let crx_path = match options.outfile {
        Some(outfile) => outfile,
        None => default_crx_path(src)?,
    };

    let (key, key_path) = match options.private_key {
        Some(key) => (key, None),
        None => {
            let key_path = crx_path.with_extension(PEM_EXTENSION);
            if key_path.exists() {
                return Err(Crx3Error::KeyExists(key_path));
            }
            (PrivateKey::generate(options.algorithm), Some(key_path))
        }
    };
    let public_key = key.public_key();

    let bytes = signer::sign_archive(&archive, &key)?;
    fsutil::write_atomic(&crx_path, &bytes, fsutil::PUBLIC_FILE_MODE)?;

    if let Some(key_path) = &key_path {
        if let Err(err) = keys::save_private_key(key_path, &key) {
            // A generated container is only kept together with its key.
            if let Err(cleanup) = fs::remove_file(&crx_path) {
                warn!(crx = %crx_path.display(), error = %cleanup, "failed to remove container after key save failed");
            }
            return Err(err);
        }
    }
    let generated_key = key_path;

    let outcome = PackOutcome {
        crx_path,
        generated_key,
        identity: identity::checksummed_identity(&public_key),
        extension_id: identity::extension_id_text(&identity::extension_id(&public_key)?),
    };
    info!(
        crx = %outcome.crx_path.display(),
        algorithm = %key.algorithm(),
        extension_id = %outcome.extension_id,
        bytes = bytes.len(),
        "packed extension"
    );
    Ok(outcome)
}

/// Read the archive bytes for `src`: compress a directory, or read a `.zip` as-is.
fn read_archive(src: &Path) -> Result<Vec<u8>> {
    let metadata = fs::metadata(src).map_err(|e| fsutil::not_found_or_io(src, e))?;
    if metadata.is_dir() {
        archive::compress_dir(src)
    } else if archive::is_zip(src) {
        fsutil::read(src)
    } else {
        Err(Crx3Error::UnknownFileExtension(src.to_path_buf()))
    }
}

fn default_crx_path(src: &Path) -> Result<PathBuf> {
    let src = match src.file_name() {
        Some(_) => src.to_path_buf(),
        None => src.canonicalize()?,
    };
    if archive::is_zip(&src) {
        return Ok(src.with_extension(container::FILE_EXTENSION));
    }
    let Some(name) = src.file_name() else {
        return Err(Crx3Error::UnknownFileExtension(src));
    };
    let mut name = name.to_os_string();
    name.push(".");
    name.push(container::FILE_EXTENSION);
    Ok(src.with_file_name(name))
}
