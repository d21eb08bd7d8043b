//! Verifying and extracting a container from disk.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;

use crate::archive;
use crate::container;
use crate::error::Crx3Error;
use crate::error::Result;
use crate::fsutil;
use crate::identity;
use crate::identity::PermittedKey;
use crate::verifier;

/// Containers larger than this are refused unless the limit is raised.
pub const DEFAULT_MAX_CONTAINER_SIZE: u64 = 256 * 1024 * 1024;

/// Options for [`unpack`].
#[derive(Debug, Clone)]
pub struct UnpackOptions {
    /// Existing directory to extract into. Defaults to the container's directory.
    pub out_dir: Option<PathBuf>,
    /// Signer to require. Without one the container is extracted unauthenticated.
    pub permitted: Option<PermittedKey>,
    /// Upper bound on the container file size in bytes.
    pub max_container_size: u64,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self { out_dir: None, permitted: None, max_container_size: DEFAULT_MAX_CONTAINER_SIZE }
    }
}

/// What [`unpack`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackOutcome {
    /// Directory the archive was extracted to.
    pub path: PathBuf,
    /// Browser-style extension ID from the header.
    pub extension_id: String,
    /// Whether the proofs were checked against a permitted key.
    pub authenticated: bool,
}

/// Verify `crx` and extract its archive.
///
/// The archive lands in a directory named after the container's stem, either
/// beside the container or inside `out_dir`, replacing any existing directory
/// of that name. Nothing is extracted unless every check passes.
pub fn unpack(crx: &Path, options: &UnpackOptions) -> Result<UnpackOutcome> {
    if let Some(out_dir) = &options.out_dir {
        let metadata = fs::metadata(out_dir).map_err(|e| fsutil::not_found_or_io(out_dir, e))?;
        if !metadata.is_dir() {
            return Err(Crx3Error::NotADirectory(out_dir.clone()));
        }
    }
    if !container::has_crx_extension(crx) {
        return Err(Crx3Error::UnsupportedFileFormat(format!("{} is not a .crx file", crx.display())));
    }

    let bytes = read_container(crx, options.max_container_size)?;
    let verified = verifier::verify_container(&bytes, options.permitted.as_ref())?;

    let target = extraction_target(crx, options.out_dir.as_deref())?;
    extract_atomically(verified.archive, &target)?;

    let outcome = UnpackOutcome {
        path: target,
        extension_id: identity::extension_id_text(&verified.identity.crx_id),
        authenticated: verified.authenticated,
    };
    info!(
        crx = %crx.display(),
        out = %outcome.path.display(),
        authenticated = outcome.authenticated,
        "unpacked extension"
    );
    Ok(outcome)
}

/// Read a whole container file, refusing files above `limit` bytes.
pub fn read_container(path: &Path, limit: u64) -> Result<Vec<u8>> {
    let size = fs::metadata(path).map_err(|e| fsutil::not_found_or_io(path, e))?.len();
    if size > limit {
        return Err(Crx3Error::ContainerTooLarge { size, limit });
    }
    fsutil::read(path)
}

fn extraction_target(crx: &Path, out_dir: Option<&Path>) -> Result<PathBuf> {
    let Some(stem) = crx.file_stem() else {
        return Err(Crx3Error::UnsupportedFileFormat(format!("{} has no file name", crx.display())));
    };
    Ok(match out_dir {
        Some(out_dir) => out_dir.join(stem),
        None => crx.with_file_name(stem),
    })
}

/// Extract into a staging directory beside `target`, then swap it into place.
///
/// An existing target directory is replaced as a whole; if the swap fails the
/// previous directory is restored.
fn extract_atomically(archive_bytes: &[u8], target: &Path) -> Result<()> {
    if target.exists() && !target.is_dir() {
        return Err(Crx3Error::NotADirectory(target.to_path_buf()));
    }

    let parent = fsutil::parent_dir(target);
    let staging = tempfile::Builder::new().prefix(".crx3-unpack-").tempdir_in(parent)?;
    archive::extract(archive_bytes, staging.path())?;

    if !target.exists() {
        fs::rename(staging.path(), target)?;
        return Ok(());
    }

    // Dropping `aside` removes the previous contents once the swap succeeded.
    let aside = tempfile::Builder::new().prefix(".crx3-previous-").tempdir_in(parent)?;
    let previous = aside.path().join("previous");
    fs::rename(target, &previous)?;
    if let Err(err) = fs::rename(staging.path(), target) {
        fs::rename(&previous, target)?;
        return Err(err.into());
    }
    debug!(target = %target.display(), "replaced existing directory");
    Ok(())
}
