//! Extension ID lookup for containers and key files.

use std::path::Path;

use crate::container;
use crate::error::Crx3Error;
use crate::error::Result;
use crate::header::Header;
use crate::identity;
use crate::keys;
use crate::pack::PEM_EXTENSION;
use crate::unpack;

/// Browser-style extension ID of `path`.
///
/// For a `.crx` file the ID is read from the header's identity record; for a
/// `.pem` key file it is derived from the (public half of the) key.
pub fn extension_id_of(path: &Path) -> Result<String> {
    if container::has_crx_extension(path) {
        let bytes = unpack::read_container(path, unpack::DEFAULT_MAX_CONTAINER_SIZE)?;
        let frame = container::decode(&bytes)?;
        let record = Header::from_bytes(frame.header)?.identity()?;
        return Ok(identity::extension_id_text(&record.crx_id));
    }
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(PEM_EXTENSION)) {
        let key = keys::load_public_key(path)?;
        return Ok(identity::extension_id_text(&identity::extension_id(&key)?));
    }
    Err(Crx3Error::UnknownFileExtension(path.to_path_buf()))
}
