//! `crx3 unpack` — verify and extract a container.

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use crx3::identity::PermittedKey;
use crx3::keys;
use crx3::unpack::UnpackOptions;

pub fn run(
    infile: &Path,
    key: Option<&str>,
    pem: Option<&Path>,
    out: Option<PathBuf>,
    max_size: u64,
) -> anyhow::Result<()> {
    let permitted = match (key, pem) {
        (Some(identity), _) => Some(PermittedKey::Identity(identity.to_string())),
        (None, Some(pem)) => {
            let public = keys::load_public_key(pem).with_context(|| format!("loading {}", pem.display()))?;
            Some(PermittedKey::PublicKey(public))
        }
        (None, None) => None,
    };

    let options = UnpackOptions { out_dir: out, permitted, max_container_size: max_size };
    let outcome = crx3::unpack::unpack(infile, &options)?;

    if outcome.authenticated {
        println!("✓ Signature valid");
    } else {
        println!("! No key given, signature not checked");
    }
    println!("  Extension ID: {}", outcome.extension_id);
    println!("  Unpacked to {}", outcome.path.display());
    Ok(())
}
