//! `crx3 pack` — pack and sign an extension.

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use crx3::keys;
use crx3::pack::PackOptions;
use crx3::Algorithm;

pub fn run(path: &Path, pem: Option<&Path>, outfile: Option<PathBuf>, algorithm: Algorithm) -> anyhow::Result<()> {
    let private_key = pem
        .map(|pem| keys::load_private_key(pem).with_context(|| format!("loading {}", pem.display())))
        .transpose()?;
    if let Some(key) = &private_key {
        println!("Signing with {}", crx3::identity::checksummed_identity(&key.public_key()));
    }

    let outcome = crx3::pack::pack(path, PackOptions { outfile, private_key, algorithm })?;

    println!("✓ Packed {}", outcome.crx_path.display());
    println!("  Extension ID: {}", outcome.extension_id);
    if let Some(key_path) = &outcome.generated_key {
        println!("  Generated key: {}", key_path.display());
        println!("  Identity: {}", outcome.identity);
        println!();
        println!("  Keep the key safe; reuse it with --pem to keep the same extension ID.");
    }
    Ok(())
}
