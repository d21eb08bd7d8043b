//! `crx3 keygen` — generate a signing key pair.

use std::path::Path;

use crx3::identity;
use crx3::keys;
use crx3::Algorithm;
use crx3::PrivateKey;

pub fn run(output: &Path, algorithm: Algorithm, public: Option<&Path>) -> anyhow::Result<()> {
    // Don't overwrite existing keys
    if output.exists() {
        anyhow::bail!("key file already exists at {}. Remove it first or choose another path.", output.display());
    }

    let key = PrivateKey::generate(algorithm);
    keys::save_private_key(output, &key)?;
    if let Some(public_path) = public {
        keys::save_public_key(public_path, &key.public_key())?;
    }

    let public_key = key.public_key();
    println!("✓ Generated {algorithm} key pair");
    println!("  Private key: {}", output.display());
    if let Some(public_path) = public {
        println!("  Public key: {}", public_path.display());
    }
    println!("  Extension ID: {}", identity::extension_id_text(&identity::extension_id(&public_key)?));
    println!("  Identity: {}", identity::checksummed_identity(&public_key));
    println!();
    println!("  Keep your private key safe! Share only the identity.");
    println!("  Others can verify your extensions with:");
    println!("    crx3 unpack <file.crx> --key {}", identity::checksummed_identity(&public_key));

    Ok(())
}
