//! `crx3 id` — print an extension ID.

use std::path::Path;

pub fn run(infile: &Path) -> anyhow::Result<()> {
    let id = crx3::id::extension_id_of(infile)?;
    println!("{id}");
    Ok(())
}
