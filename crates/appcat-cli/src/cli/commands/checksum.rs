//! Checksum command: compute SHA-256 and size of a local file.

use anyhow::Result;
use appcat_core::checksum;
use std::path::Path;

/// Print SHA-256 and size of the given file, in the catalog's format.
pub fn run_checksum(path: &Path) -> Result<()> {
    let fp = checksum::sha256_path(path)?;
    println!("{}  {}  {}", fp.checksum, fp.size, path.display());
    Ok(())
}
