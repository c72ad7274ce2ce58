//! Manifest utility for Dobby asset directories.
//!
//! Hashes every file in a model or reference data directory and writes
//! `manifest.json`, which the checker verifies at startup.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin hash_assets -- <dir> [<dir> ...]
//! ```

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use dobby::adapters::integrity::AssetManifest;

fn parse_args() -> Result<Vec<PathBuf>> {
    let dirs: Vec<PathBuf> = env::args().skip(1).map(PathBuf::from).collect();
    if dirs.is_empty() || dirs.iter().any(|d| d.as_os_str() == "-h" || d.as_os_str() == "--help") {
        bail!("Usage: hash_assets <dir> [<dir> ...]");
    }
    Ok(dirs)
}

fn main() -> Result<()> {
    for dir in parse_args()? {
        if !dir.is_dir() {
            bail!("{dir:?} is not a directory");
        }

        let manifest = AssetManifest::for_directory(&dir)
            .with_context(|| format!("Failed to hash files in {dir:?}"))?;
        if manifest.files.is_empty() {
            bail!("{dir:?} contains no files to hash");
        }

        let path = manifest
            .write_to(&dir)
            .with_context(|| format!("Failed to write manifest in {dir:?}"))?;

        println!("Wrote {path:?}");
        for (name, digest) in &manifest.files {
            println!("  {digest}  {name}");
        }
    }
    Ok(())
}
