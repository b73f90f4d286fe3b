pub mod output;

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Read a source file as UTF-8 text.
pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write a configuration file, refusing to replace an existing one unless
/// `overwrite` is set.
pub fn write_config(path: &Path, contents: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
