//! Bundle assembly: ordering, content, stamping and writing

pub mod assembler;
pub mod content;
pub mod stamp;

pub use assembler::{BundleAssembler, ReleaseBundle, SelectedFile};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{BundleError, Result};

/// Write a rendered bundle into the releases directory.
///
/// The directory must already exist. An existing bundle file is only
/// replaced when `overwrite` is set. The text is rendered in full before
/// the file is created.
pub fn write_bundle(bundle: &ReleaseBundle, releases_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    if !releases_dir.is_dir() {
        return Err(BundleError::config(format!(
            "Release path {} does not exist or is not a directory",
            releases_dir.display()
        )));
    }

    let path = releases_dir.join(bundle.file_name());
    if path.exists() && !overwrite {
        return Err(BundleError::config(format!(
            "Release bundle {} already exists; use --force to overwrite it",
            path.display()
        )));
    }

    let text = bundle.render();
    fs::write(&path, text)?;
    info!(path = %path.display(), "Wrote release bundle");

    Ok(path)
}
