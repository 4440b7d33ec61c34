use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Default install root: `~/.gvmkit-build`.
pub fn default_install_root<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let home = runtime
        .home_dir()
        .context("Could not determine home directory")?;
    Ok(home.join(".gvmkit-build"))
}

/// Directory the extracted executable lives in.
pub fn bin_dir(install_root: &Path) -> PathBuf {
    install_root.join("bin")
}

/// Staging directory extraction lands in before being swapped into place.
pub fn staging_dir(install_root: &Path) -> PathBuf {
    install_root.join("bin.partial")
}

/// Path of the installed executable, with the platform's suffix.
pub fn binary_path(install_root: &Path, name: &str) -> PathBuf {
    bin_dir(install_root).join(format!("{}{}", name, std::env::consts::EXE_SUFFIX))
}
