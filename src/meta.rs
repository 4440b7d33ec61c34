//! Bundled package metadata and download URL construction.
//!
//! The metadata (package name, version, repository URL) ships inside the
//! crate as `metadata.json` and is treated as static input, the same way a
//! package manager would read its manifest. The release tag is fixed per
//! published version of this bootstrap.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::platform::PlatformDescriptor;

/// Release tag the prebuilt binaries are published under.
pub const RELEASE_TAG: &str = "v0.3.17";

const BUNDLED_METADATA: &str = include_str!("../metadata.json");

/// Repository pointer inside the bundled metadata.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Repository {
    pub url: String,
}

/// Bundled package metadata: name, version, and the repository releases are
/// published under.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Meta {
    pub name: String,
    pub version: String,
    pub repository: Repository,
}

impl Meta {
    /// Parse the metadata bundled into the binary at compile time.
    pub fn bundled() -> Result<Self> {
        serde_json::from_str(BUNDLED_METADATA).context("Failed to parse bundled metadata")
    }

    /// Build the release archive URL for a target. Pure string formatting:
    /// `<repo>/releases/download/<tag>/<name>-<triple>.<ext>`.
    pub fn download_url(&self, descriptor: &PlatformDescriptor) -> String {
        self.download_url_from(&self.repository.url, descriptor)
    }

    /// Same as [`download_url`](Self::download_url) with an explicit base URL,
    /// used when the repository location is overridden.
    pub fn download_url_from(&self, base_url: &str, descriptor: &PlatformDescriptor) -> String {
        format!(
            "{}/releases/download/{}/{}-{}.{}",
            base_url.trim_end_matches('/'),
            RELEASE_TAG,
            self.name,
            descriptor.target_triple,
            descriptor.archive_format.extension()
        )
    }
}
