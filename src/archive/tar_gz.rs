use crate::runtime::Runtime;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::debug;
use std::path::Path;
use tar::EntryType;

use super::Extractor;

/// Extractor for .tar.gz / .tgz archives
pub struct TarGzExtractor;

impl Extractor for TarGzExtractor {
    fn can_handle(&self, archive_path: &Path) -> bool {
        let name = archive_path.to_string_lossy().to_lowercase();
        name.ends_with(".tar.gz") || name.ends_with(".tgz")
    }

    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        debug!("Extracting tar.gz archive to {:?}...", extract_to);
        let file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

        let mut archive = tar::Archive::new(GzDecoder::new(file));

        for entry in archive
            .entries()
            .context("Failed to read tar.gz archive")?
        {
            let mut entry = entry.context("Failed to read tar entry")?;
            let entry_path = entry
                .path()
                .context("Tar entry has an invalid path")?
                .into_owned();

            // Reject paths escaping the extraction dir
            if entry_path
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
            {
                debug!("Skipping entry with parent-dir component: {:?}", entry_path);
                continue;
            }

            let full_path = extract_to.join(&entry_path);

            match entry.header().entry_type() {
                EntryType::Directory => {
                    runtime.create_dir_all(&full_path)?;
                }
                EntryType::Regular => {
                    if let Some(parent) = full_path.parent() {
                        runtime.create_dir_all(parent)?;
                    }
                    let mut dest_file = runtime.create_file(&full_path)?;
                    std::io::copy(&mut entry, &mut dest_file)
                        .with_context(|| format!("Failed to extract file {:?}", full_path))?;

                    #[cfg(unix)]
                    if let Ok(mode) = entry.header().mode()
                        && let Err(e) = runtime.set_permissions(&full_path, mode)
                    {
                        debug!("Failed to set permissions on {:?}: {}", full_path, e);
                    }
                }
                other => {
                    debug!("Skipping unsupported tar entry type {:?}", other);
                }
            }
        }

        Ok(())
    }
}
