use crate::runtime::Runtime;
use anyhow::{Context, Result};
use log::debug;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

use super::Extractor;

/// Extractor for .zip archives
pub struct ZipExtractor;

impl Extractor for ZipExtractor {
    fn can_handle(&self, archive_path: &Path) -> bool {
        let name = archive_path.to_string_lossy().to_lowercase();
        name.ends_with(".zip")
    }

    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        debug!("Extracting zip archive to {:?}...", extract_to);
        let file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

        // zip requires Read + Seek, but Runtime::open returns Box<dyn Read + Send>,
        // so the whole archive is buffered in memory for seeking
        let mut buffer = Vec::new();
        let mut reader = file;
        reader
            .read_to_end(&mut buffer)
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?;
        let cursor = std::io::Cursor::new(buffer);

        let mut archive = ZipArchive::new(cursor).context("Failed to parse ZIP archive")?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .with_context(|| format!("Failed to read ZIP entry {}", i))?;

            let entry_path = match entry.enclosed_name() {
                Some(path) => path.to_path_buf(),
                None => {
                    debug!("Skipping entry with invalid path");
                    continue;
                }
            };

            let full_path = extract_to.join(&entry_path);

            if entry.is_dir() {
                runtime.create_dir_all(&full_path)?;
            } else {
                if let Some(parent) = full_path.parent() {
                    runtime.create_dir_all(parent)?;
                }
                let mut dest_file = runtime.create_file(&full_path)?;
                std::io::copy(&mut entry, &mut dest_file)
                    .with_context(|| format!("Failed to extract file {:?}", full_path))?;

                // Set file permissions from archive metadata (Unix only)
                #[cfg(unix)]
                if let Some(mode) = entry.unix_mode()
                    && let Err(e) = runtime.set_permissions(&full_path, mode)
                {
                    debug!("Failed to set permissions on {:?}: {}", full_path, e);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_fixtures::zip_bytes;
    use crate::runtime::RealRuntime;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_can_handle() {
        let extractor = ZipExtractor;
        assert!(extractor.can_handle(Path::new("release.zip")));
        assert!(extractor.can_handle(Path::new("release.ZIP")));
        assert!(!extractor.can_handle(Path::new("release.tar.gz")));
    }

    #[test]
    fn test_extract_files_and_subdirs() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("release.zip");
        let extract_path = dir.path().join("out");
        fs::create_dir(&extract_path)?;

        fs::write(
            &archive_path,
            zip_bytes(&[
                ("gvmkit-build.exe", "the binary"),
                ("docs/README.md", "docs"),
            ])?,
        )?;

        ZipExtractor.extract(&RealRuntime, &archive_path, &extract_path)?;

        assert_eq!(
            fs::read_to_string(extract_path.join("gvmkit-build.exe"))?,
            "the binary"
        );
        assert_eq!(
            fs::read_to_string(extract_path.join("docs/README.md"))?,
            "docs"
        );
        Ok(())
    }

    #[test]
    fn test_extract_corrupt_archive_fails() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("release.zip");
        let extract_path = dir.path().join("out");
        fs::create_dir(&extract_path)?;
        fs::write(&archive_path, b"this is not a zip file")?;

        let result = ZipExtractor.extract(&RealRuntime, &archive_path, &extract_path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse ZIP archive")
        );
        Ok(())
    }
}
