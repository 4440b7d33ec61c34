mod tar_gz;
mod zip;

use crate::runtime::Runtime;
use anyhow::{Result, anyhow};
use std::path::Path;

pub use tar_gz::TarGzExtractor;
pub use zip::ZipExtractor;

/// Trait for format-specific archive extractors
#[cfg_attr(test, mockall::automock)]
pub trait Extractor: Send + Sync {
    /// Check if this extractor can handle the given archive format
    fn can_handle(&self, archive_path: &Path) -> bool;

    /// Extract the archive into the specified directory
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()>;
}

/// Dispatcher that selects the appropriate extractor based on archive format.
/// Holds all available extractors and dispatches to the correct one.
pub struct ArchiveExtractor {
    tar_gz: TarGzExtractor,
    zip: ZipExtractor,
}

impl Default for ArchiveExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self {
            tar_gz: TarGzExtractor,
            zip: ZipExtractor,
        }
    }
}

impl Extractor for ArchiveExtractor {
    fn can_handle(&self, archive_path: &Path) -> bool {
        self.tar_gz.can_handle(archive_path) || self.zip.can_handle(archive_path)
    }

    #[tracing::instrument(skip(self, runtime, archive_path, extract_to))]
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        if self.tar_gz.can_handle(archive_path) {
            return self.tar_gz.extract(runtime, archive_path, extract_to);
        }
        if self.zip.can_handle(archive_path) {
            return self.zip.extract(runtime, archive_path, extract_to);
        }
        Err(anyhow!(
            "Unsupported archive format: {}",
            archive_path.display()
        ))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RealRuntime;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_dispatcher_can_handle() {
        let extractor = ArchiveExtractor::new();
        assert!(extractor.can_handle(Path::new("file.tar.gz")));
        assert!(extractor.can_handle(Path::new("file.tgz")));
        assert!(extractor.can_handle(Path::new("file.zip")));
        assert!(!extractor.can_handle(Path::new("file.unknown")));
    }

    #[test]
    fn test_dispatcher_extracts_tar_gz() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("release.tar.gz");
        let extract_path = dir.path().join("bin");
        fs::write(
            &archive_path,
            test_fixtures::tar_gz_bytes(&[("gvmkit-build", "binary content", 0o755)])?,
        )?;
        fs::create_dir(&extract_path)?;

        let extractor = ArchiveExtractor::new();
        extractor.extract(&RealRuntime, &archive_path, &extract_path)?;

        let extracted = extract_path.join("gvmkit-build");
        assert!(extracted.exists());
        assert_eq!(fs::read_to_string(extracted)?, "binary content");
        Ok(())
    }

    #[test]
    fn test_dispatcher_extracts_zip() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("release.zip");
        let extract_path = dir.path().join("bin");
        fs::write(
            &archive_path,
            test_fixtures::zip_bytes(&[("gvmkit-build.exe", "binary content")])?,
        )?;
        fs::create_dir(&extract_path)?;

        let extractor = ArchiveExtractor::new();
        extractor.extract(&RealRuntime, &archive_path, &extract_path)?;

        let extracted = extract_path.join("gvmkit-build.exe");
        assert!(extracted.exists());
        assert_eq!(fs::read_to_string(extracted)?, "binary content");
        Ok(())
    }

    #[test]
    fn test_dispatcher_rejects_unknown_format() {
        let extractor = ArchiveExtractor::new();
        let result = extractor.extract(
            &RealRuntime,
            Path::new("/tmp/file.unknown"),
            Path::new("/tmp/out"),
        );
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Unsupported archive format")
        );
    }
}
