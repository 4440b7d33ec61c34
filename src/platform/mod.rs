//! Platform detection and release target resolution.
//!
//! Maps the running OS kind and CPU architecture to one of the statically
//! supported release targets (target triple plus archive packing format).
//! There is no fuzzy matching: either exactly one descriptor matches, or
//! resolution fails with the full supported table for display.

use std::fmt;

/// Operating system kind of a supported release target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsKind {
    Windows,
    Linux,
    MacOs,
}

impl OsKind {
    /// Detect the OS kind of the running process at compile time.
    /// Returns `None` on platforms no release is built for.
    pub fn current() -> Option<Self> {
        #[cfg(target_os = "windows")]
        {
            Some(OsKind::Windows)
        }
        #[cfg(target_os = "linux")]
        {
            Some(OsKind::Linux)
        }
        #[cfg(target_os = "macos")]
        {
            Some(OsKind::MacOs)
        }
        #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
        {
            None
        }
    }
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsKind::Windows => write!(f, "Windows"),
            OsKind::Linux => write!(f, "Linux"),
            OsKind::MacOs => write!(f, "macOS"),
        }
    }
}

/// CPU architecture of a supported release target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    /// Detect the CPU architecture of the running process at compile time.
    /// Returns `None` on architectures no release is built for.
    pub fn current() -> Option<Self> {
        #[cfg(target_arch = "x86_64")]
        {
            Some(Arch::X64)
        }
        #[cfg(target_arch = "aarch64")]
        {
            Some(Arch::Arm64)
        }
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            None
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::X64 => write!(f, "x64"),
            Arch::Arm64 => write!(f, "arm64"),
        }
    }
}

/// Packing format of a release archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// File extension used in release archive names.
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::TarGz => "tar.gz",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A supported release target: an (OS, architecture) pair together with the
/// target triple the release was built for and the archive format it ships in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformDescriptor {
    pub os: OsKind,
    pub arch: Arch,
    pub target_triple: &'static str,
    pub archive_format: ArchiveFormat,
}

/// All release targets, in publish order. Windows ships as zip, everything
/// else as gzipped tar.
pub const SUPPORTED_PLATFORMS: &[PlatformDescriptor] = &[
    PlatformDescriptor {
        os: OsKind::Windows,
        arch: Arch::X64,
        target_triple: "x86_64-pc-windows-msvc",
        archive_format: ArchiveFormat::Zip,
    },
    PlatformDescriptor {
        os: OsKind::Linux,
        arch: Arch::X64,
        target_triple: "x86_64-unknown-linux-musl",
        archive_format: ArchiveFormat::TarGz,
    },
    PlatformDescriptor {
        os: OsKind::MacOs,
        arch: Arch::X64,
        target_triple: "x86_64-apple-darwin",
        archive_format: ArchiveFormat::TarGz,
    },
    PlatformDescriptor {
        os: OsKind::MacOs,
        arch: Arch::Arm64,
        target_triple: "aarch64-apple-darwin",
        archive_format: ArchiveFormat::TarGz,
    },
];

/// Raised when the running environment matches no supported release target.
/// Carries the attempted pair and renders the full supported table so the
/// user can see what would have worked.
#[derive(Debug)]
pub struct UnsupportedPlatform {
    pub os: String,
    pub arch: String,
    pub supported: &'static [PlatformDescriptor],
}

impl fmt::Display for UnsupportedPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Platform with type \"{}\" and architecture \"{}\" is not supported.",
            self.os, self.arch
        )?;
        writeln!(f, "Your system must be one of the following:")?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<10} {:<14} {:<28} {}",
            "OS", "Architecture", "Target triple", "Packing"
        )?;
        for desc in self.supported {
            writeln!(
                f,
                "{:<10} {:<14} {:<28} {}",
                desc.os.to_string(),
                desc.arch.to_string(),
                desc.target_triple,
                desc.archive_format
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for UnsupportedPlatform {}

/// Resolve an (OS, architecture) pair to its release target descriptor.
/// Linear scan over the static table, exact match on both fields.
pub fn resolve(os: OsKind, arch: Arch) -> Result<&'static PlatformDescriptor, UnsupportedPlatform> {
    SUPPORTED_PLATFORMS
        .iter()
        .find(|desc| desc.os == os && desc.arch == arch)
        .ok_or(UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
            supported: SUPPORTED_PLATFORMS,
        })
}

/// Resolve the release target of the running process.
pub fn resolve_current() -> Result<&'static PlatformDescriptor, UnsupportedPlatform> {
    match (OsKind::current(), Arch::current()) {
        (Some(os), Some(arch)) => resolve(os, arch),
        (os, arch) => Err(UnsupportedPlatform {
            os: os.map_or_else(|| std::env::consts::OS.to_string(), |o| o.to_string()),
            arch: arch.map_or_else(|| std::env::consts::ARCH.to_string(), |a| a.to_string()),
            supported: SUPPORTED_PLATFORMS,
        }),
    }
}
