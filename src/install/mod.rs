//! Install orchestration: download, extract, swap into place, run, uninstall.

use anyhow::{Context, Result, bail};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::archive::Extractor;
use crate::http::HttpClient;
use crate::meta::Meta;
use crate::platform::{self, PlatformDescriptor};
use crate::runtime::Runtime;

pub mod config;
mod paths;

use config::Config;
use paths::{bin_dir, binary_path, default_install_root, staging_dir};

/// Install the release binary for the current platform.
#[tracing::instrument(skip(runtime, install_root, base_url))]
pub async fn install<R: Runtime + 'static>(
    runtime: R,
    install_root: Option<PathBuf>,
    base_url: Option<String>,
) -> Result<()> {
    let config = Config::new(install_root, base_url)?;
    Installer::new(runtime, Meta::bundled()?, config)
        .install()
        .await
}

/// Run the installed binary, forwarding `args`. Returns the child's exit code.
#[tracing::instrument(skip(runtime, args, install_root, base_url))]
pub fn run<R: Runtime + 'static>(
    runtime: R,
    args: &[String],
    install_root: Option<PathBuf>,
    base_url: Option<String>,
) -> Result<i32> {
    let config = Config::new(install_root, base_url)?;
    Installer::new(runtime, Meta::bundled()?, config).run(args)
}

/// Remove the installed binary directory. Ok when nothing is installed.
#[tracing::instrument(skip(runtime, install_root, base_url))]
pub fn uninstall<R: Runtime + 'static>(
    runtime: R,
    install_root: Option<PathBuf>,
    base_url: Option<String>,
) -> Result<()> {
    let config = Config::new(install_root, base_url)?;
    Installer::new(runtime, Meta::bundled()?, config).uninstall()
}

/// Orchestrates the install lifecycle against injected capabilities:
/// HTTP transport, archive extraction, and the system runtime.
pub struct Installer<R: Runtime, E: Extractor> {
    runtime: R,
    http: HttpClient,
    extractor: E,
    meta: Meta,
    install_root: Option<PathBuf>,
    base_url: Option<String>,
}

impl<R: Runtime + 'static, E: Extractor> Installer<R, E> {
    pub fn new(runtime: R, meta: Meta, config: Config<E>) -> Self {
        Self {
            runtime,
            http: config.http,
            extractor: config.extractor,
            meta,
            install_root: config.install_root,
            base_url: config.base_url,
        }
    }

    fn install_root(&self) -> Result<PathBuf> {
        match &self.install_root {
            Some(path) => Ok(path.clone()),
            None => default_install_root(&self.runtime),
        }
    }

    fn download_url(&self, descriptor: &PlatformDescriptor) -> String {
        match &self.base_url {
            Some(base) => self.meta.download_url_from(base, descriptor),
            None => self.meta.download_url(descriptor),
        }
    }

    /// Resolve the current platform and install its release.
    pub async fn install(&self) -> Result<()> {
        let descriptor = platform::resolve_current()?;
        self.install_target(descriptor).await
    }

    /// Install the release for a specific target. Extraction lands in a
    /// staging directory; the existing `bin` directory is only removed once
    /// the new tree is complete, then the staging directory is renamed into
    /// place. A failed download or extraction leaves any previous install
    /// untouched.
    pub async fn install_target(&self, descriptor: &PlatformDescriptor) -> Result<()> {
        let root = self.install_root()?;
        self.runtime.create_dir_all(&root)?;

        let staging = staging_dir(&root);
        if self.runtime.exists(&staging) {
            // leftover from an interrupted run
            self.runtime.remove_dir_all(&staging)?;
        }
        self.runtime.create_dir_all(&staging)?;

        let url = self.download_url(descriptor);
        println!("Downloading release from {}", url);

        // The archive file name carries the format suffix the extractors
        // dispatch on, so the format choice always follows the descriptor.
        let archive_path = root.join(format!(
            "{}-{}.{}",
            self.meta.name,
            descriptor.target_triple,
            descriptor.archive_format.extension()
        ));

        let fetched = self.fetch_and_extract(&url, &archive_path, &staging).await;

        if self.runtime.exists(&archive_path)
            && let Err(e) = self.runtime.remove_file(&archive_path)
        {
            debug!("Failed to remove downloaded archive {:?}: {}", archive_path, e);
        }

        if let Err(err) = fetched {
            if self.runtime.exists(&staging) {
                let _ = self.runtime.remove_dir_all(&staging);
            }
            return Err(err);
        }

        let bin = bin_dir(&root);
        if self.runtime.exists(&bin) {
            debug!("Removing previous install at {:?}", bin);
            self.runtime.remove_dir_all(&bin)?;
        }
        self.runtime.rename(&staging, &bin)?;
        info!("Installed into {:?}", bin);

        let label = if self.meta.name.is_empty() {
            "Your package"
        } else {
            &self.meta.name
        };
        println!("{} has been installed!", label);
        Ok(())
    }

    async fn fetch_and_extract(
        &self,
        url: &str,
        archive_path: &Path,
        staging: &Path,
    ) -> Result<()> {
        self.http
            .download_file(url, || {
                self.runtime.create_file(archive_path).with_context(|| {
                    format!("Failed to create temporary file at {:?}", archive_path)
                })
            })
            .await
            .context("Error fetching release")?;
        info!("Download complete.");

        self.extractor
            .extract(&self.runtime, archive_path, staging)
            .context("Error fetching release")?;

        Ok(())
    }

    /// Resolve the current platform, then execute the installed binary.
    pub fn run(&self, args: &[String]) -> Result<i32> {
        // Resolution validates the host before touching the filesystem.
        platform::resolve_current()?;
        self.run_installed(args)
    }

    /// Execute the installed binary with inherited stdio, returning its exit
    /// code.
    pub fn run_installed(&self, args: &[String]) -> Result<i32> {
        let root = self.install_root()?;
        let binary = binary_path(&root, &self.meta.name);
        if !self.runtime.exists(&binary) {
            bail!(
                "{} is not installed (expected at {:?}); run the install command first",
                self.meta.name,
                binary
            );
        }

        debug!("Executing {:?} with args {:?}", binary, args);
        self.runtime.exec(&binary, args)
    }

    /// Resolve the current platform, then remove the installed binary
    /// directory.
    pub fn uninstall(&self) -> Result<()> {
        platform::resolve_current()?;
        self.remove_installed()
    }

    /// Remove the binary directory and any leftover staging directory.
    /// Ok when neither exists.
    pub fn remove_installed(&self) -> Result<()> {
        let root = self.install_root()?;

        let staging = staging_dir(&root);
        if self.runtime.exists(&staging) {
            self.runtime.remove_dir_all(&staging)?;
        }

        let bin = bin_dir(&root);
        if self.runtime.exists(&bin) {
            self.runtime.remove_dir_all(&bin)?;
            info!("Removed {:?}", bin);
        } else {
            debug!("Nothing to uninstall at {:?}", bin);
        }
        Ok(())
    }
}
