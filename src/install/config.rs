use anyhow::Result;
use reqwest::Client;
use std::path::PathBuf;

use crate::archive::{ArchiveExtractor, Extractor};
use crate::http::HttpClient;

/// Collaborators and overrides for one invocation. Capabilities are composed
/// here instead of being baked into the installer, so tests can swap any of
/// them out.
pub struct Config<E: Extractor> {
    pub http: HttpClient,
    pub extractor: E,
    pub install_root: Option<PathBuf>,
    pub base_url: Option<String>,
}

impl Config<ArchiveExtractor> {
    pub fn new(install_root: Option<PathBuf>, base_url: Option<String>) -> Result<Self> {
        let client = Client::builder().user_agent("gvmkit-bootstrap").build()?;

        Ok(Self {
            http: HttpClient::new(client),
            extractor: ArchiveExtractor::new(),
            install_root,
            base_url,
        })
    }
}
