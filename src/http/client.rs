//! Streaming HTTP client over reqwest.
//!
//! Downloads are single-shot: a failed transfer is a terminal error for the
//! calling operation, never retried here. Timeouts are whatever reqwest's
//! defaults provide.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use std::io::Write;

/// Thin wrapper around a reqwest [`Client`] for streaming file downloads.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Downloads a file from a URL, streaming the body into a writer supplied
    /// by `create_writer`. The writer is only created once the response status
    /// has been checked, so a non-2xx response never touches the disk.
    /// Returns the number of bytes written.
    #[tracing::instrument(skip(self, create_writer))]
    pub async fn download_file<W, F>(&self, url: &str, create_writer: F) -> Result<u64>
    where
        W: Write,
        F: Fn() -> Result<W>,
    {
        debug!("Downloading file from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to start download request")?;

        let mut response = response
            .error_for_status()
            .context("Release download was refused by the server")?;

        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read chunk from download stream")?
        {
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")?;
            downloaded_bytes += chunk.len() as u64;
        }

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}
