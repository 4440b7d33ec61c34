//! HTTP transport for release downloads.

mod client;

pub use client::HttpClient;
