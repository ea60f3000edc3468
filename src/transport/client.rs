//! HTTP client for the engine's profiler endpoint.

use super::{ChunkRequest, ChunkSource};
use crate::utils::config::DEFAULT_HTTP_TIMEOUT;
use crate::utils::error::CaptureError;
use log::debug;
use reqwest::blocking::Client;
use std::time::Duration;

/// Fetches chunks with `GET <base>/profile` and `GET <base>/strings`
pub struct HttpChunkSource {
    client: Client,
    base_url: String,
}

impl HttpChunkSource {
    /// Create a new chunk source with the default timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self, CaptureError> {
        Self::with_timeout(base_url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a chunk source with a custom timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CaptureError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CaptureError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&base_url.into()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ChunkSource for HttpChunkSource {
    fn fetch(&mut self, request: ChunkRequest) -> Result<Vec<u8>, CaptureError> {
        let url = chunk_url(&self.base_url, request);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(CaptureError::RequestFailed)?;

        // Check HTTP status
        if !response.status().is_success() {
            return Err(CaptureError::HttpStatus(response.status().as_u16()));
        }

        let body = response.bytes().map_err(CaptureError::RequestFailed)?;
        debug!("Received {} byte {} chunk", body.len(), request.path());

        Ok(body.to_vec())
    }
}

/// Normalize base URL to end with a single '/'
pub fn normalize_base_url(base_url: &str) -> String {
    format!("{}/", base_url.trim_end_matches('/'))
}

/// Full URL for a chunk request
pub fn chunk_url(base_url: &str, request: ChunkRequest) -> String {
    format!("{}{}", normalize_base_url(base_url), request.path())
}
