//! Bootstrap loader: one-shot fetch of the full grid snapshot.
//!
//! Thin HTTP wrapper for `GET /api/places/{id}/pixels`. The response body is
//! a raw row-major RGBA raster; [`Snapshot::new`] is the only way to build a
//! snapshot, so anything handed to the view has already been length-checked.

#[cfg(test)]
#[path = "loader_test.rs"]
mod loader_test;

use std::time::Duration;

use reqwest::header::{ACCEPT, COOKIE};

use crate::config::Config;
use crate::error::GridError;
use crate::grid::Grid;

/// Errors produced while fetching or applying a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request did not complete.
    #[error("snapshot request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("snapshot request returned status {status}")]
    Status { status: u16 },

    /// The body is not a `size x size` RGBA raster.
    #[error("snapshot body is {actual} bytes, expected {expected}")]
    Length { expected: usize, actual: usize },

    /// The view refused the snapshot.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// A length-checked row-major RGBA raster for one grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    size: u32,
    data: Vec<u8>,
}

impl Snapshot {
    /// Wrap raw bytes for `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Length`] unless `data` is exactly `4 * size * size` bytes.
    pub fn new(grid: &Grid, data: Vec<u8>) -> Result<Self, LoadError> {
        let expected = grid.byte_len();
        if data.len() != expected {
            return Err(LoadError::Length { expected, actual: data.len() });
        }
        Ok(Self { size: grid.size(), data })
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

pub struct SnapshotLoader {
    http: reqwest::Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl SnapshotLoader {
    /// Build a loader from runtime config.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, LoadError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| LoadError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            session_cookie: config.session_cookie.clone(),
        })
    }

    /// Snapshot URL for `grid`.
    #[must_use]
    pub fn endpoint(&self, grid: &Grid) -> String {
        snapshot_endpoint(&self.base_url, grid.id())
    }

    /// Fetch the full snapshot for `grid`.
    ///
    /// Single attempt, no retry. Does not touch any view state, so the host
    /// can keep dispatching live events while this is in flight.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Request`] on transport failure,
    /// [`LoadError::Status`] on a non-2xx answer and [`LoadError::Length`]
    /// when the body is not a full raster.
    pub async fn fetch(&self, grid: &Grid) -> Result<Snapshot, LoadError> {
        let url = self.endpoint(grid);
        tracing::debug!(%url, "fetching grid snapshot");

        let mut request = self.http.get(&url).header(ACCEPT, "application/octet-stream");
        if let Some(cookie) = &self.session_cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LoadError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status { status: status.as_u16() });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LoadError::Request(e.to_string()))?;

        Snapshot::new(grid, body.to_vec())
    }
}

fn snapshot_endpoint(base_url: &str, id: &str) -> String {
    format!("{base_url}/api/places/{id}/pixels")
}
