//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the HTTP client with transport timeouts
//! - Picking a browser identity for every request
//! - Classifying failures into transient, not-found and other-status
//!
//! No retries happen here; see [`crate::crawler::RetryPolicy`].

use crate::config::HttpConfig;
use rand::seq::SliceRandom;
use reqwest::{header::USER_AGENT, Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// A successfully fetched document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// HTTP status code (always 2xx)
    pub status_code: u16,
    /// Response body
    pub body: String,
}

/// Failure of a single fetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection failure or timeout; the only retryable kind
    #[error("network failure for {url}: {message}")]
    Transient { url: String, message: String },

    /// HTTP 404
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Any other non-success status
    #[error("HTTP {status_code} for {url}")]
    Status { url: String, status_code: u16 },
}

impl FetchError {
    /// Returns true if the failure may go away on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Issues one GET request per call
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Fetches `url` once
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

/// Builds an HTTP client with the configured timeouts
///
/// No default user agent is set; [`HttpFetcher`] adds one per request.
///
/// # Example
///
/// ```no_run
/// use anime_harvest::config::HttpConfig;
/// use anime_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] over a reqwest client with rotating browser identities
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agents: Vec<String>,
}

impl HttpFetcher {
    /// Creates a fetcher from the HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            user_agents: config.user_agents.clone(),
        })
    }

    /// Picks a browser identity for the next request
    fn pick_user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or("Mozilla/5.0")
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let user_agent = self.pick_user_agent().to_string();
        tracing::debug!("GET {} as {}", url, user_agent);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| classify_error(url, &e))?;

        let status = response.status();
        if let Some(error) = classify_status(url, status) {
            return Err(error);
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, &e))?;

        Ok(Page {
            status_code: status.as_u16(),
            body,
        })
    }
}

/// Maps a non-success status to its failure kind
pub fn classify_status(url: &str, status: StatusCode) -> Option<FetchError> {
    if status == StatusCode::NOT_FOUND {
        return Some(FetchError::NotFound {
            url: url.to_string(),
        });
    }

    if !status.is_success() {
        return Some(FetchError::Status {
            url: url.to_string(),
            status_code: status.as_u16(),
        });
    }

    None
}

/// Maps a transport error to its failure kind
fn classify_error(url: &str, error: &reqwest::Error) -> FetchError {
    if error.is_timeout() || error.is_connect() || error.is_request() || error.is_body() {
        FetchError::Transient {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Status {
            url: url.to_string(),
            status_code: error.status().map(|s| s.as_u16()).unwrap_or(0),
        }
    }
}
