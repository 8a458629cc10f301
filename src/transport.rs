//! The HTTP transport every remote call goes through.
//!
//! Everything above this layer talks to the API through the [`Transport`] trait,
//! so the chunked fetch pipeline can be driven by any implementation that knows
//! how to turn a route plus query parameters into a JSON body.

use crate::config::ConnectionLimits;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Base URL of version 1 of the Wisconet API.
pub const BASE_URL: &str = "https://wisconet.wisc.edu/api/v1";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("Failed to read JSON body from {0}")]
    Json(String, #[source] reqwest::Error),
}

/// A capability to issue `GET` requests against the API.
///
/// Implementations must return an error for any non-2xx response; callers never
/// inspect status codes themselves. Retrying, if wanted, belongs here too.
pub trait Transport: Send + Sync {
    /// Issues `GET {route}?{params}` and returns the decoded JSON body.
    ///
    /// `timeout` applies to this single request only.
    fn get_json(
        &self,
        route: &str,
        params: &[(&'static str, String)],
        timeout: Duration,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

/// [`Transport`] backed by a pooled `reqwest` client.
///
/// The pool keeps at most `max_keepalive_connections` idle connections per host;
/// the number of requests in flight is bounded by the callers (see
/// [`crate::ChunkedFetcher`]).
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, limits: ConnectionLimits) -> Result<Self, TransportError> {
        let client = Client::builder()
            .pool_max_idle_per_host(limits.max_keepalive_connections)
            .build()
            .map_err(TransportError::ClientBuild)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    async fn get_json(
        &self,
        route: &str,
        params: &[(&'static str, String)],
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        let url = format!("{}{}", self.base_url, route);
        debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TransportError::NetworkRequest(url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP error for {}: {}", url, status);
            return Err(TransportError::HttpStatus { url, status });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::Json(url, e))
    }
}
