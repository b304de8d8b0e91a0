//! Rate-limited HTTP client for the football data API
//!
//! This module handles all outbound requests, including:
//! - Building the HTTP client with provider credentials
//! - Pacing requests to respect the provider's rate limit
//! - Separating transport failures from non-2xx API responses
//! - Decoding the JSON envelope (`response`, `paging`, `errors`)

use crate::api::pacer::Pacer;
use crate::config::ApiConfig;
use crate::SyncError;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Header carrying the provider key
pub const KEY_HEADER: &str = "x-rapidapi-key";
/// Header carrying the provider host
pub const HOST_HEADER: &str = "x-rapidapi-host";

/// A request that could not be completed
///
/// Distinct from an API-level non-2xx response, which is returned as a
/// normal [`ApiResponse`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Invalid response body from {url}: {message}")]
    InvalidBody { url: String, message: String },

    #[error("HTTP client error for {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Pagination metadata reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub current: Option<u32>,
    pub total: Option<u32>,
}

/// A completed request: status code plus the parsed body
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `response` array; empty when absent or not an array
    pub fn records(&self) -> &[Value] {
        self.body
            .get("response")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Consumes the response, returning the `response` array
    pub fn into_records(self) -> Vec<Value> {
        match self.body {
            Value::Object(mut map) => match map.remove("response") {
                Some(Value::Array(records)) => records,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// The `paging` object, with absent or malformed fields left as None
    pub fn paging(&self) -> Paging {
        let paging = self.body.get("paging");
        let field = |name: &str| {
            paging
                .and_then(|p| p.get(name))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
        };
        Paging {
            current: field("current"),
            total: field("total"),
        }
    }

    /// Errors the provider reports inside a 2xx body
    ///
    /// The provider sends either an empty array or an object keyed by field.
    pub fn provider_errors(&self) -> Vec<String> {
        match self.body.get("errors") {
            Some(Value::Array(items)) => items.iter().map(value_to_message).collect(),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(field, message)| format!("{}: {}", field, value_to_message(message)))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the response when `endpoint` answered normally
    ///
    /// A non-2xx status is an [`SyncError::Api`] error. A 2xx body that
    /// carries provider errors (quota, rate limit, bad parameter) is a
    /// [`SyncError::Provider`] error, so a refusal is never taken for an
    /// empty result.
    pub fn into_checked(self, endpoint: &str) -> Result<ApiResponse, SyncError> {
        if !self.is_success() {
            return Err(SyncError::Api {
                endpoint: endpoint.to_string(),
                status: self.status,
            });
        }

        let errors = self.provider_errors();
        if !errors.is_empty() {
            return Err(SyncError::Provider {
                endpoint: endpoint.to_string(),
                errors: errors.join("; "),
            });
        }

        Ok(self)
    }
}

fn value_to_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds an HTTP client carrying the provider credentials
///
/// # Example
///
/// ```no_run
/// use touchline::config::ApiConfig;
/// use touchline::api::build_http_client;
///
/// let mut config = ApiConfig::default();
/// config.key = "secret".to_string();
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &ApiConfig) -> Result<Client, TransportError> {
    let mut headers = HeaderMap::new();
    let key = HeaderValue::from_str(&config.key)
        .map_err(|_| TransportError::InvalidRequest("API key is not a valid header".into()))?;
    let host = HeaderValue::from_str(&config.host)
        .map_err(|_| TransportError::InvalidRequest("API host is not a valid header".into()))?;
    headers.insert(KEY_HEADER, key);
    headers.insert(HOST_HEADER, host);

    Client::builder()
        .default_headers(headers)
        .user_agent(concat!("touchline/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .build()
        .map_err(|source| TransportError::Request {
            url: config.base_url.clone(),
            source,
        })
}

/// Paced client for the provider's REST endpoints
///
/// One request is in flight at a time; consecutive requests are spaced by at
/// least the configured minimum interval.
pub struct ApiClient {
    client: Client,
    base_url: String,
    pacer: Pacer,
    requests_sent: u64,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_http_client(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            pacer: Pacer::new(Duration::from_millis(config.min_request_interval_ms)),
            requests_sent: 0,
        })
    }

    /// Number of requests sent since the client was built
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent
    }

    /// Builds the full URL for an endpoint and its query parameters
    pub fn endpoint_url(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Url, TransportError> {
        let raw = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut url = Url::parse(&raw)
            .map_err(|e| TransportError::InvalidRequest(format!("{}: {}", raw, e)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    /// Sends a GET request to `endpoint` with `query`
    ///
    /// # Returns
    ///
    /// * `Ok(ApiResponse)` - The request completed; the status may be non-2xx
    /// * `Err(TransportError)` - The service could not be reached or the 2xx
    ///   body was not JSON
    pub async fn fetch(
        &mut self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse, TransportError> {
        let url = self.endpoint_url(endpoint, query)?;
        let url_str = url.to_string();

        self.pacer.wait_turn().await;
        self.requests_sent += 1;
        tracing::debug!("GET {}", url_str);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(&url_str, e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| classify_error(&url_str, e))?;

        if !(200..300).contains(&status) {
            tracing::debug!("{} returned status {}", url_str, status);
            let body = serde_json::from_str(&text).unwrap_or(Value::Null);
            return Ok(ApiResponse { status, body });
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| TransportError::InvalidBody {
            url: url_str.clone(),
            message: e.to_string(),
        })?;

        Ok(ApiResponse { status, body })
    }
}

/// Maps a reqwest failure onto the transport taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        TransportError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        TransportError::Request {
            url: url.to_string(),
            source: error,
        }
    }
}
