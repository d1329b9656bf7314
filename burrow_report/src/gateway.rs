//! Burrow HTTP gateway
//!
//! This module provides the leaf of the reporting pipeline: it turns path
//! components into Burrow API addresses, performs one blocking GET per
//! resource and parses the body as JSON. No retries are attempted; any
//! transport or decode failure is returned to the caller as-is.

use crate::error::{ApiError, Result};
use serde_json::Value;
use tracing::debug;

/// Default Burrow server root URL
pub const DEFAULT_URL: &str = "http://127.0.0.1:8000";

/// Default API prefix appended to the root URL
pub const DEFAULT_API: &str = "v3/kafka";

/// Source of raw Burrow responses
///
/// The response cache is generic over this trait so that tests can replace
/// the HTTP client with canned responses.
pub trait Gateway {
    /// Fetches the resource addressed by `paths` (relative to the API prefix)
    /// and returns the parsed JSON document
    fn fetch(&self, paths: &[&str]) -> Result<Value>;
}

/// Blocking HTTP client for a single Burrow server
pub struct BurrowClient {
    /// Server root URL without a trailing slash
    url: String,
    /// API prefix without surrounding slashes
    api: String,
    /// Echo every outgoing request address to stdout
    debug: bool,
    client: reqwest::blocking::Client,
}

impl BurrowClient {
    /// Creates a client for the Burrow server at `url`
    ///
    /// # Arguments
    /// * `url` - Server root URL (e.g., "http://127.0.0.1:8000")
    /// * `api` - Endpoint prefix after the root URL (e.g., "v3/kafka")
    /// * `debug` - Print `=> GET: <address>` before each request
    ///
    /// # Returns
    /// * `Ok(BurrowClient)` - Client ready for requests
    /// * `Err(ApiError::Transport)` - If the HTTP client cannot be initialized
    pub fn new(url: &str, api: &str, debug: bool) -> Result<Self> {
        let url = url.trim_end_matches('/').to_string();
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("burrow-report/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        Ok(Self {
            url,
            api: api.trim_matches('/').to_string(),
            debug,
            client,
        })
    }

    /// Builds the full address for the given path components
    ///
    /// ```text
    /// address(&["local", "consumer"]) => http://127.0.0.1:8000/v3/kafka/local/consumer
    /// ```
    pub fn address(&self, paths: &[&str]) -> String {
        let mut parts = Vec::with_capacity(paths.len() + 2);
        parts.push(self.url.as_str());
        if !self.api.is_empty() {
            parts.push(self.api.as_str());
        }
        parts.extend_from_slice(paths);
        parts.join("/")
    }

    /// Line echoed to stdout before requesting `address`, if debugging
    fn request_echo(&self, address: &str) -> Option<String> {
        self.debug.then(|| format!("=> GET: {}", address))
    }
}

impl Gateway for BurrowClient {
    fn fetch(&self, paths: &[&str]) -> Result<Value> {
        let address = self.address(paths);
        if let Some(line) = self.request_echo(&address) {
            println!("{}", line);
        }
        debug!("GET {}", address);

        // Status codes are ignored: Burrow answers unknown resources with a
        // JSON envelope carrying `error: true`.
        let body = self
            .client
            .get(&address)
            .send()
            .and_then(|response| response.text())
            .map_err(|source| ApiError::Transport {
                url: address.clone(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            url: address,
            source,
        })
    }
}
