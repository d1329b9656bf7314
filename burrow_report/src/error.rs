//! Error types for burrow_report
//!
//! Only failures that abort a report live here. Missing fields inside an
//! otherwise valid response are never errors: the extraction helpers in
//! [`crate::json`] substitute defaults instead.

use thiserror::Error;

/// Result type alias for burrow_report operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors raised while talking to the Burrow API or preparing a report
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not valid JSON
    #[error("response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A topic or consumer filter is not a valid regular expression
    #[error("invalid filter pattern '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
