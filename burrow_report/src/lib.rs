//! burrow_report - consumer lag reports from the Burrow HTTP API
//!
//! This library fetches cluster, topic and consumer group data from a Burrow
//! server, memoizes the responses for the duration of a run and renders them
//! as sorted ASCII tables.

pub mod aggregate;
pub mod args;
pub mod cache;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod json;
pub mod report;
pub mod reporter;
pub mod stats;
pub mod utils;

// Re-export commonly used types
pub use cache::ResponseCache;
pub use error::{ApiError, Result};
pub use gateway::{BurrowClient, Gateway};
pub use reporter::{ReportOptions, Reporter, Sections};
