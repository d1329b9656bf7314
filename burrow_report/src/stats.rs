//! Partition stats normalization
//!
//! Burrow describes a partition in two shapes: consumer status responses
//! nest the committed position under `end` and carry `current_lag` at the
//! top level, while older responses only have `end.lag`. Both are reduced
//! to one [`PartitionStats`] record here.

use crate::json::{as_integer, JsonExt};
use serde_json::Value;

/// Placeholder for fields Burrow did not send
pub const UNKNOWN: &str = "?";

/// Uniform view of a single partition of a consumer group
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionStats {
    pub topic: String,
    /// Partition index, `None` if absent
    pub partition: Option<i64>,
    pub status: String,
    pub lag: i64,
    /// Owner of the partition; empty means unowned, `?` means not reported
    pub owner: String,
    /// Committed offset at the end of the evaluation window
    pub offset: i64,
    /// Commit time of `offset` in epoch milliseconds, `None` when Burrow sent
    /// something that is not a number
    pub timestamp: Option<i64>,
}

impl PartitionStats {
    /// Extracts partition stats from a raw Burrow partition object
    ///
    /// Missing fields fall back to `?` for strings and `0` for numbers. A
    /// timestamp that is present but not numeric is kept as `None`.
    /// `current_lag` wins over `end.lag` whenever the key is present, even
    /// when its value is `null`.
    pub fn normalize(raw: &Value) -> Self {
        let end = raw.object_field("end");

        let lag = match raw.get("current_lag") {
            Some(current_lag) => as_integer(current_lag).unwrap_or(0),
            None => end.i64_or("lag", 0),
        };

        Self {
            topic: raw.str_or("topic", UNKNOWN),
            partition: as_integer(raw.field("partition")),
            status: raw.str_or("status", UNKNOWN),
            lag,
            owner: raw.str_or("owner", UNKNOWN),
            offset: end.i64_or("offset", 0),
            timestamp: end.checked_i64_or("timestamp", 0),
        }
    }

    /// Partition index as displayed in reports
    pub fn partition_label(&self) -> String {
        self.partition
            .map_or_else(|| UNKNOWN.to_string(), |p| p.to_string())
    }
}
