//! Report aggregation
//!
//! Each function here walks the cached Burrow resources of one cluster,
//! applies the name filters and folds the raw JSON into typed rows. Row
//! order follows the upstream listing; sorting is left to the renderer.

use crate::cache::ResponseCache;
use crate::error::Result;
use crate::filter::NameFilter;
use crate::gateway::Gateway;
use crate::json::{as_integer, is_truthy, JsonExt};
use crate::stats::{PartitionStats, UNKNOWN};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Topic and consumer group filters applied to every report
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub topic: NameFilter,
    pub consumer: NameFilter,
}

/// Static configuration of one cluster
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterRow {
    pub cluster: String,
    pub kafka_version: String,
    pub client_id: String,
    pub offset_refresh: String,
    pub topic_refresh: String,
    pub servers: Vec<String>,
}

/// Head offsets of one topic
#[derive(Debug, Clone, PartialEq)]
pub struct TopicRow {
    pub topic: String,
    /// Head offset per partition, indexed by partition id; `None` for
    /// slots that are null or not numeric
    pub offsets: Vec<Option<i64>>,
}

impl TopicRow {
    /// Number of partitions, unreadable slots included
    pub fn partitions(&self) -> usize {
        self.offsets.len()
    }

    pub fn min_offset(&self) -> i64 {
        self.offsets.iter().flatten().copied().min().unwrap_or(0)
    }

    pub fn max_offset(&self) -> i64 {
        self.offsets.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// Committed offset history of one consumer group partition entry
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerTopicRow {
    pub consumer: String,
    pub topic: String,
    pub owner: String,
    /// `current-lag` as reported, `None` when absent
    pub lag: Option<i64>,
    pub min_offset: i64,
    pub max_offset: i64,
    /// Latest commit time, `None` when no commit time was readable
    pub max_timestamp: Option<i64>,
}

/// Summary of a consumer group status snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerStatusRow {
    pub consumer: String,
    pub status: String,
    /// Lag of the max-lag partition, 0 without one
    pub lag: i64,
    pub total_lag: i64,
    pub max_offset: i64,
    /// Latest commit time, `None` when no partition time was readable
    pub max_timestamp: Option<i64>,
    /// Distinct non-empty partition owners
    pub owners: BTreeSet<String>,
    /// Number of partitions per topic
    pub topics: BTreeMap<String, usize>,
}

/// One partition of a consumer group status snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionRow {
    pub consumer: String,
    pub stats: PartitionStats,
}

/// Projects the module configuration of every cluster
pub fn cluster_rows<G: Gateway>(cache: &mut ResponseCache<G>) -> Result<Vec<ClusterRow>> {
    let mut rows = Vec::new();
    for cluster in cache.clusters()? {
        let details = cache.cluster_details(&cluster)?;
        let profile = details.object_field("client-profile");
        rows.push(ClusterRow {
            kafka_version: profile.str_or("kafka-version", UNKNOWN),
            client_id: profile.str_or("client-id", UNKNOWN),
            offset_refresh: details.str_or("offset-refresh", UNKNOWN),
            topic_refresh: details.str_or("topic-refresh", UNKNOWN),
            servers: details.string_list("servers"),
            cluster,
        });
    }
    Ok(rows)
}

/// Collects head offsets of every topic passing the topic filter
pub fn topic_rows<G: Gateway>(
    cache: &mut ResponseCache<G>,
    cluster: &str,
    filters: &Filters,
) -> Result<Vec<TopicRow>> {
    let mut rows = Vec::new();
    for topic in cache.topics(cluster)? {
        if !filters.topic.matches(Some(&topic)) {
            continue;
        }
        let details = cache.topic_details(cluster, &topic)?;
        let offsets = details
            .as_array()
            .map(|items| items.iter().map(as_integer).collect())
            .unwrap_or_default();
        rows.push(TopicRow { topic, offsets });
    }
    Ok(rows)
}

/// One row per (consumer, topic, partition entry) of the committed offsets
pub fn consumer_topic_rows<G: Gateway>(
    cache: &mut ResponseCache<G>,
    cluster: &str,
    filters: &Filters,
) -> Result<Vec<ConsumerTopicRow>> {
    let mut rows = Vec::new();
    for consumer in cache.consumers(cluster)? {
        if !filters.consumer.matches(Some(&consumer)) {
            continue;
        }
        let details = cache.consumer_details(cluster, &consumer)?;
        let Some(topics) = details.as_object() else {
            continue;
        };

        for (topic, entries) in topics {
            if !filters.topic.matches(Some(topic)) {
                continue;
            }
            for entry in entries.as_array().map(Vec::as_slice).unwrap_or(&[]) {
                rows.push(consumer_topic_row(&consumer, topic, entry));
            }
        }
    }
    Ok(rows)
}

fn consumer_topic_row(consumer: &str, topic: &str, entry: &Value) -> ConsumerTopicRow {
    // Burrow keeps a ring of recent commits; unfilled slots are null
    let commits: Vec<&Value> = entry
        .array_or_empty("offsets")
        .iter()
        .filter(|commit| commit.is_object())
        .collect();
    let offsets = commits.iter().map(|c| c.i64_or("offset", 0));
    let timestamps = commits.iter().map(|c| c.checked_i64_or("timestamp", 0));

    ConsumerTopicRow {
        consumer: consumer.to_string(),
        topic: topic.to_string(),
        owner: entry.str_or("owner", UNKNOWN),
        lag: as_integer(entry.field("current-lag")),
        min_offset: offsets.clone().min().unwrap_or(0),
        max_offset: offsets.max().unwrap_or(0),
        max_timestamp: latest(timestamps),
    }
}

/// Latest of the given timestamps, skipping unreadable ones
///
/// No timestamps at all give `Some(0)`; `None` only when every one of them
/// was unreadable.
fn latest(timestamps: impl IntoIterator<Item = Option<i64>>) -> Option<i64> {
    let mut seen = false;
    let mut latest = None;
    for timestamp in timestamps {
        seen = true;
        latest = latest.max(timestamp);
    }
    if seen {
        latest
    } else {
        Some(0)
    }
}

/// Summarizes the status snapshot of every consumer group
pub fn consumer_status_rows<G: Gateway>(
    cache: &mut ResponseCache<G>,
    cluster: &str,
    filters: &Filters,
) -> Result<Vec<ConsumerStatusRow>> {
    let mut rows = Vec::new();
    for consumer in cache.consumers(cluster)? {
        if !filters.consumer.matches(Some(&consumer)) {
            continue;
        }
        let snapshot = cache.consumer_status(cluster, &consumer)?;
        rows.push(summarize_status(consumer, &snapshot, &filters.topic));
    }
    Ok(rows)
}

/// Folds one status snapshot into a summary row
pub fn summarize_status(
    consumer: String,
    snapshot: &Value,
    topic_filter: &NameFilter,
) -> ConsumerStatusRow {
    let maxlag = snapshot.field("maxlag");
    let lag = if is_truthy(maxlag) {
        PartitionStats::normalize(maxlag).lag
    } else {
        0
    };

    let mut row = ConsumerStatusRow {
        consumer,
        status: snapshot.str_or("status", UNKNOWN),
        lag,
        total_lag: snapshot.i64_or("totallag", 0),
        max_offset: 0,
        max_timestamp: Some(0),
        owners: BTreeSet::new(),
        topics: BTreeMap::new(),
    };

    let mut timestamps = Vec::new();
    for raw in snapshot.array_or_empty("partitions") {
        let stats = PartitionStats::normalize(raw);
        if !topic_filter.matches(Some(&stats.topic)) {
            continue;
        }
        row.max_offset = row.max_offset.max(stats.offset);
        timestamps.push(stats.timestamp);
        if !stats.topic.is_empty() {
            *row.topics.entry(stats.topic).or_insert(0) += 1;
        }
        if !stats.owner.is_empty() {
            row.owners.insert(stats.owner);
        }
    }
    row.max_timestamp = latest(timestamps);
    row
}

/// One row per partition of every consumer group status snapshot
pub fn partition_rows<G: Gateway>(
    cache: &mut ResponseCache<G>,
    cluster: &str,
    filters: &Filters,
) -> Result<Vec<PartitionRow>> {
    let mut rows = Vec::new();
    for consumer in cache.consumers(cluster)? {
        if !filters.consumer.matches(Some(&consumer)) {
            continue;
        }
        let snapshot = cache.consumer_status(cluster, &consumer)?;
        for raw in snapshot.array_or_empty("partitions") {
            let stats = PartitionStats::normalize(raw);
            if !filters.topic.matches(Some(&stats.topic)) {
                continue;
            }
            rows.push(PartitionRow {
                consumer: consumer.clone(),
                stats,
            });
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::FakeGateway;
    use serde_json::json;

    fn filters(topic: Option<&str>, consumer: Option<&str>) -> Filters {
        Filters {
            topic: NameFilter::new(topic).unwrap(),
            consumer: NameFilter::new(consumer).unwrap(),
        }
    }

    fn status_gateway() -> FakeGateway {
        FakeGateway::new()
            .with("local/consumer", json!({"consumers": ["group-a", "group-b"]}))
            .with(
                "local/consumer/group-a/lag",
                json!({"status": {
                    "cluster": "local",
                    "group": "group-a",
                    "status": "WARN",
                    "totallag": 120,
                    "maxlag": {"topic": "orders", "partition": 1, "current_lag": 100, "end": {"lag": 90}},
                    "partitions": [
                        {"topic": "orders", "partition": 0, "owner": "", "status": "OK",
                         "end": {"offset": 500, "timestamp": 1000, "lag": 20}, "current_lag": 20},
                        {"topic": "orders", "partition": 1, "owner": "alice", "status": "WARN",
                         "end": {"offset": 900, "timestamp": 3000, "lag": 90}, "current_lag": 100},
                        {"topic": "audit", "partition": 0, "owner": "bob", "status": "OK",
                         "end": {"offset": 50, "timestamp": 2000, "lag": 0}, "current_lag": 0}
                    ]
                }}),
            )
            .with(
                "local/consumer/group-b/lag",
                json!({"status": {"status": "OK", "totallag": 0, "partitions": []}}),
            )
    }

    #[test]
    fn test_cluster_rows_project_module_config() {
        let gateway = FakeGateway::new()
            .with("", json!({"clusters": ["local"]}))
            .with(
                "local",
                json!({"module": {
                    "class-name": "kafka",
                    "servers": ["kafka01:9092", "kafka02:9092"],
                    "client-profile": {"name": "default", "client-id": "burrow-lagchecker", "kafka-version": "0.10.2"},
                    "topic-refresh": 120,
                    "offset-refresh": 30
                }}),
            );
        let mut cache = ResponseCache::new(gateway);
        let rows = cluster_rows(&mut cache).unwrap();
        assert_eq!(
            rows,
            vec![ClusterRow {
                cluster: "local".to_string(),
                kafka_version: "0.10.2".to_string(),
                client_id: "burrow-lagchecker".to_string(),
                offset_refresh: "30".to_string(),
                topic_refresh: "120".to_string(),
                servers: vec!["kafka01:9092".to_string(), "kafka02:9092".to_string()],
            }]
        );
    }

    #[test]
    fn test_cluster_rows_default_missing_config() {
        let gateway = FakeGateway::new().with("", json!({"clusters": ["bare"]}));
        let mut cache = ResponseCache::new(gateway);
        let rows = cluster_rows(&mut cache).unwrap();
        assert_eq!(rows[0].kafka_version, "?");
        assert_eq!(rows[0].client_id, "?");
        assert_eq!(rows[0].offset_refresh, "?");
        assert!(rows[0].servers.is_empty());
    }

    #[test]
    fn test_topic_rows_min_max() {
        let gateway = FakeGateway::new()
            .with("local/topic", json!({"topics": ["orders", "audit"]}))
            .with(
                "local/topic/orders",
                json!({"offsets": [2290903, 2898892, 3902933, 2328823]}),
            )
            .with("local/topic/audit", json!({"offsets": [10]}));
        let mut cache = ResponseCache::new(gateway);
        let rows = topic_rows(&mut cache, "local", &Filters::default()).unwrap();

        assert_eq!(rows.len(), 2);
        let orders = &rows[0];
        assert_eq!(orders.topic, "orders");
        assert_eq!(orders.partitions(), 4);
        assert_eq!(orders.min_offset(), 2290903);
        assert_eq!(orders.max_offset(), 3902933);
    }

    #[test]
    fn test_topic_rows_null_offsets_skipped_for_min_max() {
        let gateway = FakeGateway::new()
            .with("local/topic", json!({"topics": ["orders"]}))
            .with("local/topic/orders", json!({"offsets": [null, 40, "x", 25]}));
        let mut cache = ResponseCache::new(gateway);
        let rows = topic_rows(&mut cache, "local", &Filters::default()).unwrap();

        assert_eq!(rows[0].offsets, vec![None, Some(40), None, Some(25)]);
        assert_eq!(rows[0].partitions(), 4);
        assert_eq!(rows[0].min_offset(), 25);
        assert_eq!(rows[0].max_offset(), 40);
    }

    #[test]
    fn test_topic_rows_filtered_topics_not_fetched() {
        let gateway = FakeGateway::new()
            .with("local/topic", json!({"topics": ["orders", "audit"]}))
            .with("local/topic/orders", json!({"offsets": [1, 2]}));
        let mut cache = ResponseCache::new(gateway);
        let rows = topic_rows(&mut cache, "local", &filters(Some("ord"), None)).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(cache.gateway().calls_to("local/topic/audit"), 0);
    }

    #[test]
    fn test_topic_rows_empty_offsets() {
        let gateway = FakeGateway::new().with("local/topic", json!({"topics": ["empty"]}));
        let mut cache = ResponseCache::new(gateway);
        let rows = topic_rows(&mut cache, "local", &Filters::default()).unwrap();
        assert_eq!(rows[0].partitions(), 0);
        assert_eq!(rows[0].min_offset(), 0);
        assert_eq!(rows[0].max_offset(), 0);
    }

    #[test]
    fn test_consumer_topic_rows_one_row_per_entry() {
        let gateway = FakeGateway::new()
            .with("local/consumer", json!({"consumers": ["group-a"]}))
            .with(
                "local/consumer/group-a",
                json!({"topics": {
                    "orders": [
                        {"offsets": [
                            {"offset": 10, "timestamp": 100, "lag": 0},
                            null,
                            {"offset": 30, "timestamp": 300, "lag": 0},
                            {"offset": 20, "timestamp": 200, "lag": 0}
                        ], "owner": "alice", "current-lag": 4},
                        {"offsets": [], "owner": ""}
                    ],
                    "audit": [
                        {"offsets": [{"offset": 5, "timestamp": 50}], "owner": "bob", "current-lag": 0}
                    ]
                }}),
            );
        let mut cache = ResponseCache::new(gateway);
        let rows = consumer_topic_rows(&mut cache, "local", &Filters::default()).unwrap();

        assert_eq!(rows.len(), 3);
        let busy = rows
            .iter()
            .find(|r| r.topic == "orders" && r.owner == "alice")
            .unwrap();
        assert_eq!(busy.lag, Some(4));
        assert_eq!(busy.min_offset, 10);
        assert_eq!(busy.max_offset, 30);
        assert_eq!(busy.max_timestamp, Some(300));

        let idle = rows.iter().find(|r| r.topic == "orders" && r.owner.is_empty()).unwrap();
        assert_eq!(idle.lag, None);
        assert_eq!(idle.min_offset, 0);
        assert_eq!(idle.max_timestamp, Some(0));
    }

    #[test]
    fn test_latest_skips_unreadable_timestamps() {
        assert_eq!(latest([Some(100), None, Some(300)]), Some(300));
        assert_eq!(latest([None, None]), None);
        assert_eq!(latest(Vec::<Option<i64>>::new()), Some(0));
    }

    #[test]
    fn test_consumer_topic_rows_unreadable_timestamps() {
        let entry = json!({
            "offsets": [{"offset": 10, "timestamp": "garbage"}],
            "owner": "alice",
            "current-lag": 0
        });
        let row = consumer_topic_row("group-a", "orders", &entry);
        assert_eq!(row.max_offset, 10);
        assert_eq!(row.max_timestamp, None);
    }

    #[test]
    fn test_consumer_topic_rows_respect_filters() {
        let gateway = FakeGateway::new()
            .with("local/consumer", json!({"consumers": ["group-a", "other"]}))
            .with(
                "local/consumer/group-a",
                json!({"topics": {"orders": [{"offsets": []}], "audit": [{"offsets": []}]}}),
            );
        let mut cache = ResponseCache::new(gateway);
        let rows =
            consumer_topic_rows(&mut cache, "local", &filters(Some("aud"), Some("group"))).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].topic, "audit");
        assert_eq!(cache.gateway().calls_to("local/consumer/other"), 0);
    }

    #[test]
    fn test_consumer_status_summary() {
        let mut cache = ResponseCache::new(status_gateway());
        let rows = consumer_status_rows(&mut cache, "local", &Filters::default()).unwrap();

        assert_eq!(rows.len(), 2);
        let a = &rows[0];
        assert_eq!(a.consumer, "group-a");
        assert_eq!(a.status, "WARN");
        assert_eq!(a.lag, 100);
        assert_eq!(a.total_lag, 120);
        assert_eq!(a.max_offset, 900);
        assert_eq!(a.max_timestamp, Some(3000));
        assert_eq!(
            a.owners.iter().cloned().collect::<Vec<_>>(),
            vec!["alice".to_string(), "bob".to_string()]
        );
        assert_eq!(a.topics.get("orders"), Some(&2));
        assert_eq!(a.topics.get("audit"), Some(&1));
    }

    #[test]
    fn test_consumer_status_without_maxlag() {
        let mut cache = ResponseCache::new(status_gateway());
        let rows = consumer_status_rows(&mut cache, "local", &filters(None, Some("group-b"))).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].lag, 0);
        assert_eq!(rows[0].total_lag, 0);
        assert_eq!(rows[0].max_offset, 0);
        assert!(rows[0].owners.is_empty());
        assert!(rows[0].topics.is_empty());
    }

    #[test]
    fn test_consumer_status_topic_filter_limits_partitions() {
        let mut cache = ResponseCache::new(status_gateway());
        let rows = consumer_status_rows(&mut cache, "local", &filters(Some("audit"), None)).unwrap();
        let a = &rows[0];

        assert_eq!(a.max_offset, 50);
        assert_eq!(a.max_timestamp, Some(2000));
        assert_eq!(a.owners.len(), 1);
        assert!(a.owners.contains("bob"));
        // Lag figures come from the snapshot as a whole
        assert_eq!(a.lag, 100);
        assert_eq!(a.total_lag, 120);
    }

    #[test]
    fn test_summarize_status_empty_maxlag_object() {
        let snapshot = json!({"status": "OK", "totallag": 5, "maxlag": {}, "partitions": []});
        let row = summarize_status("g".to_string(), &snapshot, &NameFilter::any());
        assert_eq!(row.lag, 0);
        assert_eq!(row.total_lag, 5);
    }

    #[test]
    fn test_summarize_status_unreadable_timestamps() {
        let snapshot = json!({"partitions": [
            {"topic": "orders", "end": {"offset": 5, "timestamp": "garbage"}},
            {"topic": "orders", "end": {"offset": 6, "timestamp": 700}}
        ]});
        let row = summarize_status("g".to_string(), &snapshot, &NameFilter::any());
        assert_eq!(row.max_timestamp, Some(700));

        let snapshot = json!({"partitions": [{"end": {"timestamp": "garbage"}}]});
        let row = summarize_status("g".to_string(), &snapshot, &NameFilter::any());
        assert_eq!(row.max_timestamp, None);
    }

    #[test]
    fn test_summarize_status_missing_owner_counts_as_unknown() {
        let snapshot = json!({"partitions": [{"topic": "orders"}, {"topic": "orders", "owner": ""}]});
        let row = summarize_status("g".to_string(), &snapshot, &NameFilter::any());
        assert_eq!(row.status, "?");
        assert_eq!(row.owners.iter().collect::<Vec<_>>(), vec!["?"]);
        assert_eq!(row.topics.get("orders"), Some(&2));
    }

    #[test]
    fn test_partition_rows() {
        let mut cache = ResponseCache::new(status_gateway());
        let rows = partition_rows(&mut cache, "local", &filters(Some("orders"), None)).unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.consumer == "group-a"));
        assert_eq!(rows[1].stats.partition, Some(1));
        assert_eq!(rows[1].stats.lag, 100);
        assert_eq!(rows[1].stats.owner, "alice");
    }

    #[test]
    fn test_status_and_partitions_share_cached_snapshot() {
        let mut cache = ResponseCache::new(status_gateway());
        consumer_status_rows(&mut cache, "local", &Filters::default()).unwrap();
        partition_rows(&mut cache, "local", &Filters::default()).unwrap();

        assert_eq!(cache.gateway().calls_to("local/consumer"), 1);
        assert_eq!(cache.gateway().calls_to("local/consumer/group-a/lag"), 1);
    }
}
