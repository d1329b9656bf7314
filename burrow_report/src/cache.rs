//! Per-run response cache
//!
//! Each Burrow resource is fetched at most once per run, as long as the
//! payload it returns is non-empty. Empty payloads are deliberately not
//! cached and are requested again on the next lookup.

use crate::error::Result;
use crate::gateway::Gateway;
use crate::json::is_truthy;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Key of a consumer group within a cluster
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConsumerKey {
    pub cluster: String,
    pub consumer: String,
}

/// Key of a topic within a cluster
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicKey {
    pub cluster: String,
    pub topic: String,
}

/// Identifies one cacheable Burrow resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    /// `/` - configured cluster names
    Clusters,
    /// `/{cluster}` - cluster module configuration
    ClusterDetails(String),
    /// `/{cluster}/topic` - topic names
    Topics(String),
    /// `/{cluster}/topic/{topic}` - per-partition head offsets
    TopicDetails(TopicKey),
    /// `/{cluster}/consumer` - consumer group names
    Consumers(String),
    /// `/{cluster}/consumer/{consumer}` - committed offsets per topic
    ConsumerDetails(ConsumerKey),
    /// `/{cluster}/consumer/{consumer}/lag` - evaluated group status
    ConsumerStatus(ConsumerKey),
}

impl ResourceKey {
    /// Path components of the resource below the API prefix
    pub fn path(&self) -> Vec<&str> {
        match self {
            ResourceKey::Clusters => vec![],
            ResourceKey::ClusterDetails(cluster) => vec![cluster.as_str()],
            ResourceKey::Topics(cluster) => vec![cluster.as_str(), "topic"],
            ResourceKey::TopicDetails(key) => {
                vec![key.cluster.as_str(), "topic", key.topic.as_str()]
            }
            ResourceKey::Consumers(cluster) => vec![cluster.as_str(), "consumer"],
            ResourceKey::ConsumerDetails(key) => {
                vec![key.cluster.as_str(), "consumer", key.consumer.as_str()]
            }
            ResourceKey::ConsumerStatus(key) => {
                vec![key.cluster.as_str(), "consumer", key.consumer.as_str(), "lag"]
            }
        }
    }

    /// Name of the envelope field that carries the payload
    pub fn payload_field(&self) -> &'static str {
        match self {
            ResourceKey::Clusters => "clusters",
            ResourceKey::ClusterDetails(_) => "module",
            ResourceKey::Topics(_) => "topics",
            ResourceKey::TopicDetails(_) => "offsets",
            ResourceKey::Consumers(_) => "consumers",
            ResourceKey::ConsumerDetails(_) => "topics",
            ResourceKey::ConsumerStatus(_) => "status",
        }
    }

    /// Container substituted when the payload field is missing
    fn empty_payload(&self) -> Value {
        match self {
            ResourceKey::Clusters
            | ResourceKey::Topics(_)
            | ResourceKey::TopicDetails(_)
            | ResourceKey::Consumers(_) => Value::Array(Vec::new()),
            ResourceKey::ClusterDetails(_)
            | ResourceKey::ConsumerDetails(_)
            | ResourceKey::ConsumerStatus(_) => Value::Object(Map::new()),
        }
    }
}

/// Common header of every Burrow response
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    message: String,
}

/// Memoizes Burrow payloads for the lifetime of one report run
pub struct ResponseCache<G> {
    gateway: G,
    entries: HashMap<ResourceKey, Value>,
}

impl<G: Gateway> ResponseCache<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            entries: HashMap::new(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Returns the payload for `key`, fetching it on first use
    ///
    /// # Returns
    /// * `Ok(Value)` - The extracted payload (an empty container if absent)
    /// * `Err(ApiError)` - Transport and decode failures, unmodified
    pub fn get_or_fetch(&mut self, key: ResourceKey) -> Result<Value> {
        if let Some(cached) = self.entries.get(&key) {
            debug!("Cache hit for {:?}", key);
            return Ok(cached.clone());
        }

        let mut response = self.gateway.fetch(&key.path())?;

        let envelope = Envelope::deserialize(&response).unwrap_or_default();
        if envelope.error {
            warn!("Burrow reported an error for {:?}: {}", key, envelope.message);
        }

        let field = key.payload_field();
        let payload = match response.get_mut(field).map(Value::take) {
            Some(payload) => payload,
            None => {
                debug!("Response for {:?} has no '{}' field", key, field);
                key.empty_payload()
            }
        };

        if is_truthy(&payload) {
            self.entries.insert(key, payload.clone());
        }
        Ok(payload)
    }

    /// Configured cluster names
    pub fn clusters(&mut self) -> Result<Vec<String>> {
        let payload = self.get_or_fetch(ResourceKey::Clusters)?;
        Ok(names(&payload))
    }

    /// Module configuration of a cluster
    pub fn cluster_details(&mut self, cluster: &str) -> Result<Value> {
        self.get_or_fetch(ResourceKey::ClusterDetails(cluster.to_string()))
    }

    /// Topic names of a cluster
    pub fn topics(&mut self, cluster: &str) -> Result<Vec<String>> {
        let payload = self.get_or_fetch(ResourceKey::Topics(cluster.to_string()))?;
        Ok(names(&payload))
    }

    /// Head offsets of a topic, indexed by partition
    pub fn topic_details(&mut self, cluster: &str, topic: &str) -> Result<Value> {
        self.get_or_fetch(ResourceKey::TopicDetails(TopicKey {
            cluster: cluster.to_string(),
            topic: topic.to_string(),
        }))
    }

    /// Consumer group names of a cluster
    pub fn consumers(&mut self, cluster: &str) -> Result<Vec<String>> {
        let payload = self.get_or_fetch(ResourceKey::Consumers(cluster.to_string()))?;
        Ok(names(&payload))
    }

    /// Committed offsets of a consumer group, keyed by topic
    pub fn consumer_details(&mut self, cluster: &str, consumer: &str) -> Result<Value> {
        self.get_or_fetch(ResourceKey::ConsumerDetails(ConsumerKey {
            cluster: cluster.to_string(),
            consumer: consumer.to_string(),
        }))
    }

    /// Evaluated lag status of a consumer group
    pub fn consumer_status(&mut self, cluster: &str, consumer: &str) -> Result<Value> {
        self.get_or_fetch(ResourceKey::ConsumerStatus(ConsumerKey {
            cluster: cluster.to_string(),
            consumer: consumer.to_string(),
        }))
    }
}

fn names(payload: &Value) -> Vec<String> {
    payload
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
