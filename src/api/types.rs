//! Wire types exchanged with the load balancer's admin API.
//!
//! Field names match the JSON produced and accepted by the backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A query-engine cluster registered with the load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Unique cluster name.
    pub name: String,
    /// Coordinator URL.
    pub host: String,
    /// Whether the coordinator is reachable.
    pub available: bool,
    /// Whether the load balancer routes queries to this cluster.
    pub enabled: bool,
    /// Free-form labels. The backend sends `null` for untagged clusters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: BTreeMap<String, String>,
}

/// Aggregate query statistics across enabled clusters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_workers: u32,
    pub running_queries: u32,
    pub blocked_queries: u32,
    pub queued_queries: u32,
}

/// Body of `PATCH /api/cluster/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterUpdateRequest {
    pub name: String,
    pub enabled: bool,
}

/// Body of `POST /api/cluster`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAddRequest {
    pub name: String,
    pub url: String,
    pub enabled: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
