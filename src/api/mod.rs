//! Client for the load balancer's admin REST API.
//!
//! [`DashboardApi`] is the seam between the feed and the network: the live
//! dashboard uses [`HttpApi`], tests substitute in-memory implementations.
//!
//! | Method | Path                    | Operation                          |
//! |--------|-------------------------|------------------------------------|
//! | GET    | `/api/clusters`         | [`DashboardApi::list_clusters`]    |
//! | GET    | `/api/stats`            | [`DashboardApi::stats`]            |
//! | PATCH  | `/api/cluster/{name}`   | [`DashboardApi::set_cluster_enabled`] |
//! | POST   | `/api/cluster/discover` | [`DashboardApi::trigger_discovery`] |
//! | POST   | `/api/cluster`          | [`DashboardApi::add_cluster`]      |
//! | GET    | `/api/health`           | [`DashboardApi::health`]           |

mod error;
mod http;
mod types;

pub use error::ApiError;
pub use http::{HttpApi, HttpApiBuilder, DEFAULT_ENDPOINT};
pub use types::{Cluster, ClusterAddRequest, ClusterUpdateRequest, Stats};

use async_trait::async_trait;

/// Operations the dashboard performs against the backend.
///
/// Each call is a single request/response exchange. Any failure is reported
/// as an [`ApiError`]; callers do not distinguish between kinds.
#[async_trait]
pub trait DashboardApi: Send + Sync + std::fmt::Debug {
    /// Fetch all registered clusters, in no particular order.
    async fn list_clusters(&self) -> Result<Vec<Cluster>, ApiError>;

    /// Fetch the aggregate statistics snapshot.
    async fn stats(&self) -> Result<Stats, ApiError>;

    /// Enable or disable a cluster by name.
    async fn set_cluster_enabled(&self, name: &str, enabled: bool) -> Result<(), ApiError>;

    /// Run cluster discovery on the backend and wait for it to finish.
    async fn trigger_discovery(&self) -> Result<(), ApiError>;

    /// Register a new cluster.
    async fn add_cluster(&self, request: &ClusterAddRequest) -> Result<(), ApiError>;

    /// Probe backend liveness.
    async fn health(&self) -> Result<(), ApiError>;

    /// Base URL requests are sent to.
    fn endpoint(&self) -> &str;
}
