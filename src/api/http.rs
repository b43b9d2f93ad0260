//! reqwest-backed implementation of [`DashboardApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::debug;

use super::{ApiError, Cluster, ClusterAddRequest, ClusterUpdateRequest, DashboardApi, Stats};

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8998";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the admin API.
///
/// # Example
///
/// ```no_run
/// use trino_dash::api::{DashboardApi, HttpApi};
///
/// # tokio_test::block_on(async {
/// let api = HttpApi::builder().endpoint("http://lb.internal:8998").build()?;
/// let stats = api.stats().await?;
/// println!("{} running", stats.running_queries);
/// # Ok::<_, anyhow::Error>(())
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    endpoint: String,
}

impl HttpApi {
    /// Create a new builder for configuring the client.
    pub fn builder() -> HttpApiBuilder {
        HttpApiBuilder::default()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, ApiError> {
        let request = request.build()?;
        let method = request.method().to_string();
        debug!(%method, path, "sending request");

        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                method,
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl DashboardApi for HttpApi {
    async fn list_clusters(&self) -> Result<Vec<Cluster>, ApiError> {
        let path = "/api/clusters";
        let response = self.send(self.request(Method::GET, path), path).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn stats(&self) -> Result<Stats, ApiError> {
        let path = "/api/stats";
        let response = self.send(self.request(Method::GET, path), path).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn set_cluster_enabled(&self, name: &str, enabled: bool) -> Result<(), ApiError> {
        let path = format!("/api/cluster/{}", encode_segment(name));
        let body = ClusterUpdateRequest {
            name: name.to_string(),
            enabled,
        };
        self.send(self.request(Method::PATCH, &path).json(&body), &path)
            .await?;
        Ok(())
    }

    async fn trigger_discovery(&self) -> Result<(), ApiError> {
        let path = "/api/cluster/discover";
        self.send(self.request(Method::POST, path), path).await?;
        Ok(())
    }

    async fn add_cluster(&self, request: &ClusterAddRequest) -> Result<(), ApiError> {
        let path = "/api/cluster";
        self.send(self.request(Method::POST, path).json(request), path)
            .await?;
        Ok(())
    }

    async fn health(&self) -> Result<(), ApiError> {
        let path = "/api/health";
        self.send(self.request(Method::GET, path), path).await?;
        Ok(())
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Builder for [`HttpApi`].
#[derive(Debug, Default)]
pub struct HttpApiBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl HttpApiBuilder {
    /// Set the base URL (default: [`DEFAULT_ENDPOINT`]).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the per-request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpApi, ApiError> {
        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(HttpApi { client, endpoint })
    }
}

/// Percent-encode a value for use as a single path segment.
fn encode_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
