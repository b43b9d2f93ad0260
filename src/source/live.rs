//! Live data source backed by the admin API.
//!
//! Owns the refresh scheduler. For every refresh signal the stats and the
//! cluster list are fetched independently; overlapping fetches are allowed
//! and their results are delivered in whatever order they complete.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{Command, DataSource, FeedEvent};
use crate::api::{ApiError, DashboardApi};
use crate::refresh::{RefreshHandle, RefreshScheduler, RefreshSignals};

/// A data source polling the admin API on a fixed period.
///
/// Must be created from within a tokio runtime; fetches and commands run
/// on that runtime while the UI thread polls for results.
#[derive(Debug)]
pub struct ApiSource {
    api: Arc<dyn DashboardApi>,
    runtime: Handle,
    refresh: RefreshHandle,
    events_tx: mpsc::UnboundedSender<FeedEvent>,
    events_rx: mpsc::UnboundedReceiver<FeedEvent>,
    description: String,
}

impl ApiSource {
    /// Start polling `api` with the given scheduler.
    ///
    /// An initial refresh is requested immediately so the first frame does
    /// not wait a full period.
    pub fn spawn(api: Arc<dyn DashboardApi>, scheduler: RefreshScheduler) -> Self {
        let runtime = Handle::current();
        let (refresh, signals) = scheduler.start();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        runtime.spawn(run_refresh_loop(signals, api.clone(), events_tx.clone()));

        info!(
            endpoint = api.endpoint(),
            period_ms = scheduler.period().as_millis() as u64,
            "polling admin API"
        );
        refresh.trigger();

        Self {
            description: format!("api: {}", api.endpoint()),
            api,
            runtime,
            refresh,
            events_tx,
            events_rx,
        }
    }

    /// Handle for triggering or stopping refreshes from elsewhere.
    pub fn refresh_handle(&self) -> RefreshHandle {
        self.refresh.clone()
    }

    /// Stop polling. Idempotent.
    pub fn stop(&self) {
        self.refresh.stop();
    }
}

impl Drop for ApiSource {
    fn drop(&mut self) {
        self.refresh.stop();
    }
}

impl DataSource for ApiSource {
    fn poll(&mut self) -> Option<FeedEvent> {
        self.events_rx.try_recv().ok()
    }

    fn dispatch(&mut self, command: Command) {
        let api = self.api.clone();
        let refresh = self.refresh.clone();
        let events = self.events_tx.clone();

        self.runtime.spawn(async move {
            let result = execute(api.as_ref(), &command).await;
            match &result {
                Ok(()) => info!(command = command.label(), "command succeeded"),
                Err(e) => warn!(command = command.label(), error = %e, "command failed"),
            }
            // One extra refresh per settled command, whatever the outcome
            refresh.trigger();
            let _ = events.send(FeedEvent::CommandSettled { command, result });
        });
    }

    fn refresh(&mut self) {
        self.refresh.trigger();
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn endpoint(&self) -> Option<&str> {
        Some(self.api.endpoint())
    }
}

/// Run one command against the API.
pub(crate) async fn execute(api: &dyn DashboardApi, command: &Command) -> Result<(), ApiError> {
    match command {
        Command::SetEnabled { name, enabled } => api.set_cluster_enabled(name, *enabled).await,
        Command::Discover => api.trigger_discovery().await,
        Command::AddCluster(request) => api.add_cluster(request).await,
    }
}

async fn run_refresh_loop(
    mut signals: RefreshSignals,
    api: Arc<dyn DashboardApi>,
    events: mpsc::UnboundedSender<FeedEvent>,
) {
    while let Some(signal) = signals.recv().await {
        if events.is_closed() {
            break;
        }
        debug!(?signal, "refreshing");

        let stats_api = api.clone();
        let stats_events = events.clone();
        tokio::spawn(async move {
            let result = stats_api.stats().await;
            let _ = stats_events.send(FeedEvent::Stats(result));
        });

        let clusters_api = api.clone();
        let clusters_events = events.clone();
        tokio::spawn(async move {
            let result = clusters_api.list_clusters().await;
            let _ = clusters_events.send(FeedEvent::Clusters(result));
        });
    }
    debug!("refresh loop finished");
}
