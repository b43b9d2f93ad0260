//! Dashboard state and the projection of fetched results into it.
//!
//! Every [`FeedEvent`] coming out of the data source is applied here, on the
//! UI thread, in arrival order. Whatever lands last wins; there is no
//! reconciliation between overlapping fetches.

use std::cmp::Ordering;
use std::time::Instant;

use chrono::{DateTime, Utc};
use icu_collator::{Collator, CollatorOptions};

use super::series::{BoundedSeries, Sample};
use crate::api::{ApiError, Cluster, Stats};
use crate::source::{Command, FeedEvent};

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A short message surfaced to the operator in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Info,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Error,
        }
    }
}

/// Whether a mutating command is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandState {
    #[default]
    Idle,
    Updating,
}

/// Everything the dashboard displays.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Latest statistics snapshot (zeroed until the first fetch lands).
    pub stats: Stats,
    /// Running queries over the last refresh cycles.
    pub running_queries: BoundedSeries,
    /// Blocked queries over the last refresh cycles.
    pub blocked_queries: BoundedSeries,
    /// Clusters sorted by name.
    pub clusters: Vec<Cluster>,
    pub command_state: CommandState,
    /// When stats last arrived successfully.
    pub stats_updated: Option<Instant>,
    /// When the cluster list last arrived successfully.
    pub clusters_updated: Option<Instant>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one feed event. Returns a notice to surface, if any.
    pub fn apply(&mut self, event: FeedEvent, now: DateTime<Utc>) -> Option<Notice> {
        match event {
            FeedEvent::Stats(result) => self.apply_stats(result, now),
            FeedEvent::Clusters(result) => self.apply_clusters(result),
            FeedEvent::CommandSettled { command, result } => {
                Some(self.settle_command(&command, &result))
            }
        }
    }

    /// Record a statistics fetch outcome.
    ///
    /// On success one sample per tracked metric is pushed, stamped `now`.
    /// On failure nothing displayed changes.
    pub fn apply_stats(
        &mut self,
        result: Result<Stats, ApiError>,
        now: DateTime<Utc>,
    ) -> Option<Notice> {
        match result {
            Ok(stats) => {
                self.stats = stats;
                self.running_queries
                    .push(Sample::new(now, f64::from(stats.running_queries)));
                self.blocked_queries
                    .push(Sample::new(now, f64::from(stats.blocked_queries)));
                self.stats_updated = Some(Instant::now());
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "stats refresh failed");
                Some(Notice::error("error refreshing statistics"))
            }
        }
    }

    /// Record a cluster list fetch outcome.
    ///
    /// The previously displayed list is kept when the fetch failed.
    pub fn apply_clusters(&mut self, result: Result<Vec<Cluster>, ApiError>) -> Option<Notice> {
        match result {
            Ok(clusters) => {
                self.clusters = sort_clusters(clusters);
                self.clusters_updated = Some(Instant::now());
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "cluster refresh failed");
                Some(Notice::error("error refreshing cluster topology"))
            }
        }
    }

    /// Enter `Updating`. Returns false (and changes nothing) when a command
    /// is already in flight.
    pub fn begin_command(&mut self) -> bool {
        if self.command_state == CommandState::Updating {
            return false;
        }
        self.command_state = CommandState::Updating;
        true
    }

    /// Return to `Idle` after a command settled, describing the outcome.
    pub fn settle_command(&mut self, command: &Command, result: &Result<(), ApiError>) -> Notice {
        self.command_state = CommandState::Idle;

        match (command, result) {
            (Command::SetEnabled { name, enabled }, Ok(())) => {
                let verb = if *enabled { "enabled" } else { "disabled" };
                Notice::info(format!("cluster {} {}", name, verb))
            }
            (Command::SetEnabled { name, .. }, Err(_)) => {
                Notice::error(format!("error updating cluster {}", name))
            }
            (Command::Discover, Ok(())) => Notice::info("cluster discovery completed"),
            (Command::Discover, Err(_)) => Notice::error("cluster discovery error"),
            (Command::AddCluster(req), Ok(())) => {
                Notice::info(format!("cluster {} added", req.name))
            }
            (Command::AddCluster(req), Err(_)) => {
                Notice::error(format!("error adding cluster {}", req.name))
            }
        }
    }

    pub fn is_updating(&self) -> bool {
        self.command_state == CommandState::Updating
    }

    pub fn has_data(&self) -> bool {
        self.stats_updated.is_some() || self.clusters_updated.is_some()
    }

    /// Most recent successful update of either stats or clusters.
    pub fn last_updated(&self) -> Option<Instant> {
        match (self.stats_updated, self.clusters_updated) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.name == name)
    }

    pub fn enabled_count(&self) -> usize {
        self.clusters.iter().filter(|c| c.enabled).count()
    }

    pub fn unavailable_count(&self) -> usize {
        self.clusters.iter().filter(|c| !c.available).count()
    }

    /// Build the JSON document written by the export action.
    ///
    /// `endpoint` is the admin API base URL, `null` when the data did not
    /// come from one.
    pub fn export_json(&self, endpoint: Option<&str>, exported_at: DateTime<Utc>) -> serde_json::Value {
        serde_json::json!({
            "endpoint": endpoint,
            "exported_at": exported_at.to_rfc3339(),
            "stats": self.stats,
            "series": {
                "running_queries": self.running_queries.iter().collect::<Vec<_>>(),
                "blocked_queries": self.blocked_queries.iter().collect::<Vec<_>>(),
            },
            "clusters": self.clusters,
        })
    }
}

/// Sort clusters by name in root-locale collation order.
///
/// Accented letters sort with their base letter and, on a case-only
/// difference, lowercase comes first.
pub fn sort_clusters(mut clusters: Vec<Cluster>) -> Vec<Cluster> {
    match name_collator() {
        Some(collator) => clusters.sort_by(|a, b| collator.compare(&a.name, &b.name)),
        None => clusters.sort_by(|a, b| fallback_compare(&a.name, &b.name)),
    }
    clusters
}

/// Compare two cluster names the way [`sort_clusters`] orders them.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    match name_collator() {
        Some(collator) => collator.compare(a, b),
        None => fallback_compare(a, b),
    }
}

fn name_collator() -> Option<Collator> {
    Collator::try_new(&Default::default(), CollatorOptions::new())
        .map_err(|e| tracing::warn!(error = ?e, "collation data unavailable"))
        .ok()
}

fn fallback_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClusterAddRequest;
    use std::collections::BTreeMap;

    fn cluster(name: &str) -> Cluster {
        Cluster {
            name: name.to_string(),
            host: format!("http://{}:8080", name),
            available: true,
            enabled: true,
            tags: BTreeMap::new(),
        }
    }

    fn stats(running: u32, blocked: u32) -> Stats {
        Stats {
            total_workers: 4,
            running_queries: running,
            blocked_queries: blocked,
            queued_queries: 0,
        }
    }

    fn names(state: &DashboardState) -> Vec<&str> {
        state.clusters.iter().map(|c| c.name.as_str()).collect()
    }

    fn failure() -> ApiError {
        ApiError::Connection("refused".to_string())
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let sorted = sort_clusters(vec![cluster("b"), cluster("a"), cluster("C")]);
        let names: Vec<_> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "C"]);
    }

    #[test]
    fn test_sort_puts_lowercase_first_on_case_ties() {
        let sorted = sort_clusters(vec![cluster("ETL"), cluster("etl"), cluster("Adhoc")]);
        let names: Vec<_> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Adhoc", "etl", "ETL"]);
    }

    #[test]
    fn test_sort_keeps_accents_with_base_letter() {
        let sorted = sort_clusters(vec![
            cluster("zeta"),
            cluster("éclair"),
            cluster("ETL"),
            cluster("etl"),
        ]);
        let names: Vec<_> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["éclair", "etl", "ETL", "zeta"]);
        assert_eq!(compare_names("éclair", "etl"), Ordering::Less);
    }

    #[test]
    fn test_stats_feed_both_series_in_order() {
        let mut state = DashboardState::new();
        let now = Utc::now();

        assert!(state.apply_stats(Ok(stats(5, 2)), now).is_none());
        assert!(state.apply_stats(Ok(stats(7, 1)), now).is_none());

        assert_eq!(state.running_queries.values(), vec![5.0, 7.0]);
        assert_eq!(state.blocked_queries.values(), vec![2.0, 1.0]);
        assert_eq!(state.stats.running_queries, 7);
    }

    #[test]
    fn test_stats_failure_keeps_series() {
        let mut state = DashboardState::new();
        let now = Utc::now();
        state.apply_stats(Ok(stats(5, 2)), now);

        let notice = state.apply_stats(Err(failure()), now).unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(state.running_queries.len(), 1);
        assert_eq!(state.stats.running_queries, 5);
    }

    #[test]
    fn test_series_stay_bounded() {
        let mut state = DashboardState::new();
        let now = Utc::now();
        for i in 0..25 {
            state.apply_stats(Ok(stats(i, i * 2)), now);
        }
        assert_eq!(state.running_queries.len(), 10);
        assert_eq!(state.running_queries.oldest().unwrap().value, 15.0);
        assert_eq!(state.blocked_queries.latest().unwrap().value, 48.0);
    }

    #[test]
    fn test_cluster_list_replaced_sorted() {
        let mut state = DashboardState::new();
        state.apply_clusters(Ok(vec![cluster("b"), cluster("a")]));
        assert_eq!(names(&state), vec!["a", "b"]);

        state.apply_clusters(Ok(vec![cluster("z")]));
        assert_eq!(names(&state), vec!["z"]);
    }

    #[test]
    fn test_cluster_failure_keeps_displayed_list() {
        let mut state = DashboardState::new();
        state.apply_clusters(Ok(vec![cluster("b"), cluster("a")]));

        let notice = state.apply_clusters(Err(failure())).unwrap();
        assert_eq!(notice.message, "error refreshing cluster topology");
        assert_eq!(names(&state), vec!["a", "b"]);
    }

    #[test]
    fn test_last_write_wins() {
        let mut state = DashboardState::new();
        // A later-started fetch landing first is simply overwritten by the
        // earlier one that lands after it.
        state.apply(FeedEvent::Clusters(Ok(vec![cluster("new")])), Utc::now());
        state.apply(FeedEvent::Clusters(Ok(vec![cluster("old")])), Utc::now());
        assert_eq!(names(&state), vec!["old"]);
    }

    #[test]
    fn test_command_state_machine() {
        let mut state = DashboardState::new();
        assert!(!state.is_updating());

        assert!(state.begin_command());
        assert!(state.is_updating());
        // Busy: a second command is refused
        assert!(!state.begin_command());

        let command = Command::SetEnabled {
            name: "etl".to_string(),
            enabled: false,
        };
        let notice = state.settle_command(&command, &Ok(()));
        assert_eq!(notice, Notice::info("cluster etl disabled"));
        assert!(!state.is_updating());
    }

    #[test]
    fn test_settle_returns_to_idle_on_failure() {
        let mut state = DashboardState::new();
        state.begin_command();

        let notice = state.settle_command(&Command::Discover, &Err(failure()));
        assert_eq!(notice, Notice::error("cluster discovery error"));
        assert_eq!(state.command_state, CommandState::Idle);
    }

    #[test]
    fn test_settle_messages() {
        let mut state = DashboardState::new();
        let add = Command::AddCluster(ClusterAddRequest {
            name: "new".to_string(),
            url: "http://new:8080".to_string(),
            enabled: true,
        });
        assert_eq!(
            state.settle_command(&add, &Ok(())).message,
            "cluster new added"
        );
        assert_eq!(
            state.settle_command(&Command::Discover, &Ok(())).message,
            "cluster discovery completed"
        );
    }

    #[test]
    fn test_counts() {
        let mut state = DashboardState::new();
        let mut down = cluster("down");
        down.available = false;
        down.enabled = false;
        state.apply_clusters(Ok(vec![cluster("a"), down]));
        assert_eq!(state.enabled_count(), 1);
        assert_eq!(state.unavailable_count(), 1);
    }

    #[test]
    fn test_export_json_shape() {
        let mut state = DashboardState::new();
        let now = Utc::now();
        state.apply_stats(Ok(stats(3, 1)), now);
        state.apply_clusters(Ok(vec![cluster("a")]));

        let value = state.export_json(Some("http://lb:8998"), now);
        assert_eq!(value["endpoint"], "http://lb:8998");
        assert_eq!(value["stats"]["running_queries"], 3);
        assert_eq!(value["series"]["blocked_queries"][0]["value"], 1.0);
        assert_eq!(value["clusters"][0]["name"], "a");
    }
}
