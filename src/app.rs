//! Application state and navigation logic.

use std::cell::Cell;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;

use crate::api::{Cluster, ClusterAddRequest};
use crate::data::{DashboardState, Notice};
use crate::source::{Command, DataSource, FeedEvent};
use crate::ui::{ChartOptions, Theme};

/// How long a notice stays in the status bar.
pub const NOTICE_DURATION: Duration = Duration::from_secs(2);

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Stat cards, the query chart and a compact cluster list.
    Overview,
    /// Full cluster table with hosts and tags.
    Clusters,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Clusters,
            View::Clusters => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        // Only two views
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Clusters => "Clusters",
        }
    }
}

/// What keystrokes currently feed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a cluster name/host filter.
    Filter,
    /// Typing `<name> <url>` for a new cluster.
    AddCluster,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    source: Box<dyn DataSource>,
    pub dashboard: DashboardState,

    /// Selected row in the visible (filtered) cluster list.
    pub selected_index: usize,
    /// First visible cluster row of the table, as of the last render.
    table_offset: Cell<usize>,

    pub input_mode: InputMode,
    pub filter_text: String,
    pub input_buffer: String,

    pub theme: Theme,
    pub chart: ChartOptions,

    notice: Option<(Notice, Instant)>,
}

impl App {
    /// Create a new App reading from the given source.
    pub fn new(source: Box<dyn DataSource>) -> Self {
        Self::with_theme(source, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme (skips terminal detection).
    pub fn with_theme(source: Box<dyn DataSource>, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            source,
            dashboard: DashboardState::new(),
            selected_index: 0,
            table_offset: Cell::new(0),
            input_mode: InputMode::Normal,
            filter_text: String::new(),
            input_buffer: String::new(),
            theme,
            chart: ChartOptions::default(),
            notice: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Show a notice for [`NOTICE_DURATION`].
    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some((notice, Instant::now()));
    }

    /// The current notice, if it hasn't expired.
    pub fn notice(&self) -> Option<&Notice> {
        match &self.notice {
            Some((notice, at)) if at.elapsed() < NOTICE_DURATION => Some(notice),
            _ => None,
        }
    }

    /// Drain and apply every pending event from the source.
    ///
    /// Returns the number of events applied. The selection follows the
    /// selected cluster by name across list replacements.
    pub fn reload_data(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.source.poll() {
            let keep = match event {
                FeedEvent::Clusters(Ok(_)) => self.selected_cluster().map(|c| c.name.clone()),
                _ => None,
            };

            if let Some(notice) = self.dashboard.apply(event, Utc::now()) {
                self.set_notice(notice);
            }

            if let Some(name) = keep {
                if let Some(idx) = self.visible_clusters().iter().position(|c| c.name == name) {
                    self.selected_index = idx;
                }
            }
            self.clamp_selection();
            applied += 1;
        }
        applied
    }

    /// Ask the source for an immediate refresh.
    pub fn request_refresh(&mut self) {
        self.source.refresh();
    }

    /// Clusters matching the current filter, in display order.
    pub fn visible_clusters(&self) -> Vec<&Cluster> {
        self.dashboard
            .clusters
            .iter()
            .filter(|c| self.matches_filter(c))
            .collect()
    }

    /// Scroll offset of the cluster table. Screen rows map to
    /// `table_offset() + row`.
    pub fn table_offset(&self) -> usize {
        self.table_offset.get()
    }

    /// Remember where the cluster table was scrolled to when drawn.
    pub fn set_table_offset(&self, offset: usize) {
        self.table_offset.set(offset);
    }

    pub fn selected_cluster(&self) -> Option<&Cluster> {
        self.visible_clusters().get(self.selected_index).copied()
    }

    /// Check if a cluster matches the current filter (name or host).
    pub fn matches_filter(&self, cluster: &Cluster) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let search = self.filter_text.to_lowercase();
        cluster.name.to_lowercase().contains(&search) || cluster.host.to_lowercase().contains(&search)
    }

    fn clamp_selection(&mut self) {
        let max = self.visible_clusters().len().saturating_sub(1);
        self.selected_index = self.selected_index.min(max);
    }

    /// Flip the enabled flag of the selected cluster.
    ///
    /// Ignored while another command is in flight.
    pub fn toggle_selected(&mut self) {
        let Some(cluster) = self.selected_cluster() else {
            return;
        };
        let command = Command::SetEnabled {
            name: cluster.name.clone(),
            enabled: !cluster.enabled,
        };
        self.run_command(command);
    }

    /// Ask the backend to run cluster discovery.
    pub fn launch_discovery(&mut self) {
        self.run_command(Command::Discover);
    }

    fn run_command(&mut self, command: Command) {
        if !self.dashboard.begin_command() {
            self.set_notice(Notice::info("busy: waiting for the previous update"));
            return;
        }
        tracing::info!(command = command.label(), "dispatching command");
        self.source.dispatch(command);
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.visible_clusters().len().saturating_sub(1);
        self.selected_index = (self.selected_index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        self.selected_index = self.visible_clusters().len().saturating_sub(1);
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.input_mode = InputMode::Filter;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.input_mode = InputMode::Normal;
        self.clamp_selection();
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.clamp_selection();
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
        self.clamp_selection();
    }

    /// Open the add-cluster prompt.
    pub fn start_add_cluster(&mut self) {
        self.input_buffer.clear();
        self.input_mode = InputMode::AddCluster;
    }

    /// Close the add-cluster prompt without submitting.
    pub fn cancel_input(&mut self) {
        self.input_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Submit the add-cluster prompt (`<name> <url>`).
    ///
    /// Invalid input keeps the prompt open and shows a notice.
    pub fn submit_add_cluster(&mut self) {
        match parse_add_request(&self.input_buffer) {
            Some(request) => {
                self.input_buffer.clear();
                self.input_mode = InputMode::Normal;
                self.run_command(Command::AddCluster(request));
            }
            None => self.set_notice(Notice::error("usage: <name> <url>")),
        }
    }

    /// Step back: close the help overlay, leave input mode, or return to
    /// the overview, whichever applies first.
    pub fn go_back(&mut self) {
        if self.show_help {
            self.show_help = false;
        } else if self.input_mode == InputMode::AddCluster {
            self.cancel_input();
        } else if self.input_mode == InputMode::Filter {
            self.input_mode = InputMode::Normal;
        } else {
            self.current_view = View::Overview;
        }
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        if !self.dashboard.has_data() {
            anyhow::bail!("No data to export");
        }
        let value = self
            .dashboard
            .export_json(self.source.endpoint(), Utc::now());
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
        Ok(())
    }
}

/// Parse `<name> <url>` into an add request. New clusters start enabled.
pub fn parse_add_request(input: &str) -> Option<ClusterAddRequest> {
    let mut parts = input.split_whitespace();
    let name = parts.next()?;
    let url = parts.next()?;
    if parts.next().is_some() || !(url.starts_with("http://") || url.starts_with("https://")) {
        return None;
    }
    Some(ClusterAddRequest {
        name: name.to_string(),
        url: url.to_string(),
        enabled: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, Stats};
    use crate::data::NoticeLevel;
    use crate::source::{ChannelFeed, ChannelSource, SourceRequest};
    use std::collections::BTreeMap;

    fn cluster(name: &str, enabled: bool) -> Cluster {
        Cluster {
            name: name.to_string(),
            host: format!("http://{}.internal:8080", name),
            available: true,
            enabled,
            tags: BTreeMap::new(),
        }
    }

    fn app() -> (ChannelFeed, App) {
        let (feed, source) = ChannelSource::create("test");
        (feed, App::with_theme(Box::new(source), Theme::dark()))
    }

    fn loaded_app() -> (ChannelFeed, App) {
        let (feed, mut app) = app();
        feed.send(FeedEvent::Clusters(Ok(vec![
            cluster("b", true),
            cluster("a", false),
            cluster("C", true),
        ])));
        app.reload_data();
        (feed, app)
    }

    fn names(app: &App) -> Vec<String> {
        app.visible_clusters().iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_reload_applies_sorted_clusters() {
        let (_feed, app) = loaded_app();
        assert_eq!(names(&app), vec!["a", "b", "C"]);
    }

    #[test]
    fn test_failed_fetch_keeps_list_and_notifies() {
        let (feed, mut app) = loaded_app();
        feed.send(FeedEvent::Clusters(Err(ApiError::Timeout)));
        assert_eq!(app.reload_data(), 1);

        assert_eq!(names(&app), vec!["a", "b", "C"]);
        let notice = app.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "error refreshing cluster topology");
    }

    #[test]
    fn test_stats_events_feed_series() {
        let (feed, mut app) = app();
        for (running, blocked) in [(5, 2), (7, 1)] {
            feed.send(FeedEvent::Stats(Ok(Stats {
                total_workers: 1,
                running_queries: running,
                blocked_queries: blocked,
                queued_queries: 0,
            })));
        }
        assert_eq!(app.reload_data(), 2);
        assert_eq!(app.dashboard.running_queries.values(), vec![5.0, 7.0]);
        assert_eq!(app.dashboard.blocked_queries.values(), vec![2.0, 1.0]);
    }

    #[test]
    fn test_toggle_dispatches_inverse_state() {
        let (mut feed, mut app) = loaded_app();
        // "a" is first and disabled
        app.toggle_selected();

        assert!(app.dashboard.is_updating());
        assert_eq!(
            feed.try_request(),
            Some(SourceRequest::Dispatch(Command::SetEnabled {
                name: "a".to_string(),
                enabled: true,
            }))
        );
    }

    #[test]
    fn test_toggle_ignored_while_updating() {
        let (mut feed, mut app) = loaded_app();
        app.toggle_selected();
        app.select_next();
        app.toggle_selected();
        app.launch_discovery();

        assert!(matches!(feed.try_request(), Some(SourceRequest::Dispatch(_))));
        assert_eq!(feed.try_request(), None);
    }

    #[test]
    fn test_settled_command_returns_to_idle() {
        let (feed, mut app) = loaded_app();
        app.launch_discovery();
        assert!(app.dashboard.is_updating());

        feed.send(FeedEvent::CommandSettled {
            command: Command::Discover,
            result: Err(ApiError::Timeout),
        });
        app.reload_data();

        assert!(!app.dashboard.is_updating());
        assert_eq!(app.notice().unwrap().message, "cluster discovery error");
    }

    #[test]
    fn test_selection_follows_cluster_by_name() {
        let (feed, mut app) = loaded_app();
        app.select_next(); // "b"
        assert_eq!(app.selected_cluster().unwrap().name, "b");

        // A new cluster sorts in front of "b"
        feed.send(FeedEvent::Clusters(Ok(vec![
            cluster("b", true),
            cluster("a", false),
            cluster("aa", true),
        ])));
        app.reload_data();
        assert_eq!(app.selected_cluster().unwrap().name, "b");
        assert_eq!(app.selected_index, 2);
    }

    #[test]
    fn test_selection_clamped_when_list_shrinks() {
        let (feed, mut app) = loaded_app();
        app.select_last();
        feed.send(FeedEvent::Clusters(Ok(vec![cluster("x", true)])));
        app.reload_data();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_filter_matches_name_and_host() {
        let (_feed, mut app) = loaded_app();
        app.start_filter();
        for c in "c.internal".chars() {
            app.filter_push(c);
        }
        assert_eq!(names(&app), vec!["C"]);

        app.clear_filter();
        assert_eq!(names(&app).len(), 3);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_manual_refresh_is_forwarded() {
        let (mut feed, mut app) = app();
        app.request_refresh();
        assert_eq!(feed.try_request(), Some(SourceRequest::Refresh));
    }

    #[test]
    fn test_add_cluster_prompt() {
        let (mut feed, mut app) = app();
        app.start_add_cluster();
        app.input_buffer.push_str("bogus");
        app.submit_add_cluster();
        assert_eq!(app.input_mode, InputMode::AddCluster);
        assert_eq!(feed.try_request(), None);

        app.input_buffer = "etl http://etl:8080".to_string();
        app.submit_add_cluster();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(
            feed.try_request(),
            Some(SourceRequest::Dispatch(Command::AddCluster(
                ClusterAddRequest {
                    name: "etl".to_string(),
                    url: "http://etl:8080".to_string(),
                    enabled: true,
                }
            )))
        );
    }

    #[test]
    fn test_parse_add_request() {
        assert!(parse_add_request("").is_none());
        assert!(parse_add_request("etl").is_none());
        assert!(parse_add_request("etl ftp://x").is_none());
        assert!(parse_add_request("etl http://x extra").is_none());
        assert_eq!(
            parse_add_request("  etl   https://x  ").unwrap().url,
            "https://x"
        );
    }

    #[test]
    fn test_export_requires_data() {
        let (_feed, app) = app();
        let dir = tempfile::tempdir().unwrap();
        assert!(app.export_state(&dir.path().join("out.json")).is_err());
    }

    #[test]
    fn test_export_writes_json() {
        let (_feed, app) = loaded_app();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        app.export_state(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["endpoint"].is_null());
        assert_eq!(value["clusters"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_view_cycle() {
        let (_feed, mut app) = app();
        app.next_view();
        assert_eq!(app.current_view, View::Clusters);
        app.prev_view();
        assert_eq!(app.current_view, View::Overview);
    }
}
