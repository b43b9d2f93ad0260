//! Data source abstraction feeding the dashboard.
//!
//! A source turns refresh signals into fetch results and runs operator
//! commands, delivering everything back to the UI loop as [`FeedEvent`]s.
//! The UI polls without blocking once per frame.

mod channel;
mod live;

pub use channel::{ChannelFeed, ChannelSource, SourceRequest};
pub use live::ApiSource;

use std::fmt::Debug;

use crate::api::{ApiError, Cluster, ClusterAddRequest, Stats};

/// A mutating operation issued by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Enable or disable a cluster.
    SetEnabled { name: String, enabled: bool },
    /// Run cluster discovery on the backend.
    Discover,
    /// Register a new cluster.
    AddCluster(ClusterAddRequest),
}

impl Command {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Command::SetEnabled { .. } => "set-enabled",
            Command::Discover => "discover",
            Command::AddCluster(_) => "add-cluster",
        }
    }
}

/// Something the UI loop has to apply.
#[derive(Debug)]
pub enum FeedEvent {
    /// Outcome of a statistics fetch.
    Stats(Result<Stats, ApiError>),
    /// Outcome of a cluster list fetch.
    Clusters(Result<Vec<Cluster>, ApiError>),
    /// A dispatched command finished, successfully or not.
    CommandSettled {
        command: Command,
        result: Result<(), ApiError>,
    },
}

/// Trait for sources of dashboard data.
///
/// # Example
///
/// ```
/// use trino_dash::source::{ChannelSource, DataSource, FeedEvent};
/// use trino_dash::api::Stats;
///
/// let (feed, mut source) = ChannelSource::create("test");
/// feed.send(FeedEvent::Stats(Ok(Stats::default())));
/// assert!(matches!(source.poll(), Some(FeedEvent::Stats(Ok(_)))));
/// ```
pub trait DataSource: Send + Debug {
    /// Take the next pending event, if any. Must not block.
    fn poll(&mut self) -> Option<FeedEvent>;

    /// Start a command. Its outcome arrives later as
    /// [`FeedEvent::CommandSettled`], followed by an extra refresh.
    fn dispatch(&mut self, command: Command);

    /// Request an immediate refresh.
    fn refresh(&mut self);

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Base URL of the admin API behind this source, if there is one.
    fn endpoint(&self) -> Option<&str> {
        None
    }
}
