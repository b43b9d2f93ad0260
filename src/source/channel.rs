//! Channel-based data source.
//!
//! Events are pushed by a producer instead of fetched from the API. Useful
//! for embedding the dashboard behind another transport, and for tests.

use tokio::sync::mpsc;

use super::{Command, DataSource, FeedEvent};

/// A request the UI made of a [`ChannelSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRequest {
    Refresh,
    Dispatch(Command),
}

/// Producer side of a [`ChannelSource`].
#[derive(Debug)]
pub struct ChannelFeed {
    events: mpsc::UnboundedSender<FeedEvent>,
    requests: mpsc::UnboundedReceiver<SourceRequest>,
}

impl ChannelFeed {
    /// Push an event to the source. Returns false once the source is gone.
    pub fn send(&self, event: FeedEvent) -> bool {
        self.events.send(event).is_ok()
    }

    /// Take the next request made by the UI, if any.
    pub fn try_request(&mut self) -> Option<SourceRequest> {
        self.requests.try_recv().ok()
    }

    /// Wait for the next request made by the UI.
    pub async fn request(&mut self) -> Option<SourceRequest> {
        self.requests.recv().await
    }
}

/// A data source fed through channels.
///
/// # Example
///
/// ```
/// use trino_dash::source::{ChannelSource, DataSource, SourceRequest};
///
/// let (mut feed, mut source) = ChannelSource::create("replay");
/// source.refresh();
/// assert_eq!(feed.try_request(), Some(SourceRequest::Refresh));
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    events: mpsc::UnboundedReceiver<FeedEvent>,
    requests: mpsc::UnboundedSender<SourceRequest>,
    description: String,
}

impl ChannelSource {
    /// Create a connected (feed, source) pair.
    pub fn create(source_description: &str) -> (ChannelFeed, Self) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let feed = ChannelFeed {
            events: event_tx,
            requests: request_rx,
        };
        let source = Self {
            events: event_rx,
            requests: request_tx,
            description: format!("channel: {}", source_description),
        };
        (feed, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<FeedEvent> {
        self.events.try_recv().ok()
    }

    fn dispatch(&mut self, command: Command) {
        let _ = self.requests.send(SourceRequest::Dispatch(command));
    }

    fn refresh(&mut self) {
        let _ = self.requests.send(SourceRequest::Refresh);
    }

    fn description(&self) -> &str {
        &self.description
    }
}
