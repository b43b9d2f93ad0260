//! Data models and processing for the dashboard.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "2s", "500ms")
//! - [`series`]: Fixed-capacity sample buffers behind the query chart
//! - [`dashboard`]: [`DashboardState`] and the projection of fetch results into it
//!
//! ## Data Flow
//!
//! ```text
//! FeedEvent (from a DataSource)
//!        │
//!        ▼
//! DashboardState::apply()
//!        │
//!        ├──▶ Stats ──▶ BoundedSeries::push() (running, blocked)
//!        │
//!        └──▶ Vec<Cluster> ──▶ sort_clusters()
//! ```

pub mod dashboard;
pub mod duration;
pub mod series;

pub use dashboard::{
    compare_names, sort_clusters, CommandState, DashboardState, Notice, NoticeLevel,
};
pub use series::{BoundedSeries, Sample, SERIES_CAPACITY};
