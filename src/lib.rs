// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # trino-dash
//!
//! A terminal dashboard and client library for Trino/Presto gateway
//! clusters.
//!
//! The dashboard polls a gateway admin API on a fixed period, keeps a short
//! rolling window of query counts for the live chart, and lets the operator
//! enable/disable clusters, run discovery and register new clusters.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌──────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal │  │
//! │  │ (state) │    │(dashboard)    │(render) │    │          │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └──────────┘  │
//! │       │ poll / dispatch                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐   signals  ┌─────────┐   HTTP   ┌────────────┐  │
//! │  │ source  │◀───────────│ refresh │          │    api     │  │
//! │  │ (feed)  │───────────────────────────────▶│ (HttpApi)  │  │
//! │  └─────────┘                                 └────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`api`]**: Typed client for the admin REST API ([`DashboardApi`] trait,
//!   [`HttpApi`] over reqwest)
//! - **[`refresh`]**: Periodic refresh scheduler merged with manual triggers
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait); the live
//!   [`ApiSource`] turns refresh signals into fetches and runs commands
//! - **[`data`]**: [`DashboardState`], bounded query series and the
//!   projection of fetch results
//! - **[`app`]** / **[`events`]**: Application state, navigation and input
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Layered settings (defaults, TOML file, environment)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch the gateway on the default endpoint (http://localhost:8998)
//! trino-dash
//!
//! # Another endpoint, faster polling, logs to a file
//! trino-dash --endpoint http://gateway:8998 --refresh 1s --log-file dash.log
//!
//! # One-shot export
//! trino-dash --export state.json
//! ```
//!
//! ### As a library with the live API source
//!
//! ```no_run
//! use std::sync::Arc;
//! use trino_dash::{ApiSource, App, HttpApi, RefreshScheduler};
//!
//! # tokio_test::block_on(async {
//! let api = HttpApi::builder().endpoint("http://gateway:8998").build().unwrap();
//! let source = ApiSource::spawn(Arc::new(api), RefreshScheduler::default());
//! let app = App::new(Box::new(source));
//! # });
//! ```
//!
//! ### As a library with a channel source
//!
//! ```
//! use trino_dash::{App, ChannelSource, FeedEvent, Theme};
//! use trino_dash::api::Stats;
//!
//! let (feed, source) = ChannelSource::create("replay");
//! feed.send(FeedEvent::Stats(Ok(Stats::default())));
//!
//! let mut app = App::with_theme(Box::new(source), Theme::dark());
//! assert_eq!(app.reload_data(), 1);
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod refresh;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use api::{ApiError, Cluster, DashboardApi, HttpApi, Stats};
pub use app::App;
pub use config::Settings;
pub use data::{BoundedSeries, DashboardState, Notice, Sample};
pub use refresh::{RefreshHandle, RefreshScheduler, RefreshSignal};
pub use source::{ApiSource, ChannelFeed, ChannelSource, Command, DataSource, FeedEvent};
pub use ui::{ChartOptions, Theme};
