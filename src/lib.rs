//! # soilwatch
//!
//! A terminal dashboard and library for monitoring soil and climate sensors.
//!
//! The dashboard polls a sensor API for the list of recent readings (soil
//! moisture, pH, humidity, temperature), shows the latest values with charts,
//! raises alerts when moisture or pH fall below their thresholds, pages
//! through the history and exports it as a spreadsheet, document or CSV file.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (derive) │    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │               │                                     │
//! │       ▼               ▼                                     │
//! │  ┌─────────┐    ┌──────────┐                                │
//! │  │ source  │    │  export  │──▶ xlsx | pdf | csv            │
//! │  │ (input) │    └──────────┘                                │
//! │  └─────────┘◀── HttpSource | FileSource | ChannelSource     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, toasts and the pump dialog
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with an HTTP
//!   poller, a JSON file replay and a channel for embedding
//! - **[`data`]**: Reading model plus the derived views: alerts, chart series,
//!   pagination and display formatting
//! - **[`export`]**: Writers for the full reading list
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Layered settings from file and environment
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll the default sensor API
//! soilwatch
//!
//! # Poll another endpoint every 30 seconds
//! soilwatch --endpoint http://gateway.local/api/data --refresh 30
//!
//! # Fetch once and export everything to ./out
//! soilwatch --export out --format all
//! ```
//!
//! ### As a library with file source
//!
//! ```
//! use soilwatch::{AlertThresholds, App, FileSource};
//!
//! let source = Box::new(FileSource::new("readings.json"));
//! let app = App::new(source, AlertThresholds::default());
//! ```
//!
//! ### As a library with channel source
//!
//! ```
//! use soilwatch::{AlertThresholds, App, ChannelSource, Reading};
//!
//! let (tx, source) = ChannelSource::create("sensor gateway");
//! let mut app = App::new(Box::new(source), AlertThresholds::default());
//!
//! tx.send(vec![Reading::new(25.0, 5.5, 60.0, 28.0)]).unwrap();
//! app.reload_data();
//! assert_eq!(app.toasts.len(), 2);
//! ```
//!
//! ### Evaluating alerts without a UI
//!
//! ```
//! use soilwatch::data::alert::{notify_latest, AlertThresholds, Alert};
//! use soilwatch::Reading;
//!
//! let readings = vec![Reading::new(45.0, 5.8, 60.0, 28.0)];
//! let mut alerts: Vec<Alert> = Vec::new();
//! notify_latest(&readings, &AlertThresholds::default(), &mut alerts);
//! assert_eq!(alerts[0].message, "soil pH too low (below 6)");
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod export;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use config::Settings;
pub use data::{
    Alert, AlertKind, AlertThresholds, ChartSeries, LogNotifier, Notifier, Paginator, Point,
    PumpState, Reading, Severity,
};
pub use error::{ExportError, FetchError};
pub use export::ExportFormat;
pub use source::{ApiClient, ChannelSource, DataSource, FileSource, HttpSource, PollTask};
