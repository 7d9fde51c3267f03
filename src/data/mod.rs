//! Data models and derived views of the reading list.
//!
//! Everything in here is a pure transformation of the current list plus
//! parameters; nothing keeps hidden state between polls.
//!
//! ## Submodules
//!
//! - [`reading`]: The sensor snapshot model ([`Reading`], [`PumpState`])
//! - [`alert`]: Threshold alerts and the [`Notifier`] capability
//! - [`series`]: Chart series over list position
//! - [`page`]: Fixed-size pagination ([`Paginator`])
//! - [`format`]: Units and localized timestamps for display and export
//!
//! ## Data Flow
//!
//! ```text
//! Vec<Reading> (newest first)
//!        │
//!        ├──▶ alert::notify_latest()   (readings[0] only)
//!        ├──▶ ChartSeries::project()   (whole list, x = index + 1)
//!        ├──▶ Paginator::page()        (history table)
//!        └──▶ export::*                (on demand)
//! ```

pub mod alert;
pub mod format;
pub mod page;
pub mod reading;
pub mod series;

pub use alert::{Alert, AlertKind, AlertThresholds, LogNotifier, Notifier, Severity};
pub use page::Paginator;
pub use reading::{PumpState, Reading};
pub use series::{ChartSeries, Point};
