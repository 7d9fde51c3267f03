//! Data source abstraction for receiving sensor readings.
//!
//! This module provides a trait-based abstraction for receiving the reading
//! list from various sources (the sensor HTTP API, a JSON file on disk, or an
//! in-memory channel).

mod channel;
mod client;
mod file;
mod http;

pub use channel::ChannelSource;
pub use client::ApiClient;
pub use file::FileSource;
pub use http::{HttpSource, PollTask};

use std::fmt::Debug;

use crate::data::{PumpState, Reading};

/// Trait for receiving sensor readings from various sources.
///
/// Implementations of this trait provide the reading list from different
/// backends. Every method is non-blocking; sources that talk to the network
/// do so on a background task and hand results over through `poll`.
///
/// # Example
///
/// ```
/// use soilwatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("readings.json");
/// if let Some(readings) = source.poll() {
///     println!("Got {} readings", readings.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest reading list.
    ///
    /// Returns `Some(readings)` if a new list is available, `None` otherwise.
    /// The list replaces whatever the caller held before.
    fn poll(&mut self) -> Option<Vec<Reading>>;

    /// Poll for a pump status answer requested with
    /// [`request_pump_status`](Self::request_pump_status).
    fn poll_pump(&mut self) -> Option<PumpState> {
        None
    }

    /// Ask for a fetch outside the regular cadence.
    fn request_refresh(&mut self) {}

    /// Ask for the pump status to be fetched.
    fn request_pump_status(&mut self) {}

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;

    /// Returns the error message from the last failed fetch, if the most
    /// recent attempt failed.
    fn error(&self) -> Option<&str>;

    /// Returns the error message from the last failed pump status request.
    ///
    /// Kept apart from [`error`](Self::error) so a pump failure never makes
    /// the readings look stale.
    fn pump_error(&self) -> Option<&str> {
        None
    }
}
