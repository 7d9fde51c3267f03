//! Channel-based data source.
//!
//! Receives reading lists via a tokio watch channel. Useful when another
//! part of a program already owns the fetching and only wants the dashboard
//! for display.

use tokio::sync::watch;

use super::DataSource;
use crate::data::{PumpState, Reading};

/// A data source that receives reading lists via a channel.
///
/// The producer sends complete lists; each send replaces the previous one.
///
/// # Example
///
/// ```
/// use soilwatch::{ChannelSource, Reading};
///
/// let (tx, source) = ChannelSource::create("sensor gateway");
/// tx.send(vec![Reading::new(42.0, 6.5, 70.0, 27.0)]).unwrap();
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Vec<Reading>>,
    pump: Option<watch::Receiver<PumpState>>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source from the receiving end of a watch channel.
    pub fn new(receiver: watch::Receiver<Vec<Reading>>, source_description: &str) -> Self {
        Self {
            receiver,
            pump: None,
            description: format!("channel: {}", source_description),
            initial_returned: false,
        }
    }

    /// Create a channel pair for sending reading lists to a ChannelSource.
    ///
    /// Returns (sender, source); the source starts with an empty list.
    pub fn create(source_description: &str) -> (watch::Sender<Vec<Reading>>, Self) {
        let (tx, rx) = watch::channel(Vec::new());
        (tx, Self::new(rx, source_description))
    }

    /// Also receive pump status through a channel.
    pub fn with_pump(mut self, pump: watch::Receiver<PumpState>) -> Self {
        self.pump = Some(pump);
        self
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<Vec<Reading>> {
        // Return the initial value on first poll
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        // Check if there's a new value without blocking
        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn poll_pump(&mut self) -> Option<PumpState> {
        let pump = self.pump.as_mut()?;
        if pump.has_changed().unwrap_or(false) {
            Some(*pump.borrow_and_update())
        } else {
            None
        }
    }

    fn request_pump_status(&mut self) {
        if let Some(pump) = self.pump.as_mut() {
            pump.mark_changed();
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        // Fetch errors belong to whoever feeds the channel
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Initially returns the default (empty) list
        assert_eq!(source.poll(), Some(Vec::new()));

        // No change, so poll returns None
        assert!(source.poll().is_none());

        tx.send(vec![Reading::new(25.0, 5.5, 60.0, 28.0)]).unwrap();

        let readings = source.poll().unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(source.description(), "channel: test");
    }

    #[test]
    fn test_channel_source_pump() {
        let (_tx, source) = ChannelSource::create("test");
        let (pump_tx, pump_rx) = watch::channel(PumpState::default());
        let mut source = source.with_pump(pump_rx);

        assert!(source.poll_pump().is_none());

        source.request_pump_status();
        assert_eq!(source.poll_pump(), Some(PumpState { status: false }));

        pump_tx.send(PumpState { status: true }).unwrap();
        assert_eq!(source.poll_pump(), Some(PumpState { status: true }));
    }

    #[test]
    fn test_channel_source_without_pump() {
        let (_tx, mut source) = ChannelSource::create("test");
        source.request_pump_status();
        assert!(source.poll_pump().is_none());
    }
}
