//! HTTP polling data source.
//!
//! Fetches the reading list from the sensor API on a fixed interval.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::{ApiClient, DataSource};
use crate::data::{PumpState, Reading};
use crate::error::FetchError;

/// Requests from the UI thread to the polling task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Refresh,
    PumpStatus,
}

/// Results from the polling task to the UI thread.
#[derive(Debug)]
enum Update {
    Readings {
        generation: u64,
        readings: Vec<Reading>,
    },
    FetchFailed {
        generation: u64,
        error: FetchError,
    },
    Pump(PumpState),
    PumpFailed(FetchError),
}

/// Owns a background task and aborts it when dropped.
///
/// This is the repeating-task handle of a source: dropping the source drops
/// the handle, so no timer outlives the view that started it.
#[derive(Debug)]
pub struct PollTask {
    handle: JoinHandle<()>,
}

impl PollTask {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    /// Stop the task now.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A data source that polls the sensor API.
///
/// One background task owns the interval timer and performs every request in
/// turn, so responses are produced in request order. Each readings response
/// carries a generation number and [`poll`](DataSource::poll) never applies a
/// generation older than one it already returned.
///
/// Must be created inside a tokio runtime.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use soilwatch::{ApiClient, HttpSource};
/// use soilwatch::config::ApiSettings;
///
/// # tokio_test::block_on(async {
/// let client = ApiClient::new(&ApiSettings::default()).unwrap();
/// let source = HttpSource::spawn(client, Duration::from_secs(60));
/// # });
/// ```
#[derive(Debug)]
pub struct HttpSource {
    commands: mpsc::Sender<Command>,
    updates: mpsc::Receiver<Update>,
    description: String,
    applied_generation: u64,
    ready: Option<Vec<Reading>>,
    pump: Option<PumpState>,
    last_error: Option<String>,
    pump_error: Option<String>,
    task: PollTask,
}

impl HttpSource {
    /// Start polling: one fetch immediately, then one per `interval`.
    pub fn spawn(client: ApiClient, interval: Duration) -> Self {
        let (command_tx, command_rx) = mpsc::channel(8);
        let (update_tx, update_rx) = mpsc::channel(16);
        let description = format!("http: {}", client.readings_url());

        let handle = tokio::spawn(run_poll_loop(client, interval, command_rx, update_tx));

        Self {
            commands: command_tx,
            updates: update_rx,
            description,
            applied_generation: 0,
            ready: None,
            pump: None,
            last_error: None,
            pump_error: None,
            task: PollTask::new(handle),
        }
    }

    /// Stop polling. Later calls to `poll` return nothing new.
    pub fn cancel(&self) {
        self.task.cancel();
    }

    fn send(&self, command: Command) {
        // A full queue already holds a pending request of some kind.
        if let Err(e) = self.commands.try_send(command) {
            debug!(?command, error = %e, "Dropped poll command");
        }
    }
}

async fn run_poll_loop(
    client: ApiClient,
    interval: Duration,
    mut commands: mpsc::Receiver<Command>,
    updates: mpsc::Sender<Update>,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut generation = 0u64;

    info!(
        url = %client.readings_url(),
        interval_secs = interval.as_secs(),
        "Sensor polling started"
    );

    loop {
        let command = tokio::select! {
            _ = ticker.tick() => Command::Refresh,
            command = commands.recv() => match command {
                Some(command) => command,
                None => break,
            },
        };

        let update = match command {
            Command::Refresh => {
                generation += 1;
                match client.fetch_readings().await {
                    Ok(readings) => Update::Readings {
                        generation,
                        readings,
                    },
                    Err(error) => {
                        warn!(generation, error = %error, "Failed to fetch readings");
                        Update::FetchFailed { generation, error }
                    }
                }
            }
            Command::PumpStatus => match client.fetch_pump_status().await {
                Ok(state) => Update::Pump(state),
                Err(error) => {
                    warn!(error = %error, "Failed to fetch pump status");
                    Update::PumpFailed(error)
                }
            },
        };

        if updates.send(update).await.is_err() {
            // Receiver dropped
            break;
        }
    }

    debug!("Sensor polling stopped");
}

impl HttpSource {
    /// Apply every update the task has produced so far.
    fn drain(&mut self) {
        while let Ok(update) = self.updates.try_recv() {
            match update {
                Update::Readings {
                    generation,
                    readings,
                } => {
                    if generation <= self.applied_generation {
                        debug!(generation, "Ignoring stale readings response");
                        continue;
                    }
                    self.applied_generation = generation;
                    self.last_error = None;
                    self.ready = Some(readings);
                }
                Update::FetchFailed { generation, error } => {
                    if generation > self.applied_generation {
                        self.last_error = Some(error.to_string());
                    }
                }
                Update::Pump(state) => {
                    self.pump_error = None;
                    self.pump = Some(state);
                }
                Update::PumpFailed(error) => self.pump_error = Some(error.to_string()),
            }
        }
    }
}

impl DataSource for HttpSource {
    fn poll(&mut self) -> Option<Vec<Reading>> {
        self.drain();
        self.ready.take()
    }

    fn poll_pump(&mut self) -> Option<PumpState> {
        self.drain();
        self.pump.take()
    }

    fn request_refresh(&mut self) {
        self.send(Command::Refresh);
    }

    fn request_pump_status(&mut self) {
        self.send(Command::PumpStatus);
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn pump_error(&self) -> Option<&str> {
        self.pump_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiSettings;
    use crate::source::client::test_server::{closed_port, serve};

    const SETTLE: Duration = Duration::from_millis(300);

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiSettings {
            readings_url: format!("{}/api/data", base),
            pump_url: format!("{}/api/pump", base),
            timeout_secs: 2,
            ..ApiSettings::default()
        })
        .unwrap()
    }

    fn detached_source() -> (mpsc::Sender<Update>, HttpSource) {
        let (command_tx, _command_rx) = mpsc::channel(8);
        let (update_tx, update_rx) = mpsc::channel(16);
        let source = HttpSource {
            commands: command_tx,
            updates: update_rx,
            description: "http: test".to_string(),
            applied_generation: 0,
            ready: None,
            pump: None,
            last_error: None,
            pump_error: None,
            task: PollTask::new(tokio::spawn(async {})),
        };
        (update_tx, source)
    }

    #[tokio::test]
    async fn test_http_source_fetches_on_start() {
        let base = serve(200, r#"[{"soil_moisture":25,"pH":5.5},{"soil_moisture":31}]"#).await;
        let mut source = HttpSource::spawn(client(&base), Duration::from_secs(60));
        assert!(source.description().starts_with("http: "));

        tokio::time::sleep(SETTLE).await;

        let readings = source.poll().expect("initial fetch");
        assert_eq!(readings.len(), 2);
        assert!(source.error().is_none());

        // Nothing new until the next tick or refresh
        assert!(source.poll().is_none());
    }

    #[tokio::test]
    async fn test_http_source_refresh_on_request() {
        let base = serve(200, "[]").await;
        let mut source = HttpSource::spawn(client(&base), Duration::from_secs(60));

        tokio::time::sleep(SETTLE).await;
        assert!(source.poll().is_some());

        source.request_refresh();
        tokio::time::sleep(SETTLE).await;
        assert_eq!(source.poll(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_http_source_failure_keeps_nothing_and_records_error() {
        let base = closed_port().await;
        let mut source = HttpSource::spawn(client(&base), Duration::from_secs(60));

        tokio::time::sleep(SETTLE).await;

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Connection failed"));
    }

    #[tokio::test]
    async fn test_http_source_pump_status() {
        let base = serve(200, r#"{"status":true}"#).await;
        let mut source = HttpSource::spawn(client(&base), Duration::from_secs(60));

        source.request_pump_status();
        tokio::time::sleep(SETTLE).await;

        assert_eq!(source.poll_pump(), Some(PumpState { status: true }));
        assert!(source.poll_pump().is_none());
    }

    #[tokio::test]
    async fn test_drop_aborts_poll_task() {
        let base = serve(200, "[]").await;
        let source = HttpSource::spawn(client(&base), Duration::from_millis(50));
        let abort_handle = source.task.handle.abort_handle();

        drop(source);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(abort_handle.is_finished());
    }

    #[tokio::test]
    async fn test_cancel_stops_polling() {
        let base = serve(200, "[]").await;
        let source = HttpSource::spawn(client(&base), Duration::from_millis(50));

        source.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(source.task.is_finished());
    }

    #[tokio::test]
    async fn test_stale_generation_ignored() {
        let (tx, mut source) = detached_source();

        tx.send(Update::Readings {
            generation: 2,
            readings: vec![Reading::new(50.0, 7.0, 60.0, 25.0)],
        })
        .await
        .unwrap();
        tx.send(Update::Readings {
            generation: 1,
            readings: Vec::new(),
        })
        .await
        .unwrap();

        let readings = source.poll().unwrap();
        assert_eq!(readings.len(), 1);

        tx.send(Update::Readings {
            generation: 1,
            readings: Vec::new(),
        })
        .await
        .unwrap();
        assert!(source.poll().is_none());
    }

    #[tokio::test]
    async fn test_failure_after_success_keeps_error_until_next_success() {
        let (tx, mut source) = detached_source();

        tx.send(Update::Readings {
            generation: 1,
            readings: Vec::new(),
        })
        .await
        .unwrap();
        tx.send(Update::FetchFailed {
            generation: 2,
            error: FetchError::Timeout,
        })
        .await
        .unwrap();

        assert_eq!(source.poll(), Some(Vec::new()));
        assert_eq!(source.error(), Some("Request timed out"));

        tx.send(Update::Readings {
            generation: 3,
            readings: Vec::new(),
        })
        .await
        .unwrap();
        assert!(source.poll().is_some());
        assert!(source.error().is_none());
    }

    #[tokio::test]
    async fn test_pump_failure_does_not_mark_readings_stale() {
        let (tx, mut source) = detached_source();

        tx.send(Update::Readings {
            generation: 1,
            readings: Vec::new(),
        })
        .await
        .unwrap();
        tx.send(Update::PumpFailed(FetchError::Connection("refused".to_string())))
            .await
            .unwrap();

        assert!(source.poll().is_some());
        assert!(source.error().is_none());
        assert_eq!(source.pump_error(), Some("Connection failed: refused"));

        tx.send(Update::Pump(PumpState { status: false })).await.unwrap();
        assert_eq!(source.poll_pump(), Some(PumpState { status: false }));
        assert!(source.pump_error().is_none());
        assert!(source.error().is_none());
    }
}
