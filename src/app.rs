//! Application state and navigation logic.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono_tz::Tz;
use tracing::debug;

use crate::data::alert::{self, Alert, AlertThresholds, Notifier};
use crate::data::reading;
use crate::data::format::DEFAULT_TIMEZONE;
use crate::data::{ChartSeries, Paginator, PumpState, Reading};
use crate::export::{self, ExportFormat};
use crate::source::DataSource;
use crate::ui::Theme;

/// How long an alert toast stays on screen.
const TOAST_TTL: Duration = Duration::from_secs(5);

/// How long a status message stays in the status bar.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Toasts beyond this many are dropped oldest first.
const MAX_TOASTS: usize = 6;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Live gauges and charts for the latest readings.
    Dashboard,
    /// Paginated table of every reading with export.
    History,
    /// Pump state and (unavailable) control.
    Pump,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Dashboard => View::History,
            View::History => View::Pump,
            View::Pump => View::Dashboard,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Dashboard => View::Pump,
            View::History => View::Dashboard,
            View::Pump => View::History,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::History => "History",
            View::Pump => "Pump",
        }
    }
}

/// An alert on screen since `shown_at`.
#[derive(Debug, Clone)]
pub struct Toast {
    pub alert: Alert,
    pub shown_at: Instant,
}

/// Transient on-screen alert notifications.
#[derive(Debug, Default)]
pub struct Toasts {
    items: VecDeque<Toast>,
}

impl Toasts {
    /// Toasts that have not expired yet, oldest first.
    pub fn active(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter().filter(|t| t.shown_at.elapsed() < TOAST_TTL)
    }

    /// Drop expired toasts.
    pub fn prune(&mut self) {
        self.items.retain(|t| t.shown_at.elapsed() < TOAST_TTL);
    }

    pub fn dismiss_all(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Notifier for Toasts {
    fn notify(&mut self, alert: &Alert) {
        self.items.push_back(Toast {
            alert: alert.clone(),
            shown_at: Instant::now(),
        });
        while self.items.len() > MAX_TOASTS {
            self.items.pop_front();
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    /// The "pump control is not available" dialog is open.
    pub show_pump_dialog: bool,

    // Data source
    source: Box<dyn DataSource>,
    /// `None` until the first successful fetch.
    pub readings: Option<Vec<Reading>>,
    pub series: ChartSeries,
    pub last_updated: Option<Instant>,
    pub thresholds: AlertThresholds,

    // Pump
    pub pump: Option<PumpState>,
    /// Desired pump state from the last toggle; never transmitted.
    pub pump_intent: Option<bool>,

    // History
    pub paginator: Paginator,
    pub timezone: Tz,
    pub export_dir: PathBuf,

    // UI
    pub theme: Theme,
    pub toasts: Toasts,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given data source and thresholds.
    pub fn new(source: Box<dyn DataSource>, thresholds: AlertThresholds) -> Self {
        Self {
            running: true,
            current_view: View::Dashboard,
            show_help: false,
            show_pump_dialog: false,
            source,
            readings: None,
            series: ChartSeries::default(),
            last_updated: None,
            thresholds,
            pump: None,
            pump_intent: None,
            paginator: Paginator::default(),
            timezone: DEFAULT_TIMEZONE,
            export_dir: PathBuf::from("."),
            theme: Theme::dark(),
            toasts: Toasts::default(),
            status_message: None,
        }
    }

    /// Use a page size other than the default.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.paginator = Paginator::new(page_size);
        self
    }

    /// Show and export timestamps in `tz`.
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    /// Write export files into `dir`.
    pub fn with_export_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.export_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Error of the source's most recent failed fetch, if any.
    pub fn source_error(&self) -> Option<&str> {
        self.source.error()
    }

    /// Error of the last failed pump status request, if any.
    pub fn pump_error(&self) -> Option<&str> {
        self.source.pump_error()
    }

    /// The reading list, empty before the first fetch.
    pub fn reading_list(&self) -> &[Reading] {
        self.readings.as_deref().unwrap_or(&[])
    }

    /// The newest reading, if any.
    pub fn latest(&self) -> Option<&Reading> {
        reading::latest(self.reading_list())
    }

    /// Rows of the current history page.
    pub fn current_page(&self) -> &[Reading] {
        self.paginator.page(self.reading_list())
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Drain the data source.
    ///
    /// A new reading list replaces the old one wholesale; derived views are
    /// recomputed and the latest reading is checked for alerts. Returns
    /// `true` if a new list was applied.
    pub fn reload_data(&mut self) -> bool {
        if let Some(pump) = self.source.poll_pump() {
            self.pump = Some(pump);
        }

        let Some(readings) = self.source.poll() else {
            return false;
        };

        debug!(count = readings.len(), "Applying new readings");
        self.apply_readings(readings);
        true
    }

    fn apply_readings(&mut self, readings: Vec<Reading>) {
        self.series = ChartSeries::project(&readings);
        self.paginator.clamp(readings.len());
        alert::notify_latest(&readings, &self.thresholds, &mut self.toasts);
        self.readings = Some(readings);
        self.last_updated = Some(Instant::now());
    }

    /// Ask the source for an immediate fetch.
    pub fn refresh(&mut self) {
        self.source.request_refresh();
        self.set_status_message("Refreshing...".to_string());
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    /// Switch to a specific view. Entering the pump view fetches its status.
    pub fn set_view(&mut self, view: View) {
        if view == View::Pump && self.current_view != View::Pump {
            self.source.request_pump_status();
        }
        self.current_view = view;
    }

    // History paging

    pub fn next_page(&mut self) {
        let total = self.reading_list().len();
        self.paginator.next(total);
    }

    pub fn prev_page(&mut self) {
        self.paginator.prev();
    }

    pub fn first_page(&mut self) {
        self.paginator.first();
    }

    pub fn last_page(&mut self) {
        let total = self.reading_list().len();
        self.paginator.last(total);
    }

    pub fn goto_page(&mut self, page: usize) {
        let total = self.reading_list().len();
        self.paginator.goto(page, total);
    }

    /// Record the wish to flip the pump and show the "not available" dialog.
    pub fn toggle_pump(&mut self) {
        let current = self.pump.map(|p| p.status).unwrap_or(false);
        self.pump_intent = Some(!current);
        self.show_pump_dialog = true;
    }

    pub fn close_pump_dialog(&mut self) {
        self.show_pump_dialog = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the full reading list and report the outcome in the status bar.
    pub fn export(&mut self, format: ExportFormat) {
        let result = export::export(self.reading_list(), format, &self.export_dir, self.timezone);
        match result {
            Ok(path) => self.set_status_message(format!("Exported to {}", path.display())),
            Err(e) => {
                tracing::warn!(?format, error = %e, "Export failed");
                self.set_status_message(format!("Export failed: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AlertKind, Severity};
    use crate::source::ChannelSource;
    use tempfile::tempdir;
    use tokio::sync::watch;

    fn app_with_channel() -> (watch::Sender<Vec<Reading>>, App) {
        let (tx, source) = ChannelSource::create("test");
        (tx, App::new(Box::new(source), AlertThresholds::default()))
    }

    fn many(n: usize) -> Vec<Reading> {
        (0..n).map(|i| Reading::new(50.0 + i as f64, 7.0, 60.0, 25.0)).collect()
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Dashboard.next(), View::History);
        assert_eq!(View::Pump.next(), View::Dashboard);
        assert_eq!(View::Dashboard.prev(), View::Pump);
        assert_eq!(View::History.label(), "History");
    }

    #[test]
    fn test_initial_empty_list_is_valid() {
        let (_tx, mut app) = app_with_channel();
        assert!(app.readings.is_none());

        assert!(app.reload_data());
        assert_eq!(app.reading_list().len(), 0);
        assert!(app.latest().is_none());
        assert!(app.series.is_empty());
        assert!(app.toasts.is_empty());
        assert_eq!(app.paginator.page_count(0), 1);
        assert!(app.current_page().is_empty());
    }

    #[test]
    fn test_reload_replaces_list_and_raises_alerts() {
        let (tx, mut app) = app_with_channel();
        app.reload_data();

        tx.send(vec![
            Reading::new(25.0, 5.5, 60.0, 28.0),
            Reading::new(80.0, 7.0, 60.0, 28.0),
        ])
        .unwrap();
        assert!(app.reload_data());

        assert_eq!(app.reading_list().len(), 2);
        assert_eq!(app.series.len(), 2);

        let toasts: Vec<&Toast> = app.toasts.active().collect();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].alert.kind, AlertKind::SoilMoisture);
        assert_eq!(toasts[0].alert.severity, Severity::Error);
        assert_eq!(toasts[1].alert.kind, AlertKind::Ph);

        // No new data, nothing changes
        assert!(!app.reload_data());
        assert_eq!(app.toasts.len(), 2);
    }

    #[test]
    fn test_alerts_retrigger_each_poll() {
        let (tx, mut app) = app_with_channel();
        tx.send(vec![Reading::new(10.0, 7.0, 60.0, 28.0)]).unwrap();
        app.reload_data();
        tx.send(vec![Reading::new(12.0, 7.0, 60.0, 28.0)]).unwrap();
        app.reload_data();

        assert_eq!(app.toasts.len(), 2);
    }

    #[test]
    fn test_toasts_capped() {
        let mut toasts = Toasts::default();
        let alert = Alert {
            kind: AlertKind::Ph,
            severity: Severity::Warning,
            message: "x".to_string(),
        };
        for _ in 0..10 {
            toasts.notify(&alert);
        }
        assert_eq!(toasts.len(), MAX_TOASTS);

        toasts.dismiss_all();
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_paging_through_history() {
        let (tx, mut app) = app_with_channel();
        tx.send(many(12)).unwrap();
        app.reload_data();

        assert_eq!(app.current_page().len(), 5);
        app.next_page();
        app.next_page();
        app.next_page();
        assert_eq!(app.paginator.current(), 3);
        assert_eq!(app.current_page().len(), 2);
        assert_eq!(app.current_page()[0].soil_moisture, Some(60.0));

        app.first_page();
        assert_eq!(app.paginator.current(), 1);
        app.prev_page();
        assert_eq!(app.paginator.current(), 1);
        app.last_page();
        assert_eq!(app.paginator.current(), 3);
        app.goto_page(2);
        assert_eq!(app.paginator.current(), 2);
    }

    #[test]
    fn test_page_reclamped_when_list_shrinks() {
        let (tx, mut app) = app_with_channel();
        tx.send(many(12)).unwrap();
        app.reload_data();
        app.last_page();

        tx.send(many(3)).unwrap();
        app.reload_data();
        assert_eq!(app.paginator.current(), 1);
        assert_eq!(app.current_page().len(), 3);
    }

    #[test]
    fn test_pump_toggle_records_intent_only() {
        let (_tx, source) = ChannelSource::create("test");
        let (_pump_tx, pump_rx) = watch::channel(PumpState { status: true });
        let mut app = App::new(Box::new(source.with_pump(pump_rx)), AlertThresholds::default());

        app.set_view(View::Pump);
        app.reload_data();
        assert_eq!(app.pump, Some(PumpState { status: true }));

        app.toggle_pump();
        assert!(app.show_pump_dialog);
        assert_eq!(app.pump_intent, Some(false));
        assert_eq!(app.pump, Some(PumpState { status: true }));

        app.close_pump_dialog();
        assert!(!app.show_pump_dialog);
    }

    #[test]
    fn test_export_from_app() {
        let dir = tempdir().unwrap();
        let (tx, app) = app_with_channel();
        let mut app = app.with_export_dir(dir.path());
        tx.send(many(7)).unwrap();
        app.reload_data();

        app.export(ExportFormat::Csv);

        let content = std::fs::read_to_string(dir.path().join("history_data.csv")).unwrap();
        // Full list, not just the visible page
        assert_eq!(content.lines().count(), 8);
        assert!(app.get_status_message().unwrap().starts_with("Exported to"));
    }

    #[test]
    fn test_status_message() {
        let (_tx, mut app) = app_with_channel();
        assert!(app.get_status_message().is_none());
        app.set_status_message("hello".to_string());
        assert_eq!(app.get_status_message(), Some("hello"));
    }
}
