//! Terminal rendering with ratatui.

pub mod common;
pub mod dashboard;
pub mod history;
pub mod pump;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Constraint, Layout},
    Frame,
};

use crate::app::{App, View};

/// Row of the History pagination bar: the last content row, just above the
/// status bar.
pub fn pagination_row(height: u16) -> u16 {
    height.saturating_sub(2)
}

/// Draw one full frame: header, tabs, the current view, status bar and
/// any overlays.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Tabs
        Constraint::Min(8),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_tabs(frame, app, chunks[1]);

    match app.current_view {
        View::Dashboard => dashboard::render(frame, app, chunks[2]),
        View::History => history::render(frame, app, chunks[2]),
        View::Pump => pump::render(frame, app, chunks[2]),
    }

    common::render_status_bar(frame, app, chunks[3]);
    common::render_toasts(frame, app, chunks[2]);

    if app.show_pump_dialog {
        common::render_dialog(
            frame,
            app,
            area,
            pump::UNAVAILABLE_TITLE,
            pump::UNAVAILABLE_MESSAGE,
        );
    }

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AlertThresholds, PumpState, Reading};
    use crate::source::ChannelSource;
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::watch;

    fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn app_with(readings: Vec<Reading>) -> App {
        let (tx, source) = ChannelSource::create("test");
        tx.send(readings).unwrap();
        let mut app = App::new(Box::new(source), AlertThresholds::default());
        app.reload_data();
        app
    }

    #[test]
    fn test_dashboard_renders_latest_and_alert() {
        let app = app_with(vec![Reading::new(25.0, 5.5, 60.0, 28.0)]);
        let screen = render_to_string(&app);

        assert!(screen.contains("SOILWATCH"));
        assert!(screen.contains("25%"));
        assert!(screen.contains("soil moisture below 30%"));
    }

    #[test]
    fn test_empty_list_renders_empty_state() {
        let mut app = app_with(Vec::new());
        assert!(render_to_string(&app).contains("No readings available"));

        app.set_view(View::History);
        assert!(render_to_string(&app).contains("No readings available"));
    }

    #[test]
    fn test_history_renders_current_page() {
        let readings = (0..7).map(|i| Reading::new(40.0 + i as f64, 6.5, 70.0, 27.0)).collect();
        let mut app = app_with(readings);
        app.set_view(View::History);
        app.next_page();

        let screen = render_to_string(&app);
        assert!(screen.contains("Page 2/2"));
        assert!(screen.contains("45%"));
        // First page rows are not shown (40% is still in the header)
        assert!(!screen.contains("41%"));
    }

    #[test]
    fn test_pump_dialog_renders() {
        let (_tx, source) = ChannelSource::create("test");
        let (_pump_tx, pump_rx) = watch::channel(PumpState { status: true });
        let mut app = App::new(Box::new(source.with_pump(pump_rx)), AlertThresholds::default());
        app.set_view(View::Pump);
        app.reload_data();
        app.toggle_pump();

        let screen = render_to_string(&app);
        assert!(screen.contains("Status: ON"));
        assert!(screen.contains("Feature under development"));
    }
}
