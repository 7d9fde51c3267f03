//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, help overlay
//! and the alert toast stack.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, View};
use crate::data::format::{format_value, format_with_unit};

/// Render the header bar with the latest reading at a glance.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Span::styled(" SOILWATCH ", Style::default().add_modifier(Modifier::BOLD));

    let Some(latest) = app.latest() else {
        let status = if app.readings.is_some() {
            "No readings yet"
        } else {
            "Loading..."
        };
        let line = Line::from(vec![title, Span::raw(format!("│ {}", status))]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let moisture_low = latest
        .soil_moisture
        .is_some_and(|v| v < app.thresholds.soil_moisture_min);
    let ph_low = latest.ph.is_some_and(|v| v < app.thresholds.ph_min);
    let status_style = app.theme.level_style(moisture_low || ph_low);

    let line = Line::from(vec![
        Span::styled(" ● ", status_style),
        title,
        Span::raw("│ moisture "),
        Span::styled(
            format_with_unit(latest.soil_moisture, "%"),
            app.theme.level_style(moisture_low),
        ),
        Span::raw(" pH "),
        Span::styled(format_value(latest.ph), app.theme.level_style(ph_low)),
        Span::raw(format!(
            " humidity {} temp {} │ ",
            format_with_unit(latest.humidity, "%"),
            format_with_unit(latest.temperature, "°C"),
        )),
        Span::styled(
            app.source_description().to_string(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Dashboard "),
        Line::from(" 2:History "),
        Line::from(" 3:Pump "),
    ];

    let selected = match app.current_view {
        View::Dashboard => 0,
        View::History => 1,
        View::Pump => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab(false))
        .highlight_style(app.theme.tab(true))
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: time since last update, available controls.
/// Also displays temporary status messages.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Dashboard => "Tab:switch r:refresh ?:help q:quit",
        View::History => "n/p:page e:xlsx E:pdf c:csv Tab:switch ?:help q:quit",
        View::Pump => "Enter:toggle Tab:switch ?:help q:quit",
    };

    // Fetch failures are not surfaced beyond a stale marker
    let freshness = match app.last_updated {
        Some(at) if app.source_error().is_some() => {
            format!("Stale, updated {:.0}s ago", at.elapsed().as_secs_f64())
        }
        Some(at) => format!("Updated {:.0}s ago", at.elapsed().as_secs_f64()),
        None => "Waiting for data".to_string(),
    };

    let status = format!(
        " {} | {} | {}",
        app.current_view.label(),
        freshness,
        controls
    );

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render active alert toasts stacked in the top-right corner.
pub fn render_toasts(frame: &mut Frame, app: &App, area: Rect) {
    const TOAST_WIDTH: u16 = 40;
    const TOAST_HEIGHT: u16 = 3;

    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width.saturating_sub(width);
    let mut y = area.y + 1;

    for toast in app.toasts.active() {
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let style = app.theme.severity_style(toast.alert.severity);
        let block = Block::default()
            .title(format!(" {} ", toast.alert.severity.symbol()))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(style);
        let paragraph = Paragraph::new(toast.alert.message.as_str())
            .style(style)
            .block(block);

        let toast_area = Rect::new(x, y, width, TOAST_HEIGHT);
        frame.render_widget(Clear, toast_area);
        frame.render_widget(paragraph, toast_area);
        y += TOAST_HEIGHT;
    }
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header())]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ Tab     Switch views"),
        Line::from("  1/2/3       Dashboard/History/Pump"),
        Line::from(""),
        section(" History"),
        Line::from("  n/p PgDn/PgUp  Next/previous page"),
        Line::from("  Home/End       First/last page"),
        Line::from("  Click « ‹ 1 › » Jump to page"),
        Line::from("  e / E / c      Export xlsx/pdf/csv"),
        Line::from(""),
        section(" Pump"),
        Line::from("  Enter       Toggle pump"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Refresh now"),
        Line::from("  Esc       Dismiss alerts"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_area = centered(area, 42, 24);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Render a small modal with a title and message, centered on `area`.
pub fn render_dialog(frame: &mut Frame, app: &App, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let text = vec![
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Enter/Esc to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    let dialog_area = centered(area, 44, 7);
    frame.render_widget(Clear, dialog_area);
    frame.render_widget(paragraph, dialog_area);
}

/// A rectangle of at most `width` x `height` centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fits_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered(area, 42, 24);
        assert_eq!(rect.width, 42);
        assert_eq!(rect.height, 22);
        assert_eq!(rect.x, 19);
        assert_eq!(rect.y, 1);
    }

    #[test]
    fn test_centered_shrinks_on_small_area() {
        let rect = centered(Rect::new(0, 0, 30, 8), 44, 7);
        assert_eq!(rect.width, 26);
        assert_eq!(rect.height, 6);
    }
}
