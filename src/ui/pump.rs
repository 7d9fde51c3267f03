//! Pump view rendering.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Shown when the user tries to switch the pump.
pub const UNAVAILABLE_TITLE: &str = "Pump Control";
pub const UNAVAILABLE_MESSAGE: &str = "Feature under development";

/// Render the Pump view: current state and the toggle hint.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Water Pump ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let state = match app.pump {
        Some(pump) => {
            let style = if pump.status {
                Style::default().fg(app.theme.healthy)
            } else {
                Style::default().fg(app.theme.border)
            };
            Span::styled(pump.label(), style.add_modifier(Modifier::BOLD))
        }
        None => Span::styled("Unknown", Style::default().add_modifier(Modifier::DIM)),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![Span::raw("Status: "), state]),
        Line::from(""),
    ];

    if let Some(error) = app.pump_error() {
        lines.push(Line::from(Span::styled(
            format!("Status request failed: {}", error),
            Style::default().fg(app.theme.warning),
        )));
        lines.push(Line::from(""));
    }

    if let Some(intent) = app.pump_intent {
        lines.push(Line::from(Span::styled(
            format!("Requested: {}", if intent { "ON" } else { "OFF" }),
            Style::default().add_modifier(Modifier::DIM),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Press Enter to toggle",
        Style::default().fg(app.theme.highlight),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}
