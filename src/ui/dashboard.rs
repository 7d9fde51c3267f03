//! Dashboard view rendering.
//!
//! Four gauges for the latest reading above two line charts of the
//! moisture and pH series.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::format::{format_value, format_with_unit};
use crate::data::series::{plottable, Point};

/// Upper end of the pH scale.
const PH_MAX: f64 = 14.0;

/// Gauge scale for temperature in °C.
const TEMPERATURE_MAX: f64 = 50.0;

/// Render the Dashboard view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(6)]).split(area);

    render_gauges(frame, app, chunks[0]);

    if app.series.is_empty() {
        let message = if app.readings.is_some() {
            "No readings available"
        } else {
            "Waiting for the first reading..."
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(bordered(app, " Charts "));
        frame.render_widget(paragraph, chunks[1]);
        return;
    }

    let charts = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_chart(
        frame,
        app,
        charts[0],
        " Soil Moisture (%) ",
        &app.series.soil_moisture,
        app.theme.moisture,
        (0.0, 100.0),
    );
    render_chart(
        frame,
        app,
        charts[1],
        " Soil pH ",
        &app.series.ph,
        app.theme.ph,
        (0.0, PH_MAX),
    );
}

fn render_gauges(frame: &mut Frame, app: &App, area: Rect) {
    let cells = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
    let latest = app.latest();

    let moisture = latest.and_then(|r| r.soil_moisture);
    let moisture_low = moisture.is_some_and(|v| v < app.thresholds.soil_moisture_min);
    let moisture_color = if moisture_low {
        app.theme.critical
    } else {
        app.theme.moisture
    };
    render_gauge(
        frame,
        app,
        cells[0],
        " Moisture ",
        moisture.map(|v| v / 100.0),
        format_with_unit(moisture, "%"),
        moisture_color,
    );

    let ph = latest.and_then(|r| r.ph);
    let ph_color = if ph.is_some_and(|v| v < app.thresholds.ph_min) {
        app.theme.warning
    } else {
        app.theme.ph
    };
    render_gauge(
        frame,
        app,
        cells[1],
        " pH ",
        ph.map(|v| v / PH_MAX),
        format_value(ph),
        ph_color,
    );

    let humidity = latest.and_then(|r| r.humidity);
    render_gauge(
        frame,
        app,
        cells[2],
        " Humidity ",
        humidity.map(|v| v / 100.0),
        format_with_unit(humidity, "%"),
        app.theme.humidity,
    );

    let temperature = latest.and_then(|r| r.temperature);
    render_gauge(
        frame,
        app,
        cells[3],
        " Temperature ",
        temperature.map(|v| v / TEMPERATURE_MAX),
        format_with_unit(temperature, "°C"),
        app.theme.temperature,
    );
}

fn render_gauge(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    ratio: Option<f64>,
    label: String,
    color: ratatui::style::Color,
) {
    // Out-of-range readings are shown as-is in the label, only the bar is clamped
    let ratio = ratio.unwrap_or(0.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(bordered(app, title))
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(Span::styled(label, Style::default().add_modifier(Modifier::BOLD)));
    frame.render_widget(gauge, area);
}

fn render_chart(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    points: &[Point],
    color: ratatui::style::Color,
    (y_min, y_max): (f64, f64),
) {
    let data = plottable(points);
    let x_max = (points.len() as f64).max(2.0);

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&data);

    let axis_style = Style::default().fg(app.theme.border);
    let chart = Chart::new(vec![dataset])
        .block(bordered(app, title))
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds([1.0, x_max])
                .labels(["1".to_string(), format!("{}", points.len())]),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds([y_min, y_max])
                .labels([
                    format!("{}", y_min),
                    format!("{}", (y_min + y_max) / 2.0),
                    format!("{}", y_max),
                ]),
        );

    frame.render_widget(chart, area);
}

fn bordered<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}
