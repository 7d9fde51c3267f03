//! History view rendering.
//!
//! A paginated table of the full reading list with localized timestamps,
//! followed by a pagination bar.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::format::{format_row, HEADERS};

/// Render the History view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Min(4), Constraint::Length(1)]).split(area);

    render_table(frame, app, chunks[0]);
    render_pagination(frame, app, chunks[1]);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let total = app.reading_list().len();
    let block = Block::default()
        .title(format!(" History ({} readings) ", total))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if total == 0 {
        let message = if app.readings.is_some() {
            "No readings available"
        } else {
            "Loading..."
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h)))
        .height(1)
        .style(app.theme.header());

    let rows: Vec<Row> = app
        .current_page()
        .iter()
        .map(|reading| {
            let moisture_low = reading
                .soil_moisture
                .is_some_and(|v| v < app.thresholds.soil_moisture_min);
            let ph_low = reading.ph.is_some_and(|v| v < app.thresholds.ph_min);
            let [timestamp, moisture, ph, humidity, temperature] =
                format_row(reading, app.timezone);

            Row::new(vec![
                Cell::from(timestamp),
                Cell::from(moisture).style(low_style(app, moisture_low)),
                Cell::from(ph).style(low_style(app, ph_low)),
                Cell::from(humidity),
                Cell::from(temperature),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(22),
        Constraint::Length(14),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(2);

    frame.render_widget(table, area);
}

fn low_style(app: &App, low: bool) -> Style {
    if low {
        app.theme.level_style(true)
    } else {
        Style::default()
    }
}

/// What a click on a pagination bar control does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    First,
    Prev,
    Page(usize),
    Next,
    Last,
}

/// `« ‹ [1] 2 3 › »  Page 1/3`, each span tagged with the control it draws.
fn pagination_spans(app: &App) -> Vec<(Span<'static>, Option<PageTarget>)> {
    let total = app.reading_list().len();
    let paginator = &app.paginator;
    let dim = Style::default().add_modifier(Modifier::DIM);
    let arrow = |enabled: bool, symbol: &'static str, target: PageTarget| {
        if enabled {
            (Span::raw(symbol), Some(target))
        } else {
            (Span::styled(symbol, dim), None)
        }
    };
    let gap = || (Span::raw(" "), None);

    let mut spans = vec![
        gap(),
        arrow(!paginator.is_first(), "«", PageTarget::First),
        gap(),
        arrow(!paginator.is_first(), "‹", PageTarget::Prev),
        gap(),
    ];

    for page in paginator.visible_pages(total) {
        let span = if page == paginator.current() {
            Span::styled(format!("[{}]", page), app.theme.selected())
        } else {
            Span::raw(format!(" {} ", page))
        };
        spans.push((span, Some(PageTarget::Page(page))));
    }

    spans.push(gap());
    spans.push(arrow(!paginator.is_last(total), "›", PageTarget::Next));
    spans.push(gap());
    spans.push(arrow(!paginator.is_last(total), "»", PageTarget::Last));
    spans.push((
        Span::styled(
            format!(
                "  Page {}/{}",
                paginator.current(),
                paginator.page_count(total)
            ),
            dim,
        ),
        None,
    ));

    spans
}

/// The pagination control drawn at `column` of the pagination row.
pub fn pagination_target_at(app: &App, column: u16) -> Option<PageTarget> {
    let mut x = 0u16;
    for (span, target) in pagination_spans(app) {
        let width = span.width() as u16;
        if column < x + width {
            return target;
        }
        x += width;
    }
    None
}

fn render_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let spans: Vec<Span> = pagination_spans(app).into_iter().map(|(span, _)| span).collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AlertThresholds, Reading};
    use crate::source::ChannelSource;

    fn app(n: usize) -> App {
        let (tx, source) = ChannelSource::create("test");
        tx.send((0..n).map(|i| Reading::new(i as f64, 7.0, 60.0, 25.0)).collect())
            .unwrap();
        let mut app = App::new(Box::new(source), AlertThresholds::default());
        app.reload_data();
        app
    }

    #[test]
    fn test_pagination_targets_follow_layout() {
        let mut app = app(12);

        // " « ‹ [1] 2  3  › »"
        assert_eq!(pagination_target_at(&app, 0), None);
        assert_eq!(pagination_target_at(&app, 1), None);
        assert_eq!(pagination_target_at(&app, 6), Some(PageTarget::Page(1)));
        assert_eq!(pagination_target_at(&app, 9), Some(PageTarget::Page(2)));
        assert_eq!(pagination_target_at(&app, 12), Some(PageTarget::Page(3)));
        assert_eq!(pagination_target_at(&app, 15), Some(PageTarget::Next));
        assert_eq!(pagination_target_at(&app, 17), Some(PageTarget::Last));
        assert_eq!(pagination_target_at(&app, 40), None);

        app.last_page();
        assert_eq!(pagination_target_at(&app, 1), Some(PageTarget::First));
        assert_eq!(pagination_target_at(&app, 3), Some(PageTarget::Prev));
        assert_eq!(pagination_target_at(&app, 15), None);
    }
}
