use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};
use crate::export::ExportFormat;
use crate::ui::{
    self,
    history::{pagination_target_at, PageTarget},
};

/// Row of the tab bar (after the header).
const TAB_ROW: u16 = 1;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // The pump dialog is modal
    if app.show_pump_dialog {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('q')
        ) {
            app.close_pump_dialog();
        }
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Dashboard),
        KeyCode::Char('2') => app.set_view(View::History),
        KeyCode::Char('3') => app.set_view(View::Pump),

        // Fetch now
        KeyCode::Char('r') => app.refresh(),

        // Dismiss alerts
        KeyCode::Esc => app.toasts.dismiss_all(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => match app.current_view {
            View::History => handle_history_key(app, key),
            View::Pump => handle_pump_key(app, key),
            View::Dashboard => {}
        },
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('n') | KeyCode::PageDown | KeyCode::Down | KeyCode::Char('j') => {
            app.next_page()
        }
        KeyCode::Char('p') | KeyCode::PageUp | KeyCode::Up | KeyCode::Char('k') => {
            app.prev_page()
        }
        KeyCode::Home | KeyCode::Char('g') => app.first_page(),
        KeyCode::End | KeyCode::Char('G') => app.last_page(),

        // Export the full list
        KeyCode::Char('e') => app.export(ExportFormat::Xlsx),
        KeyCode::Char('E') => app.export(ExportFormat::Pdf),
        KeyCode::Char('c') => app.export(ExportFormat::Csv),

        _ => {}
    }
}

fn handle_pump_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('t')) {
        app.toggle_pump();
    }
}

/// Handle mouse events on a terminal `height` rows tall
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, height: u16) {
    match mouse.kind {
        // Scroll wheel pages through history
        MouseEventKind::ScrollUp if app.current_view == View::History => app.prev_page(),
        MouseEventKind::ScrollDown if app.current_view == View::History => app.next_page(),

        MouseEventKind::Down(MouseButton::Left) => {
            if app.show_pump_dialog {
                app.close_pump_dialog();
                return;
            }

            // Approximate tab positions: Dashboard (0-15), History (16-29), Pump (30-41)
            if mouse.row == TAB_ROW {
                let col = mouse.column;
                if col < 16 {
                    app.set_view(View::Dashboard);
                } else if col < 30 {
                    app.set_view(View::History);
                } else if col < 42 {
                    app.set_view(View::Pump);
                }
            } else if app.current_view == View::History && mouse.row == ui::pagination_row(height)
            {
                handle_pagination_click(app, mouse.column);
            }
        }

        _ => {}
    }
}

fn handle_pagination_click(app: &mut App, column: u16) {
    match pagination_target_at(app, column) {
        Some(PageTarget::First) => app.first_page(),
        Some(PageTarget::Prev) => app.prev_page(),
        Some(PageTarget::Page(page)) => app.goto_page(page),
        Some(PageTarget::Next) => app.next_page(),
        Some(PageTarget::Last) => app.last_page(),
        None => {}
    }
}
