//! Dashboard palette.
//!
//! Every style the views use is derived from a handful of colors, so the
//! dark and light variants only differ in their palette.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Severity;

#[derive(Debug, Clone)]
pub struct Theme {
    /// Titles, table headers, the active tab and key hints.
    pub highlight: Color,
    pub warning: Color,
    /// Error alerts and values below their threshold.
    pub critical: Color,
    pub healthy: Color,
    /// Per-metric colors, shared by a gauge and its chart line.
    pub moisture: Color,
    pub ph: Color,
    pub humidity: Color,
    pub temperature: Color,
    pub border: Color,
    /// Background behind the current page number.
    pub selected_bg: Color,
    pub border_type: BorderType,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            moisture: Color::LightBlue,
            ph: Color::LightGreen,
            humidity: Color::Cyan,
            temperature: Color::LightRed,
            border: Color::Gray,
            selected_bg: Color::DarkGray,
            border_type: BorderType::Rounded,
        }
    }

    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            moisture: Color::Blue,
            ph: Color::Green,
            temperature: Color::Red,
            border: Color::DarkGray,
            selected_bg: Color::LightBlue,
            ..Self::dark()
        }
    }

    /// Light palette when the terminal background is bright, dark otherwise
    /// (including when the background can't be queried).
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab(&self, active: bool) -> Style {
        if active {
            self.header()
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Warning => Style::default().fg(self.warning),
            Severity::Error => self.level_style(true),
        }
    }

    /// Style for a value that is either within range or below its threshold.
    pub fn level_style(&self, low: bool) -> Style {
        if low {
            Style::default()
                .fg(self.critical)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.healthy)
        }
    }
}
