//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::NoticeLevel;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for clusters that are up, and for info notices.
    pub good: Color,
    /// Color for disabled clusters and in-flight commands.
    pub muted: Color,
    /// Color for unavailable clusters and error notices.
    pub bad: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            good: Color::Green,
            muted: Color::Yellow,
            bad: Color::Red,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            good: Color::Green,
            muted: Color::Magenta,
            bad: Color::Red,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a cluster's availability flag.
    pub fn available_style(&self, available: bool) -> Style {
        if available {
            Style::default().fg(self.good)
        } else {
            Style::default().fg(self.bad).add_modifier(Modifier::BOLD)
        }
    }

    /// Style for a cluster's enabled flag.
    pub fn enabled_style(&self, enabled: bool) -> Style {
        if enabled {
            Style::default().fg(self.good)
        } else {
            Style::default().fg(self.muted)
        }
    }

    /// Style for a status bar notice.
    pub fn notice_style(&self, level: NoticeLevel) -> Style {
        match level {
            NoticeLevel::Info => Style::default().fg(self.highlight),
            NoticeLevel::Error => Style::default().fg(self.bad).add_modifier(Modifier::BOLD),
        }
    }
}
