//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::centered;
use crate::app::{App, InputMode, View};
use crate::data::duration::format_elapsed;

/// Render the header bar with the cluster overview.
///
/// Displays: status indicator, enabled/total clusters, unavailable count,
/// busy indicator while a command is in flight.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let dashboard = &app.dashboard;
    if !dashboard.has_data() {
        let line = Line::from(vec![
            Span::styled(" TRINO DASH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let total = dashboard.clusters.len();
    let enabled = dashboard.enabled_count();
    let unavailable = dashboard.unavailable_count();

    let status_style = if unavailable > 0 {
        app.theme.available_style(false)
    } else {
        app.theme.available_style(true)
    };

    let mut spans = vec![
        Span::styled(" ● ", status_style),
        Span::styled("TRINO DASH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format!("{}/{}", enabled, total),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" clusters enabled "),
        if unavailable > 0 {
            Span::styled(format!("{}", unavailable), app.theme.available_style(false))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" unavailable │ "),
        Span::raw(format!(
            "{} running {} queued",
            dashboard.stats.running_queries, dashboard.stats.queued_queries
        )),
    ];

    if dashboard.is_updating() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            "updating…",
            Style::default()
                .fg(app.theme.muted)
                .add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Overview "), Line::from(" 2:Clusters ")];

    let selected = match app.current_view {
        View::Overview => 0,
        View::Clusters => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the input prompt while typing, otherwise the current notice, or
/// the source, time since last update and available controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    match app.input_mode {
        InputMode::AddCluster => {
            let prompt = format!(
                " Add cluster <name> <url>: {}_ | Enter:add Esc:cancel",
                app.input_buffer
            );
            let paragraph = Paragraph::new(prompt).style(Style::default().fg(app.theme.highlight));
            frame.render_widget(paragraph, area);
            return;
        }
        InputMode::Filter => {
            let prompt = format!(" /{}_ | Enter:apply Esc:done", app.filter_text);
            let paragraph = Paragraph::new(prompt).style(Style::default().fg(app.theme.highlight));
            frame.render_widget(paragraph, area);
            return;
        }
        InputMode::Normal => {}
    }

    if let Some(notice) = app.notice() {
        let paragraph = Paragraph::new(format!(" {} ", notice.message))
            .style(app.theme.notice_style(notice.level));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = "Space:toggle d:discover a:add r:refresh /:search ?:help q:quit";
    let status = match app.dashboard.last_updated() {
        Some(at) => format!(
            " {} | Updated {} ago | {}",
            app.source_description(),
            format_elapsed(at.elapsed()),
            controls
        ),
        None => format!(" {} | Waiting for data... | {}", app.source_description(), controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
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
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ Tab 1/2  Switch views"),
        Line::from("  ↑/↓ j/k      Select cluster"),
        Line::from("  PgUp/PgDn    Jump 10 clusters"),
        Line::from("  Home/End     Jump to first/last"),
        Line::from("  Esc          Go back"),
        Line::from(""),
        section(" Clusters"),
        Line::from("  Space/Enter  Enable/disable"),
        Line::from("  d            Run discovery"),
        Line::from("  a            Add cluster"),
        Line::from("  /            Filter by name/host"),
        Line::from("  c            Clear filter"),
        Line::from(""),
        section(" General"),
        Line::from("  r            Refresh now"),
        Line::from("  e            Export to JSON"),
        Line::from("  q            Quit"),
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

    let help_area = centered(area, 42, 25);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Shown instead of the dashboard when the terminal is below the minimum size.
pub fn render_too_small(frame: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
        area.width,
        area.height,
        super::MIN_WIDTH,
        super::MIN_HEIGHT
    );
    let paragraph = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    let message_area = Rect::new(
        0,
        (area.height / 2).saturating_sub(2),
        area.width,
        5u16.min(area.height),
    );
    frame.render_widget(paragraph, message_area);
}
