//! Overview rendering: stat cards, the live query chart and a compact
//! cluster list.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::chart;
use crate::app::App;

/// Render the Overview view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([Constraint::Length(4), Constraint::Min(6)]).split(area);
    render_cards(frame, app, rows[0]);

    let body =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).split(rows[1]);
    render_chart(frame, app, body[0]);
    render_cluster_list(frame, app, body[1]);
}

fn render_cards(frame: &mut Frame, app: &App, area: Rect) {
    let stats = &app.dashboard.stats;
    let cards = [
        ("Workers", stats.total_workers, app.theme.highlight),
        ("Running", stats.running_queries, app.chart.running_color),
        ("Blocked", stats.blocked_queries, app.chart.blocked_color),
        ("Queued", stats.queued_queries, app.theme.muted),
    ];

    let columns = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
    for ((title, value, color), column) in cards.into_iter().zip(columns.iter()) {
        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        let paragraph = Paragraph::new(Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(paragraph, *column);
    }
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let options = &app.chart;
    let running = &app.dashboard.running_queries;
    let blocked = &app.dashboard.blocked_queries;

    let block = Block::default()
        .title(" Queries ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(origin) = chart::origin(&[running, blocked]) else {
        let paragraph = Paragraph::new("Waiting for statistics...")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let running_points = chart::points(running, origin);
    let blocked_points = chart::points(blocked, origin);
    let x_bounds = chart::x_bounds(&[&running_points[..], &blocked_points[..]]);
    let y_bounds = options.y_bounds(&[running, blocked]);
    let label_style = Style::default().fg(options.label_color);

    let datasets = vec![
        Dataset::default()
            .name("running")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(options.running_color))
            .data(&running_points),
        Dataset::default()
            .name("blocked")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(options.blocked_color))
            .data(&blocked_points),
    ];

    let widget = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(label_style)
                .bounds(x_bounds)
                .labels(options.x_labels(origin, x_bounds[1])),
        )
        .y_axis(
            Axis::default()
                .style(label_style)
                .bounds(y_bounds)
                .labels(options.y_labels(y_bounds)),
        );

    frame.render_widget(widget, area);
}

fn render_cluster_list(frame: &mut Frame, app: &App, area: Rect) {
    let clusters = app.visible_clusters();

    let items: Vec<ListItem> = clusters
        .iter()
        .map(|c| {
            ListItem::new(Line::from(vec![
                Span::styled("● ", app.theme.available_style(c.available)),
                Span::raw(c.name.clone()),
                Span::raw(" "),
                Span::styled(
                    if c.enabled { "on" } else { "off" },
                    app.theme.enabled_style(c.enabled),
                ),
            ]))
        })
        .collect();

    let title = if app.filter_text.is_empty() {
        format!(" Clusters ({}) ", clusters.len())
    } else {
        format!(
            " Clusters ({}/{}) /{}/ ",
            clusters.len(),
            app.dashboard.clusters.len(),
            app.filter_text
        )
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if !clusters.is_empty() {
        state.select(Some(app.selected_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
