//! Clusters view rendering.
//!
//! Full table of clusters with host, availability, enabled flag and tags.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::api::Cluster;
use crate::app::{App, InputMode};

/// Render the Clusters view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let clusters = app.visible_clusters();

    let header = Row::new(vec!["Name", "Host", "Available", "Enabled", "Tags"])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = clusters
        .iter()
        .map(|c| {
            Row::new(vec![
                Cell::from(c.name.clone()),
                Cell::from(c.host.clone()),
                Cell::from(if c.available { "yes" } else { "no" })
                    .style(app.theme.available_style(c.available)),
                Cell::from(if c.enabled { "enabled" } else { "disabled" })
                    .style(app.theme.enabled_style(c.enabled)),
                Cell::from(format_tags(c)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2), // Name
        Constraint::Fill(3), // Host
        Constraint::Min(9),  // Available
        Constraint::Min(8),  // Enabled
        Constraint::Fill(3), // Tags
    ];

    let selected_visual_index = app.selected_index.min(clusters.len().saturating_sub(1));

    let filter_info = if app.input_mode == InputMode::Filter {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !clusters.is_empty() {
        format!(" [{}/{}]", selected_visual_index + 1, clusters.len())
    } else {
        String::new()
    };

    let busy = if app.dashboard.is_updating() { " updating…" } else { "" };

    let title = format!(
        " Clusters ({}/{}){}{}{} ",
        clusters.len(),
        app.dashboard.clusters.len(),
        filter_info,
        position_info,
        busy
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state =
        TableState::default().with_offset(app.table_offset().min(clusters.len().saturating_sub(1)));
    if !clusters.is_empty() {
        state.select(Some(selected_visual_index));
    }

    frame.render_stateful_widget(table, area, &mut state);
    app.set_table_offset(state.offset());
}

/// `key=value` pairs in key order, or "-" when untagged.
pub fn format_tags(cluster: &Cluster) -> String {
    if cluster.tags.is_empty() {
        return "-".to_string();
    }
    cluster
        .tags
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}
