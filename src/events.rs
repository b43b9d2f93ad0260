use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, InputMode, View};
use crate::data::Notice;

/// File written by the export key.
pub const EXPORT_FILE: &str = "trino_dash_export.json";

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

    match app.input_mode {
        InputMode::Filter => {
            handle_filter_input(app, key);
            return;
        }
        InputMode::AddCluster => {
            handle_add_input(app, key);
            return;
        }
        InputMode::Normal => {}
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
        KeyCode::Char('1') => app.set_view(View::Overview),
        KeyCode::Char('2') => app.set_view(View::Clusters),

        // Navigation (up/down for items, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Cluster commands
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
        KeyCode::Char('d') => app.launch_discovery(),
        KeyCode::Char('a') => app.start_add_cluster(),

        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Manual refresh
        KeyCode::Char('r') => app.request_refresh(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Filter (start typing to filter)
        KeyCode::Char('/') => app.start_filter(),

        // Clear filter
        KeyCode::Char('c') => {
            if !app.filter_text.is_empty() {
                app.clear_filter();
            }
        }

        // Export
        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            let notice = match app.export_state(&export_path) {
                Ok(()) => Notice::info(format!("Exported to {}", export_path.display())),
                Err(e) => Notice::error(format!("Export failed: {}", e)),
            };
            app.set_notice(notice);
        }

        _ => {}
    }
}

/// Handle key input while filter is active
fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Confirm filter (keep text but exit input mode)
        KeyCode::Enter | KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }

        // Clear and exit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_filter();
        }

        KeyCode::Backspace => {
            app.filter_pop();
            if app.filter_text.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }

        KeyCode::Char(c) => app.filter_push(c),

        _ => {}
    }
}

/// Handle key input while the add-cluster prompt is open
fn handle_add_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_add_cluster(),
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.cancel_input(),
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Char(c) => app.input_buffer.push(c),
        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Click to select
        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Rows of the cluster table (after header, tabs, border, table header)
            if app.current_view == View::Clusters && clicked_row > content_start_row {
                let item_row = app.table_offset() + (clicked_row - content_start_row - 1) as usize;
                if item_row < app.visible_clusters().len() {
                    app.selected_index = item_row;
                }
            }

            // Tab clicks (row 1, after header)
            if clicked_row == 1 {
                let col = mouse.column;
                // Approximate tab positions: Overview (0-13), Clusters (14-27)
                if col < 14 {
                    app.set_view(View::Overview);
                } else if col < 28 {
                    app.set_view(View::Clusters);
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Cluster;
    use crate::source::{ChannelFeed, ChannelSource, Command, FeedEvent, SourceRequest};
    use crate::ui::Theme;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use std::collections::BTreeMap;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn click(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app_with_clusters(names: &[&str]) -> (ChannelFeed, App) {
        let (feed, source) = ChannelSource::create("test");
        let mut app = App::with_theme(Box::new(source), Theme::dark());
        let clusters = names
            .iter()
            .map(|n| Cluster {
                name: n.to_string(),
                host: format!("http://{}:8080", n),
                available: true,
                enabled: true,
                tags: BTreeMap::new(),
            })
            .collect();
        feed.send(FeedEvent::Clusters(Ok(clusters)));
        app.reload_data();
        (feed, app)
    }

    #[test]
    fn test_quit_and_views() {
        let (_feed, mut app) = app_with_clusters(&[]);
        handle_key_event(&mut app, key(KeyCode::Char('2')));
        assert_eq!(app.current_view, View::Clusters);
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::Overview);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_space_toggles_selected_cluster() {
        let (mut feed, mut app) = app_with_clusters(&["a", "b"]);
        handle_key_event(&mut app, key(KeyCode::Char('j')));
        handle_key_event(&mut app, key(KeyCode::Char(' ')));
        assert_eq!(
            feed.try_request(),
            Some(SourceRequest::Dispatch(Command::SetEnabled {
                name: "b".to_string(),
                enabled: false,
            }))
        );
    }

    #[test]
    fn test_discovery_and_refresh_keys() {
        let (mut feed, mut app) = app_with_clusters(&[]);
        handle_key_event(&mut app, key(KeyCode::Char('r')));
        handle_key_event(&mut app, key(KeyCode::Char('d')));
        assert_eq!(feed.try_request(), Some(SourceRequest::Refresh));
        assert_eq!(
            feed.try_request(),
            Some(SourceRequest::Dispatch(Command::Discover))
        );
    }

    #[test]
    fn test_filter_typing_does_not_trigger_commands() {
        let (mut feed, mut app) = app_with_clusters(&["dev", "prod"]);
        handle_key_event(&mut app, key(KeyCode::Char('/')));
        for c in "d".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.filter_text, "d");
        assert_eq!(feed.try_request(), None);
        // "dev" and "prod" both contain 'd'
        assert_eq!(app.visible_clusters().len(), 2);

        // 'e' would export in normal mode
        handle_key_event(&mut app, key(KeyCode::Char('e')));
        assert_eq!(app.filter_text, "de");
        assert_eq!(app.visible_clusters().len(), 1);

        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Normal);
        handle_key_event(&mut app, key(KeyCode::Char('c')));
        assert!(app.filter_text.is_empty());
    }

    #[test]
    fn test_add_prompt_keys() {
        let (mut feed, mut app) = app_with_clusters(&[]);
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        for c in "etl http://etl:8080".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(matches!(
            feed.try_request(),
            Some(SourceRequest::Dispatch(Command::AddCluster(_)))
        ));
    }

    #[test]
    fn test_escape_closes_add_prompt() {
        let (_feed, mut app) = app_with_clusters(&[]);
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        handle_key_event(&mut app, key(KeyCode::Char('x')));
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.input_buffer.is_empty());
    }

    #[test]
    fn test_help_swallows_next_key() {
        let (_feed, mut app) = app_with_clusters(&[]);
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_mouse_selects_row_in_cluster_table() {
        let (_feed, mut app) = app_with_clusters(&["a", "b", "c"]);
        app.set_view(View::Clusters);
        handle_mouse_event(&mut app, click(MouseEventKind::Down(MouseButton::Left), 5, 6), 3);
        assert_eq!(app.selected_index, 2);

        // Past the end is ignored
        handle_mouse_event(&mut app, click(MouseEventKind::Down(MouseButton::Left), 5, 9), 3);
        assert_eq!(app.selected_index, 2);

        handle_mouse_event(&mut app, click(MouseEventKind::ScrollUp, 0, 0), 3);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_mouse_click_accounts_for_table_scroll() {
        let names: Vec<String> = (0..30).map(|i| format!("c{:02}", i)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let (_feed, mut app) = app_with_clusters(&names);
        app.set_view(View::Clusters);
        app.set_table_offset(12);

        handle_mouse_event(&mut app, click(MouseEventKind::Down(MouseButton::Left), 5, 4), 3);
        assert_eq!(app.selected_index, 12);
        assert_eq!(app.selected_cluster().unwrap().name, "c12");

        handle_mouse_event(&mut app, click(MouseEventKind::Down(MouseButton::Left), 5, 6), 3);
        assert_eq!(app.selected_cluster().unwrap().name, "c14");
    }

    #[test]
    fn test_mouse_tabs_and_back() {
        let (_feed, mut app) = app_with_clusters(&[]);
        handle_mouse_event(&mut app, click(MouseEventKind::Down(MouseButton::Left), 20, 1), 3);
        assert_eq!(app.current_view, View::Clusters);
        handle_mouse_event(&mut app, click(MouseEventKind::Down(MouseButton::Right), 0, 0), 3);
        assert_eq!(app.current_view, View::Overview);
    }
}
