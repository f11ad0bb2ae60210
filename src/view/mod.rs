//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! Views only read the [`Snapshot`] the model projects for each frame.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists)
//! - `layout`: Top bar (search input, content tabs)
//! - `content`: Main content area (track list, card grid, empty states)
//! - `status`: Now playing and notices
//! - `overlays`: Library drawer

mod utils;
mod layout;
mod content;
mod status;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::Snapshot;

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, snapshot: &Snapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + tabs
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Now playing
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], &snapshot.search, snapshot.content.content_type);

        let content_focused = !snapshot.search.editing && !snapshot.drawer.is_open;
        content::render_main_content(frame, chunks[1], &snapshot.content, content_focused);

        status::render_status_bar(frame, chunks[2], &snapshot.status);

        if snapshot.drawer.is_open {
            overlays::render_drawer(frame, &snapshot.drawer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppModel, Playlist, Song, Tab};
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_text(model: &AppModel) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let snapshot = model.snapshot();
        terminal.draw(|f| AppView::render(f, &snapshot)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn empty_search_shows_empty_state() {
        let text = render_to_text(&AppModel::new());
        assert!(text.contains("Nothing here yet"));
        assert!(text.contains("No song playing"));
    }

    #[test]
    fn drawer_lists_playlists() {
        let mut model = AppModel::new();
        let songs = vec![Song::new("a", "Alpha", "A")];
        model.seed_library(vec![Playlist::new("p", "Road Trip", songs)], Vec::new());
        model.open_drawer(Tab::Playlists);

        let text = render_to_text(&model);
        assert!(text.contains("Your Playlists"));
        assert!(text.contains("Road Trip"));
    }
}
