//! Overlay rendering (library drawer)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, ListItem, Padding},
    Frame,
};

use crate::model::{DrawerProjection, Tab};
use super::content::render_empty_state;
use super::utils::{format_duration, render_scrollable_list, row_style, truncate_string};

/// Drawer docked to the left edge of `area`
fn drawer_area(area: Rect) -> Rect {
    let width = (area.width / 3).clamp(30.min(area.width), 48.min(area.width));
    Rect {
        x: area.x,
        y: area.y,
        width,
        height: area.height,
    }
}

pub fn render_drawer(frame: &mut Frame, drawer: &DrawerProjection) {
    let area = drawer_area(frame.area());

    // Clear the area behind the drawer first
    frame.render_widget(Clear, area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", drawer.header()))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .title_bottom(Line::from(" ←/→ switch  Esc close ").right_aligned())
        .style(Style::default().bg(Color::Black));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let tab_style = |tab: Tab| {
        if drawer.active_tab == tab {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let tabs = Line::from(vec![
        Span::styled(" Playlists ", tab_style(Tab::Playlists)),
        Span::raw(" "),
        Span::styled(" Favorites ", tab_style(Tab::Favorites)),
    ]);
    frame.render_widget(tabs, chunks[0]);

    let body = Block::default().padding(Padding::horizontal(1));
    if let Some(empty) = drawer.empty_state() {
        render_empty_state(frame, chunks[1], empty, body);
        return;
    }

    let width = chunks[1].width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = match drawer.active_tab {
        Tab::Playlists => drawer
            .playlists
            .iter()
            .enumerate()
            .map(|(i, playlist)| {
                let count = format!("{} tracks", playlist.track_count);
                let name_width = width.saturating_sub(count.chars().count() + 1);
                ListItem::new(format!("{} {}", truncate_string(&playlist.name, name_width), count))
                    .style(row_style(i == drawer.cursor, false))
            })
            .collect(),
        Tab::Favorites | Tab::Search => drawer
            .favorites
            .iter()
            .map(|row| {
                let marker = if row.is_loading {
                    "…"
                } else if row.is_current {
                    "▶"
                } else {
                    " "
                };
                let title_width = width.saturating_sub(8);
                ListItem::new(format!(
                    "{} {} {}",
                    marker,
                    truncate_string(&row.title, title_width),
                    format_duration(row.duration),
                ))
                .style(row_style(row.position == drawer.cursor, row.is_current))
            })
            .collect(),
    };

    render_scrollable_list(frame, chunks[1], items, drawer.cursor, body);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawer_fits_small_terminals() {
        assert_eq!(drawer_area(Rect::new(0, 0, 20, 10)).width, 20);
        assert_eq!(drawer_area(Rect::new(0, 0, 90, 10)).width, 30);
        assert_eq!(drawer_area(Rect::new(0, 0, 300, 10)).width, 48);
    }
}
