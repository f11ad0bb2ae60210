//! Layout rendering (top bar with search and content tabs)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{SearchBar, Tab};
use super::utils::border_style;

const TABS: [Tab; 3] = [Tab::Search, Tab::Favorites, Tab::Playlists];

pub fn render_top_bar(frame: &mut Frame, area: Rect, search: &SearchBar, content_type: Tab) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(36), // Content tabs
        ])
        .split(area);

    let search_style = if search.editing {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let search_text = if search.input.is_empty() && !search.editing {
        "Press / to search..."
    } else {
        &search.input
    };

    let search_widget = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .padding(Padding::horizontal(1))
            .border_style(border_style(search.editing)),
    );
    frame.render_widget(search_widget, chunks[0]);

    if search.editing {
        // Cursor after the typed text: border + padding + text
        let typed = u16::try_from(search.input.chars().count()).unwrap_or(u16::MAX);
        let x = chunks[0].x.saturating_add(2).saturating_add(typed);
        frame.set_cursor_position((x.min(chunks[0].right().saturating_sub(2)), chunks[0].y + 1));
    }

    let spans: Vec<Span> = TABS
        .iter()
        .flat_map(|tab| {
            let style = if *tab == content_type {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [Span::styled(format!(" {} ", tab.label()), style), Span::raw(" ")]
        })
        .collect();

    let tabs = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Tab ↹ "));
    frame.render_widget(tabs, chunks[1]);
}
