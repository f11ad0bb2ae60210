//! Main content area rendering (track lists, card grids, empty states)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{ContentProjection, EmptyState, PlaylistSummary, RenderMode, SongRow};
use super::utils::{
    border_style, calculate_num_width, format_duration, render_scrollable_list, row_style,
    truncate_string,
};

const CARD_WIDTH: u16 = 28;
const CARD_HEIGHT: u16 = 5;
const LEVEL_METER: &str = "▮▮▮";

pub fn render_main_content(frame: &mut Frame, area: Rect, content: &ContentProjection, is_focused: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", content.title))
        .padding(Padding::horizontal(1))
        .border_style(border_style(is_focused));

    if content.is_loading {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    if let Some(empty) = content.empty_state() {
        render_empty_state(frame, area, empty, block);
        return;
    }

    if content.shows_playlist_summary() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_playlist_cards(frame, inner, &content.playlists, content.cursor);
        return;
    }

    match content.render_mode() {
        RenderMode::TrackList => render_track_list(frame, area, content, block),
        RenderMode::CardGrid => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_song_cards(frame, inner, content);
        }
    }
}

pub fn render_empty_state(frame: &mut Frame, area: Rect, empty: EmptyState, block: Block) {
    let text = vec![
        Line::from(Span::styled(empty.heading, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(empty.message),
    ];
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_track_list(frame: &mut Frame, area: Rect, content: &ContentProjection, block: Block) {
    let content_width = area.width.saturating_sub(4) as usize;
    let num_width = calculate_num_width(content.items.len());
    let liked_width = 2;
    let duration_width = 5;
    let fixed_width = 3 + 1 + num_width + 3 + liked_width + 3 + 3 + 3 + duration_width;
    let remaining_width = content_width.saturating_sub(fixed_width);
    let title_width = (remaining_width * 55) / 100;
    let artist_width = remaining_width.saturating_sub(title_width);

    let mut items = vec![
        ListItem::new(format!(
            "    {:<num_width$}   {}   {:<title_width$}   {:<artist_width$}   {}",
            "#", "  ", "Title", "Artist", "Time",
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    ];

    items.extend(content.items.iter().map(|row| {
        let indicator = if row.is_loading {
            " … "
        } else if row.is_current && content.is_playing {
            LEVEL_METER
        } else {
            "   "
        };
        let liked = if row.is_favorite { "♥ " } else { "  " };
        ListItem::new(format!(
            "{} {:<num_width$}   {}   {}   {}   {}",
            indicator,
            row.position + 1,
            liked,
            truncate_string(&row.title, title_width),
            truncate_string(&row.subtitle, artist_width),
            format_duration(row.duration),
        ))
        .style(row_style(row.position == content.cursor, row.is_current))
    }));

    // The header occupies the first list row
    render_scrollable_list(frame, area, items, content.cursor + 1, block);
}

/// First grid row to draw so that the cursor row stays visible
fn first_visible_row(cursor_row: usize, visible_rows: usize) -> usize {
    (cursor_row + 1).saturating_sub(visible_rows.max(1))
}

fn grid_cells(area: Rect, count: usize, cursor: usize) -> Vec<(usize, Rect)> {
    let columns = (area.width / CARD_WIDTH).max(1) as usize;
    let visible_rows = (area.height / CARD_HEIGHT) as usize;
    let first_row = first_visible_row(cursor / columns, visible_rows);
    let card_width = area.width / columns as u16;

    (first_row * columns..count)
        .take_while(|i| i / columns < first_row + visible_rows)
        .map(|i| {
            let row = (i / columns - first_row) as u16;
            let column = (i % columns) as u16;
            let cell = Rect {
                x: area.x + column * card_width,
                y: area.y + row * CARD_HEIGHT,
                width: card_width,
                height: CARD_HEIGHT,
            };
            (i, cell)
        })
        .collect()
}

fn render_song_cards(frame: &mut Frame, area: Rect, content: &ContentProjection) {
    for (i, cell) in grid_cells(area, content.items.len(), content.cursor) {
        render_song_card(frame, cell, &content.items[i], i == content.cursor, content.is_playing);
    }
}

/// A single song card: title, subtitle and a footer with the card's controls
fn render_song_card(frame: &mut Frame, area: Rect, row: &SongRow, is_selected: bool, is_playing: bool) {
    let width = area.width.saturating_sub(2) as usize;
    let button = if row.is_loading {
        "…"
    } else if row.shows_pause(is_playing) {
        "⏸"
    } else {
        "▶"
    };
    let heart = if row.is_favorite { "♥" } else { "♡" };
    let footer = format!("{} {}  {}", button, heart, format_duration(row.duration));

    let lines = vec![
        Line::from(Span::styled(
            truncate_string(&row.title, width),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_string(&row.subtitle, width),
            Style::default().fg(Color::Gray),
        )),
        Line::from(footer),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(row_style(is_selected, row.is_current)),
    );
    frame.render_widget(card, area);
}

fn render_playlist_cards(frame: &mut Frame, area: Rect, playlists: &[PlaylistSummary], cursor: usize) {
    for (i, cell) in grid_cells(area, playlists.len(), cursor) {
        let playlist = &playlists[i];
        let width = cell.width.saturating_sub(2) as usize;
        let lines = vec![
            Line::from(Span::styled(
                truncate_string(&playlist.name, width),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("{} tracks", playlist.track_count)),
        ];
        let card = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(row_style(i == cursor, false)),
        );
        frame.render_widget(card, cell);
    }
}
