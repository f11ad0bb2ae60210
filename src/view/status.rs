//! Status bar rendering (now playing and notices)

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::{PlaybackPhase, StatusProjection};

const KEY_HINTS: &str = " ⏎ play │ space pause │ f ♥ │ d drawer │ a add playlist │ q quit ";

pub fn render_status_bar(frame: &mut Frame, area: Rect, status: &StatusProjection) {
    let icon = match status.phase {
        PlaybackPhase::Idle => " ",
        PlaybackPhase::Loading => "…",
        PlaybackPhase::Playing => "▶",
        PlaybackPhase::Paused => "⏸",
    };

    let now_playing = match (&status.title, &status.subtitle) {
        (Some(title), Some(subtitle)) if !subtitle.is_empty() => {
            format!(" {} {} | {} ", icon, title, subtitle)
        }
        (Some(title), _) => format!(" {} {} ", icon, title),
        (None, _) => " No song playing ".to_string(),
    };

    let line = match &status.notice {
        Some(notice) => Line::from(Span::styled(
            format!("{} (Esc to dismiss)", notice),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(status.phase.label(), Style::default().fg(Color::DarkGray))),
    };

    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(now_playing)
            .title_bottom(Line::from(KEY_HINTS).right_aligned()),
    );
    frame.render_widget(widget, area);
}
