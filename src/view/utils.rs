//! Utility functions for rendering UI components

use std::time::Duration;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, List, ListItem, ListState},
    Frame,
};

pub fn render_scrollable_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected_index: usize,
    block: Block,
) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));

    frame.render_stateful_widget(list, area, &mut list_state);
}

/// `m:ss`, or `--:--` when the length is unknown
pub fn format_duration(duration: Option<Duration>) -> String {
    match duration {
        Some(d) => {
            let total_seconds = d.as_secs();
            format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
        }
        None => "--:--".to_string(),
    }
}

/// Calculate width needed for index column (log10(n) + padding)
pub fn calculate_num_width(item_count: usize) -> usize {
    if item_count == 0 {
        2
    } else {
        let digits = (item_count as f64).log10().floor() as usize + 1;
        digits + 1
    }
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_width)
    } else {
        format!("{:<width$}", s, width = max_width)
    }
}

/// Row style: cursor wins over the playing highlight
pub fn row_style(is_selected: bool, is_current: bool) -> Style {
    if is_selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if is_current {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

pub fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_format_as_minutes_and_seconds() {
        assert_eq!(format_duration(Some(Duration::from_secs(215))), "3:35");
        assert_eq!(format_duration(Some(Duration::from_secs_f64(59.9))), "0:59");
        assert_eq!(format_duration(None), "--:--");
    }

    #[test]
    fn long_strings_are_truncated_and_padded() {
        assert_eq!(truncate_string("Windowlicker", 8), "Windo...");
        assert_eq!(truncate_string("Intro", 8), "Intro   ");
        assert_eq!(calculate_num_width(120), 4);
    }
}
