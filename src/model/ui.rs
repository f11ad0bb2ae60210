//! Navigation state owned by the coordinator (main content, drawer, notices)

use chrono::{DateTime, Utc};

use super::types::Tab;

/// Mobile drawer state, independent of the main content tab
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawerState {
    pub is_open: bool,
    pub active_tab: Tab,
    pub cursor: usize,
}

impl Default for DrawerState {
    fn default() -> Self {
        Self {
            is_open: false,
            active_tab: Tab::Playlists,
            cursor: 0,
        }
    }
}

/// A short message about a failed operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

/// UI state for the application
#[derive(Clone, Debug, Default)]
pub struct UiState {
    /// Collection shown in the main content area
    pub content_type: Tab,
    /// A search or playlist fetch is in flight for the main content
    pub is_loading: bool,
    pub cursor: usize,
    pub search_input: String,
    pub editing_search: bool,
    pub drawer: DrawerState,
    pub notice: Option<Notice>,
    /// Bumped on every search request; older resolutions are discarded
    pub search_generation: u64,
    /// Bumped on every playlist fetch; older resolutions are discarded
    pub fetch_generation: u64,
}

impl UiState {
    pub fn move_cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_down(&mut self, len: usize) {
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn clamp_cursor(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}
