//! Read-only snapshots handed to the views

use std::collections::BTreeSet;
use std::time::Duration;

use super::playback::{PlaybackPhase, PlayerState};
use super::types::{PlaylistSummary, Tab};

/// One song row as every view renders it (card or track row)
#[derive(Clone, Debug, PartialEq)]
pub struct SongRow {
    pub position: usize,
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub thumbnail: Option<String>,
    pub duration: Option<Duration>,
    pub is_favorite: bool,
    /// Playing song, from this exact list version, at this position
    pub is_current: bool,
    /// Row operation in flight, or the current row is buffering
    pub is_loading: bool,
}

impl SongRow {
    /// Whether the card's play button should offer "pause" instead
    pub fn shows_pause(&self, is_playing: bool) -> bool {
        self.is_current && is_playing
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Numbered rows with a level-meter indicator on the playing row
    TrackList,
    CardGrid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyState {
    pub heading: &'static str,
    pub message: &'static str,
}

/// Everything `ContentView` consumes
#[derive(Clone, Debug, PartialEq)]
pub struct ContentProjection {
    pub title: String,
    pub content_type: Tab,
    pub is_loading: bool,
    pub items: Vec<SongRow>,
    pub current_playlist: Option<PlaylistSummary>,
    /// Index of the playing song within `items`, if it is in this list version
    pub current_song_index: Option<usize>,
    pub is_playing: bool,
    /// Tab playback was started from
    pub active_tab: Tab,
    /// Positions in `items` with an operation in flight
    pub loading_songs: BTreeSet<usize>,
    pub player_state: PlayerState,
    /// Playlist summaries, shown when the playlists tab has none opened
    pub playlists: Vec<PlaylistSummary>,
    pub cursor: usize,
}

impl ContentProjection {
    pub fn render_mode(&self) -> RenderMode {
        if self.content_type == Tab::Playlists && self.current_playlist.is_some() {
            RenderMode::TrackList
        } else {
            RenderMode::CardGrid
        }
    }

    /// Whether the playlist-of-playlists summary is shown instead of songs
    pub fn shows_playlist_summary(&self) -> bool {
        self.content_type == Tab::Playlists && self.current_playlist.is_none()
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.items.is_empty() || (self.shows_playlist_summary() && !self.playlists.is_empty()) {
            return None;
        }
        let message = match self.content_type {
            Tab::Search => "Search for songs, artists, or albums to get started",
            Tab::Favorites | Tab::Playlists => "Your favorites will appear here",
        };
        Some(EmptyState {
            heading: "Nothing here yet",
            message,
        })
    }
}

/// Everything the drawer consumes
#[derive(Clone, Debug, PartialEq)]
pub struct DrawerProjection {
    pub is_open: bool,
    pub active_tab: Tab,
    pub playlists: Vec<PlaylistSummary>,
    pub favorites: Vec<SongRow>,
    pub cursor: usize,
}

impl DrawerProjection {
    pub fn header(&self) -> &'static str {
        match self.active_tab {
            Tab::Playlists => "Your Playlists",
            Tab::Favorites | Tab::Search => "Your Favorites",
        }
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        match self.active_tab {
            Tab::Playlists if self.playlists.is_empty() => Some(EmptyState {
                heading: "No playlists yet",
                message: "Add your first playlist to get started",
            }),
            Tab::Favorites | Tab::Search if self.favorites.is_empty() => Some(EmptyState {
                heading: "No favorites yet",
                message: "Tap the heart icon on songs to add them here",
            }),
            _ => None,
        }
    }
}

/// Status bar: what is playing and any pending notice
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusProjection {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub phase: PlaybackPhase,
    pub notice: Option<String>,
}

/// Search input line
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchBar {
    pub input: String,
    pub editing: bool,
}

/// A full frame worth of view state
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub content: ContentProjection,
    pub drawer: DrawerProjection,
    pub status: StatusProjection,
    pub search: SearchBar,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(content_type: Tab) -> ContentProjection {
        ContentProjection {
            title: String::new(),
            content_type,
            is_loading: false,
            items: Vec::new(),
            current_playlist: None,
            current_song_index: None,
            is_playing: false,
            active_tab: Tab::Search,
            loading_songs: BTreeSet::new(),
            player_state: PlayerState::default(),
            playlists: Vec::new(),
            cursor: 0,
        }
    }

    fn summary() -> PlaylistSummary {
        PlaylistSummary {
            id: "p".into(),
            name: "P".into(),
            thumbnail: None,
            track_count: 2,
        }
    }

    #[test]
    fn track_list_only_for_opened_playlist() {
        let mut p = projection(Tab::Playlists);
        assert_eq!(p.render_mode(), RenderMode::CardGrid);

        p.current_playlist = Some(summary());
        assert_eq!(p.render_mode(), RenderMode::TrackList);

        p.content_type = Tab::Favorites;
        assert_eq!(p.render_mode(), RenderMode::CardGrid);
    }

    #[test]
    fn empty_message_depends_on_content_type() {
        let search = projection(Tab::Search).empty_state().unwrap();
        assert_eq!(search.message, "Search for songs, artists, or albums to get started");

        let favorites = projection(Tab::Favorites).empty_state().unwrap();
        assert_eq!(favorites.message, "Your favorites will appear here");

        let mut playlists = projection(Tab::Playlists);
        assert!(playlists.empty_state().is_some());
        playlists.playlists.push(summary());
        assert!(playlists.empty_state().is_none());
    }

    #[test]
    fn drawer_header_and_empty_states() {
        let mut drawer = DrawerProjection {
            is_open: true,
            active_tab: Tab::Playlists,
            playlists: Vec::new(),
            favorites: Vec::new(),
            cursor: 0,
        };
        assert_eq!(drawer.header(), "Your Playlists");
        assert_eq!(drawer.empty_state().unwrap().heading, "No playlists yet");

        drawer.active_tab = Tab::Favorites;
        assert_eq!(drawer.header(), "Your Favorites");
        assert_eq!(drawer.empty_state().unwrap().heading, "No favorites yet");
    }
}
