//! Core type definitions for the application

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// Which collection a view is showing (or playback was started from)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Search,
    Favorites,
    Playlists,
}

impl Tab {
    pub fn next(self) -> Self {
        match self {
            Tab::Search => Tab::Favorites,
            Tab::Favorites => Tab::Playlists,
            Tab::Playlists => Tab::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Tab::Search => Tab::Playlists,
            Tab::Favorites => Tab::Search,
            Tab::Playlists => Tab::Favorites,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Search => "Search",
            Tab::Favorites => "Favorites",
            Tab::Playlists => "Playlists",
        }
    }
}

/// Alternate display fields supplied by an external catalog
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ExternalTrack {
    pub name: Option<String>,
    pub artist: Option<String>,
}

/// A song as it arrives from ingestion, before display fields are resolved
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSong {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Seconds
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub spotify_track: Option<ExternalTrack>,
}

/// Display fields resolved once at ingestion
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongDisplay {
    pub title: String,
    pub subtitle: String,
}

/// An immutable song snapshot
#[derive(Clone, Debug, PartialEq)]
pub struct Song {
    pub id: String,
    pub display: SongDisplay,
    pub thumbnail: Option<String>,
    pub duration: Option<Duration>,
}

impl Song {
    pub fn new(id: impl Into<String>, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display: SongDisplay {
                title: title.into(),
                subtitle: subtitle.into(),
            },
            thumbnail: None,
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn title(&self) -> &str {
        &self.display.title
    }

    pub fn subtitle(&self) -> &str {
        &self.display.subtitle
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<RawSong> for Song {
    type Error = CoreError;

    fn try_from(raw: RawSong) -> CoreResult<Self> {
        let (external_name, external_artist) = match raw.spotify_track {
            Some(track) => (track.name, track.artist),
            None => (None, None),
        };

        let title = non_empty(raw.title)
            .or_else(|| non_empty(external_name))
            .ok_or_else(|| CoreError::MissingTitle { id: raw.id.clone() })?;
        let subtitle = non_empty(raw.subtitle)
            .or_else(|| non_empty(external_artist))
            .unwrap_or_default();

        // Negative, NaN or infinite durations are displayed as unknown
        let duration = raw
            .duration
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .filter(|d| !d.is_zero());

        Ok(Self {
            id: raw.id,
            display: SongDisplay { title, subtitle },
            thumbnail: non_empty(raw.thumbnail),
            duration,
        })
    }
}

/// A playlist as it arrives from ingestion
#[derive(Clone, Debug, Deserialize)]
pub struct RawPlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub songs: Vec<RawSong>,
}

/// An ordered, immutable playlist snapshot. Song order is playback order.
#[derive(Clone, Debug, PartialEq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub thumbnail: Option<String>,
    pub songs: Vec<Song>,
}

impl Playlist {
    pub fn new(id: impl Into<String>, name: impl Into<String>, songs: Vec<Song>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thumbnail: None,
            songs,
        }
    }

    pub fn summary(&self) -> PlaylistSummary {
        PlaylistSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            thumbnail: self.thumbnail.clone(),
            track_count: self.songs.len(),
        }
    }
}

/// Normalise a batch of raw songs. Songs without any usable title are skipped.
pub fn ingest_songs(raw: Vec<RawSong>) -> Vec<Song> {
    raw.into_iter()
        .filter_map(|raw| {
            let id = raw.id.clone();
            Song::try_from(raw)
                .inspect_err(|e| tracing::warn!(song_id = %id, error = %e, "Skipping song"))
                .ok()
        })
        .collect()
}

impl From<RawPlaylist> for Playlist {
    fn from(raw: RawPlaylist) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            thumbnail: non_empty(raw.thumbnail),
            songs: ingest_songs(raw.songs),
        }
    }
}

/// Playlist entry for summary views (drawer, playlists grid)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub thumbnail: Option<String>,
    pub track_count: usize,
}

/// A browsable song list
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListKind {
    Search,
    Favorites,
    Playlist(String),
}

impl ListKind {
    /// The tab a list belongs to
    pub fn tab(&self) -> Tab {
        match self {
            ListKind::Search => Tab::Search,
            ListKind::Favorites => Tab::Favorites,
            ListKind::Playlist(_) => Tab::Playlists,
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::Search => f.write_str("search"),
            ListKind::Favorites => f.write_str("favorites"),
            ListKind::Playlist(id) => write!(f, "playlist:{}", id),
        }
    }
}

/// Identity of one version of a list.
///
/// An index into a list is only meaningful together with the key that was
/// current when the index was taken; the store bumps `revision` whenever the
/// list's contents change.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListKey {
    pub kind: ListKind,
    pub revision: u64,
}

/// Per-row identity for transient UI state
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub list: ListKind,
    pub song_id: String,
}

impl RowKey {
    pub fn new(list: ListKind, song_id: impl Into<String>) -> Self {
        Self {
            list,
            song_id: song_id.into(),
        }
    }
}
