//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (songs, playlists, list identities)
//! - `library`: Library store (playlists, favorites, search results)
//! - `playback`: Transport state machine
//! - `pending`: Per-row in-flight operation flags
//! - `ui`: Navigation, drawer and notice state
//! - `projection`: Read-only snapshots consumed by the views
//! - `app_model`: Main application model with state management methods

mod types;
mod library;
mod playback;
mod pending;
mod ui;
mod projection;
mod app_model;

// Re-export the types the controller, backends and views work with
pub use types::{ingest_songs, ListKind, Playlist, PlaylistSummary, RawPlaylist, RawSong, Song, Tab};

pub use playback::PlaybackPhase;

pub use pending::PendingGuard;

pub use projection::{
    ContentProjection, DrawerProjection, EmptyState, RenderMode, SearchBar, Snapshot,
    SongRow, StatusProjection,
};

pub use app_model::AppModel;
