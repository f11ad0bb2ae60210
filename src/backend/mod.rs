//! External collaborators of the state core
//!
//! The coordinator only knows these traits. Their implementations are opaque
//! asynchronous operations that either resolve or fail:
//!
//! - `PlaybackBackend`: starts/pauses audio and reports progress as [`BackendEvent`]s
//! - `LibraryBackend`: search, playlist fetches and favorite persistence
//! - `demo`: in-memory implementations used by the binary

pub mod demo;
#[cfg(test)]
pub mod testing;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::{Playlist, Song};

/// Asynchronous notifications from the playback backend.
///
/// Every event carries the attempt id passed to [`PlaybackBackend::play`]
/// for the song it is about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendEvent {
    /// The requested song is audible
    Ready(u64),
    /// Playback stalled waiting for data
    Buffering(u64),
    /// The song played to its end
    Ended(u64),
    Error(u64, String),
}

impl BackendEvent {
    pub fn attempt(&self) -> u64 {
        match self {
            BackendEvent::Ready(attempt)
            | BackendEvent::Buffering(attempt)
            | BackendEvent::Ended(attempt)
            | BackendEvent::Error(attempt, _) => *attempt,
        }
    }
}

#[async_trait]
pub trait PlaybackBackend: Send + Sync {
    /// Start `song` from the beginning. Resolution means the request was
    /// accepted; audibility is reported later with [`BackendEvent::Ready`].
    /// Events about this song must be tagged with `attempt`.
    async fn play(&self, attempt: u64, song: &Song) -> Result<()>;

    async fn pause(&self) -> Result<()>;

    async fn resume(&self) -> Result<()>;
}

#[async_trait]
pub trait LibraryBackend: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Song>>;

    async fn fetch_playlist(&self, id: &str) -> Result<Playlist>;

    /// Persist a favorite change for `song_id`
    async fn set_favorite(&self, song_id: &str, favorite: bool) -> Result<()>;

    /// User playlists. Songs may be omitted and loaded with `fetch_playlist`.
    async fn playlists(&self) -> Result<Vec<Playlist>>;

    async fn favorites(&self) -> Result<Vec<Song>>;

    /// A playlist the user could add to their library
    async fn suggested_playlist(&self) -> Result<Option<Playlist>>;
}
