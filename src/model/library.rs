//! Library store: playlists, favorites and the last search results

use std::collections::{HashMap, HashSet};

use crate::error::{CoreError, CoreResult};
use super::types::{ListKey, ListKind, Playlist, Song};

/// Owner of the durable song collections.
///
/// Songs and playlists are treated as immutable snapshots: mutations replace
/// or extend collections, they never edit a song in place.
#[derive(Clone, Debug, Default)]
pub struct LibraryStore {
    playlists: Vec<Playlist>,
    playlist_revisions: HashMap<String, u64>,
    favorites: Vec<Song>,
    favorite_ids: HashSet<String>,
    favorites_revision: u64,
    search_results: Vec<Song>,
    search_query: Option<String>,
    search_revision: u64,
}

impl LibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace playlists and favorites with freshly ingested collections.
    pub fn seed(&mut self, playlists: Vec<Playlist>, favorites: Vec<Song>) {
        self.playlists.clear();
        self.playlist_revisions.clear();
        for playlist in playlists {
            self.add_playlist(playlist);
        }

        self.favorites.clear();
        self.favorite_ids.clear();
        for song in favorites {
            if self.favorite_ids.insert(song.id.clone()) {
                self.favorites.push(song);
            }
        }
        self.favorites_revision += 1;
    }

    // ========================================================================
    // Playlists
    // ========================================================================

    pub fn list_playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn playlist(&self, id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    /// Insert a playlist unless one with the same id exists. Returns whether it was inserted.
    pub fn add_playlist(&mut self, playlist: Playlist) -> bool {
        if self.playlist(&playlist.id).is_some() {
            tracing::debug!(playlist_id = %playlist.id, "Playlist already present, ignoring add");
            return false;
        }
        self.playlist_revisions.insert(playlist.id.clone(), 0);
        self.playlists.push(playlist);
        true
    }

    /// Replace the contents of an existing playlist, keeping its position.
    pub fn replace_playlist(&mut self, playlist: Playlist) -> CoreResult<()> {
        let slot = self
            .playlists
            .iter_mut()
            .find(|p| p.id == playlist.id)
            .ok_or_else(|| CoreError::playlist_not_found(&playlist.id))?;

        *self.playlist_revisions.entry(playlist.id.clone()).or_default() += 1;
        *slot = playlist;
        Ok(())
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    /// Favorites in the order they were added, most recent last
    pub fn list_favorites(&self) -> &[Song] {
        &self.favorites
    }

    pub fn is_favorite(&self, song_id: &str) -> bool {
        self.favorite_ids.contains(song_id)
    }

    /// Remove the song from favorites if present, otherwise append it.
    /// Returns the new membership.
    pub fn toggle_favorite(&mut self, song: &Song, source_index: Option<usize>) -> bool {
        let now_favorite = if self.favorite_ids.remove(&song.id) {
            self.favorites.retain(|s| s.id != song.id);
            false
        } else {
            self.favorite_ids.insert(song.id.clone());
            self.favorites.push(song.clone());
            true
        };
        self.favorites_revision += 1;

        tracing::debug!(
            song_id = %song.id,
            ?source_index,
            favorite = now_favorite,
            count = self.favorites.len(),
            "Favorite toggled"
        );
        now_favorite
    }

    // ========================================================================
    // Search results
    // ========================================================================

    pub fn search_results(&self) -> &[Song] {
        &self.search_results
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    pub fn set_search_results(&mut self, query: Option<String>, songs: Vec<Song>) {
        self.search_query = query;
        self.search_results = songs;
        self.search_revision += 1;
    }

    pub fn clear_search_results(&mut self) {
        self.set_search_results(None, Vec::new());
    }

    // ========================================================================
    // List lookups
    // ========================================================================

    pub fn songs(&self, list: &ListKind) -> Option<&[Song]> {
        match list {
            ListKind::Search => Some(&self.search_results),
            ListKind::Favorites => Some(&self.favorites),
            ListKind::Playlist(id) => self.playlist(id).map(|p| p.songs.as_slice()),
        }
    }

    /// Current identity of a list, `None` for playlists that do not exist.
    pub fn list_key(&self, list: &ListKind) -> Option<ListKey> {
        let revision = match list {
            ListKind::Search => self.search_revision,
            ListKind::Favorites => self.favorites_revision,
            ListKind::Playlist(id) => *self.playlist_revisions.get(id)?,
        };
        Some(ListKey {
            kind: list.clone(),
            revision,
        })
    }

    pub fn position(&self, list: &ListKind, song_id: &str) -> Option<usize> {
        self.songs(list)?.iter().position(|s| s.id == song_id)
    }

    pub fn contains(&self, list: &ListKind, song_id: &str) -> bool {
        self.position(list, song_id).is_some()
    }
}
