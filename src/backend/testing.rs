//! Scripted backends for controller tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::Notify;

use crate::model::{Playlist, Song};
use super::{LibraryBackend, PlaybackBackend};

/// Holds an operation until the test releases it
#[derive(Default)]
pub struct Gate {
    armed: AtomicBool,
    notify: Notify,
}

impl Gate {
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Let one held (or the next) operation through
    pub fn release(&self) {
        self.notify.notify_one();
    }

    async fn pass(&self) {
        if self.armed.load(Ordering::SeqCst) {
            self.notify.notified().await;
        }
    }
}

#[derive(Default)]
pub struct ScriptedPlayer {
    pub calls: Mutex<Vec<String>>,
    pub fail_play: AtomicBool,
    pub fail_pause: AtomicBool,
    pub hold_play: Gate,
    /// Song ids whose `play` is rejected
    pub rejected: Mutex<HashSet<String>>,
}

impl ScriptedPlayer {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reject(&self, song_id: &str) {
        self.rejected.lock().unwrap().insert(song_id.to_string());
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PlaybackBackend for ScriptedPlayer {
    async fn play(&self, _attempt: u64, song: &Song) -> Result<()> {
        self.record(format!("play:{}", song.id));
        self.hold_play.pass().await;
        if self.fail_play.load(Ordering::SeqCst) || self.rejected.lock().unwrap().contains(&song.id) {
            bail!("device unavailable");
        }
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.record("pause".to_string());
        if self.fail_pause.load(Ordering::SeqCst) {
            bail!("device unavailable");
        }
        Ok(())
    }

    async fn resume(&self) -> Result<()> {
        self.record("resume".to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct ScriptedLibrary {
    pub results: Mutex<HashMap<String, Vec<Song>>>,
    pub playlists: Mutex<Vec<Playlist>>,
    pub favorites: Mutex<Vec<Song>>,
    pub suggested: Mutex<Option<Playlist>>,
    pub calls: Mutex<Vec<String>>,
    pub fail_search: AtomicBool,
    pub fail_favorite: AtomicBool,
    pub fail_fetch: AtomicBool,
    pub fail_playlists: AtomicBool,
    pub hold_search: Gate,
    pub hold_favorite: Gate,
    pub hold_fetch: Gate,
}

impl ScriptedLibrary {
    pub fn with_results(self, query: &str, songs: Vec<Song>) -> Self {
        self.results.lock().unwrap().insert(query.to_string(), songs);
        self
    }

    pub fn with_playlist(self, playlist: Playlist) -> Self {
        self.playlists.lock().unwrap().push(playlist);
        self
    }

    pub fn with_favorites(self, songs: Vec<Song>) -> Self {
        *self.favorites.lock().unwrap() = songs;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl LibraryBackend for ScriptedLibrary {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Song>> {
        self.record(format!("search:{}", query));
        self.hold_search.pass().await;
        if self.fail_search.load(Ordering::SeqCst) {
            bail!("offline");
        }
        let mut songs = self.results.lock().unwrap().get(query).cloned().unwrap_or_default();
        songs.truncate(limit);
        Ok(songs)
    }

    async fn fetch_playlist(&self, id: &str) -> Result<Playlist> {
        self.record(format!("fetch:{}", id));
        self.hold_fetch.pass().await;
        if self.fail_fetch.load(Ordering::SeqCst) {
            bail!("offline");
        }
        match self.playlists.lock().unwrap().iter().find(|p| p.id == id) {
            Some(playlist) => Ok(playlist.clone()),
            None => bail!("unknown playlist {}", id),
        }
    }

    async fn set_favorite(&self, song_id: &str, favorite: bool) -> Result<()> {
        self.record(format!("favorite:{}:{}", song_id, favorite));
        self.hold_favorite.pass().await;
        if self.fail_favorite.load(Ordering::SeqCst) {
            bail!("offline");
        }
        Ok(())
    }

    async fn playlists(&self) -> Result<Vec<Playlist>> {
        if self.fail_playlists.load(Ordering::SeqCst) {
            bail!("offline");
        }
        Ok(self
            .playlists
            .lock()
            .unwrap()
            .iter()
            .map(|p| Playlist {
                songs: Vec::new(),
                ..p.clone()
            })
            .collect())
    }

    async fn favorites(&self) -> Result<Vec<Song>> {
        Ok(self.favorites.lock().unwrap().clone())
    }

    async fn suggested_playlist(&self) -> Result<Option<Playlist>> {
        Ok(self.suggested.lock().unwrap().clone())
    }
}
