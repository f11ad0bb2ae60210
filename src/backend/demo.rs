//! In-memory backends that simulate a remote catalog and a player

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::{mpsc, Mutex, RwLock};

use crate::model::{ingest_songs, Playlist, RawPlaylist, RawSong, Song};
use super::{BackendEvent, LibraryBackend, PlaybackBackend};

const PLAYBACK_TICK: Duration = Duration::from_millis(250);
const DEFAULT_TRACK_LENGTH: Duration = Duration::from_secs(180);

/// On-disk shape of a demo library seed
#[derive(Debug, Default, Deserialize)]
pub struct LibraryFile {
    #[serde(default)]
    pub playlists: Vec<RawPlaylist>,
    #[serde(default)]
    pub favorites: Vec<RawSong>,
    #[serde(default)]
    pub catalog: Vec<RawSong>,
    #[serde(default)]
    pub suggested: Option<RawPlaylist>,
}

fn builtin_song(id: &str, title: &str, artist: &str, secs: u64) -> Song {
    Song::new(id, title, artist).with_duration(Duration::from_secs(secs))
}

/// A remote catalog kept in memory
pub struct DemoLibrary {
    catalog: Vec<Song>,
    playlists: Vec<Playlist>,
    favorites: Vec<Song>,
    suggested: Option<Playlist>,
    favorite_ids: RwLock<HashSet<String>>,
    latency: Duration,
}

impl DemoLibrary {
    pub fn from_file(path: &Path, latency: Duration) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading library {}", path.display()))?;
        let file: LibraryFile = serde_json::from_str(&content)
            .with_context(|| format!("parsing library {}", path.display()))?;
        Ok(Self::from_library_file(file, latency))
    }

    pub fn from_library_file(file: LibraryFile, latency: Duration) -> Self {
        let favorites = ingest_songs(file.favorites);
        let favorite_ids = favorites.iter().map(|s| s.id.clone()).collect();
        Self {
            catalog: ingest_songs(file.catalog),
            playlists: file.playlists.into_iter().map(Playlist::from).collect(),
            favorites,
            suggested: file.suggested.map(Playlist::from),
            favorite_ids: RwLock::new(favorite_ids),
            latency,
        }
    }

    /// A small library that works without any seed file
    pub fn builtin(latency: Duration) -> Self {
        let catalog = vec![
            builtin_song("c1", "Midnight City", "M83", 243),
            builtin_song("c2", "Teardrop", "Massive Attack", 330),
            builtin_song("c3", "Breathe", "Télépopmusik", 279),
            builtin_song("c4", "Nightcall", "Kavinsky", 258),
            builtin_song("c5", "Intro", "The xx", 128),
            builtin_song("c6", "Genesis", "Grimes", 255),
            builtin_song("c7", "Windowlicker", "Aphex Twin", 367),
            builtin_song("c8", "Porcelain", "Moby", 241),
        ];
        let pick = |ids: &[&str]| -> Vec<Song> {
            catalog.iter().filter(|s| ids.contains(&s.id.as_str())).cloned().collect()
        };

        let playlists = vec![
            Playlist::new("p-night", "Night Drive", pick(&["c1", "c4", "c6"])),
            Playlist::new("p-chill", "Chill", pick(&["c2", "c3", "c5", "c8"])),
        ];
        let favorites = pick(&["c2", "c7"]);
        let suggested = Some(Playlist::new("p-discover", "Discover Mix", pick(&["c5", "c6", "c7"])));

        Self {
            favorite_ids: RwLock::new(favorites.iter().map(|s| s.id.clone()).collect()),
            catalog,
            playlists,
            favorites,
            suggested,
            latency,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    async fn search_catalog(&self, needle: &str) -> Vec<Song> {
        self.catalog.iter().filter(|s| matches(s, needle)).cloned().collect()
    }

    async fn search_playlists(&self, needle: &str) -> Vec<Song> {
        self.playlists
            .iter()
            .flat_map(|p| p.songs.iter())
            .filter(|s| matches(s, needle))
            .cloned()
            .collect()
    }
}

fn matches(song: &Song, needle: &str) -> bool {
    song.title().to_lowercase().contains(needle) || song.subtitle().to_lowercase().contains(needle)
}

#[async_trait]
impl LibraryBackend for DemoLibrary {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Song>> {
        self.simulate_latency().await;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let (catalog_hits, playlist_hits) =
            futures::join!(self.search_catalog(&needle), self.search_playlists(&needle));

        let mut seen = HashSet::new();
        let results: Vec<Song> = catalog_hits
            .into_iter()
            .chain(playlist_hits)
            .filter(|s| seen.insert(s.id.clone()))
            .take(limit)
            .collect();

        tracing::debug!(query, results = results.len(), "Demo search completed");
        Ok(results)
    }

    async fn fetch_playlist(&self, id: &str) -> Result<Playlist> {
        self.simulate_latency().await;
        self.playlists
            .iter()
            .chain(self.suggested.iter())
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("playlist {} does not exist", id))
    }

    async fn set_favorite(&self, song_id: &str, favorite: bool) -> Result<()> {
        self.simulate_latency().await;
        let mut ids = self.favorite_ids.write().await;
        if favorite {
            ids.insert(song_id.to_string());
        } else {
            ids.remove(song_id);
        }
        Ok(())
    }

    async fn playlists(&self) -> Result<Vec<Playlist>> {
        // Song lists are loaded lazily when a playlist is opened
        Ok(self
            .playlists
            .iter()
            .map(|p| Playlist {
                songs: Vec::new(),
                ..p.clone()
            })
            .collect())
    }

    async fn favorites(&self) -> Result<Vec<Song>> {
        Ok(self.favorites.clone())
    }

    async fn suggested_playlist(&self) -> Result<Option<Playlist>> {
        Ok(self.suggested.clone())
    }
}

#[derive(Debug, Default)]
struct Transport {
    generation: u64,
    loaded: bool,
    paused: bool,
}

/// A player that pretends to stream each song for its duration
pub struct DemoPlayer {
    events: mpsc::UnboundedSender<BackendEvent>,
    transport: Arc<Mutex<Transport>>,
    latency: Duration,
}

impl DemoPlayer {
    pub fn new(latency: Duration) -> (Self, mpsc::UnboundedReceiver<BackendEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let player = Self {
            events: tx,
            transport: Arc::new(Mutex::new(Transport::default())),
            latency,
        };
        (player, rx)
    }
}

#[async_trait]
impl PlaybackBackend for DemoPlayer {
    async fn play(&self, attempt: u64, song: &Song) -> Result<()> {
        let generation = {
            let mut transport = self.transport.lock().await;
            transport.generation += 1;
            transport.loaded = true;
            transport.paused = false;
            transport.generation
        };

        let events = self.events.clone();
        let transport = self.transport.clone();
        let latency = self.latency;
        let length = song.duration.unwrap_or(DEFAULT_TRACK_LENGTH);
        let song_id = song.id.clone();

        tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            if transport.lock().await.generation != generation {
                return;
            }
            let _ = events.send(BackendEvent::Ready(attempt));

            let mut elapsed = Duration::ZERO;
            loop {
                tokio::time::sleep(PLAYBACK_TICK).await;
                let state = transport.lock().await;
                if state.generation != generation {
                    return;
                }
                if state.paused {
                    continue;
                }
                elapsed += PLAYBACK_TICK;
                if elapsed >= length {
                    tracing::debug!(%song_id, "Demo track finished");
                    let _ = events.send(BackendEvent::Ended(attempt));
                    return;
                }
            }
        });
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        let mut transport = self.transport.lock().await;
        if !transport.loaded {
            return Err(anyhow!("nothing is loaded"));
        }
        transport.paused = true;
        Ok(())
    }

    async fn resume(&self) -> Result<()> {
        let mut transport = self.transport.lock().await;
        if !transport.loaded {
            return Err(anyhow!("nothing is loaded"));
        }
        transport.paused = false;
        Ok(())
    }
}
