//! Playback-related types and state management

use crate::error::{CoreError, CoreResult};
use super::types::{ListKey, ListKind, Song, Tab};

/// Transport phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackPhase {
    /// Nothing selected
    #[default]
    Idle,
    /// A song was selected (or is rebuffering) and is not yet audible
    Loading,
    Playing,
    Paused,
}

impl PlaybackPhase {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackPhase::Idle => "idle",
            PlaybackPhase::Loading => "loading",
            PlaybackPhase::Playing => "playing",
            PlaybackPhase::Paused => "paused",
        }
    }
}

/// The song playback was started on, tied to the list version it came from
#[derive(Clone, Debug, PartialEq)]
pub struct NowPlaying {
    pub list: ListKey,
    pub index: usize,
    pub song: Song,
    /// Load attempt that started this song
    pub attempt: u64,
}

/// Flags consumed by views (`playerState` in the component props)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerState {
    pub is_playing: bool,
    pub is_buffering: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct PlaybackSnapshot {
    active_tab: Tab,
    now_playing: Option<NowPlaying>,
    phase: PlaybackPhase,
}

/// Transport state machine.
///
/// `Idle ⇄ Loading → Playing ⇄ Paused`. Loading counts as playing for the
/// views (the user asked for audio) and additionally reports buffering.
#[derive(Clone, Debug, Default)]
pub struct PlaybackController {
    active_tab: Tab,
    open_playlist_id: Option<String>,
    now_playing: Option<NowPlaying>,
    phase: PlaybackPhase,
    /// State to restore if the current load attempt fails
    rollback: Option<Box<PlaybackSnapshot>>,
    /// Last attempt id handed out
    attempts: u64,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn now_playing(&self) -> Option<&NowPlaying> {
        self.now_playing.as_ref()
    }

    pub fn current_song_index(&self) -> Option<usize> {
        self.now_playing.as_ref().map(|n| n.index)
    }

    pub fn open_playlist_id(&self) -> Option<&str> {
        self.open_playlist_id.as_deref()
    }

    /// Attempt id of the song the transport holds. Backend events tagged
    /// with any other attempt are stale.
    pub fn attempt(&self) -> Option<u64> {
        self.now_playing.as_ref().map(|n| n.attempt)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.phase, PlaybackPhase::Loading | PlaybackPhase::Playing)
    }

    pub fn is_buffering(&self) -> bool {
        self.phase == PlaybackPhase::Loading
    }

    pub fn player_state(&self) -> PlayerState {
        PlayerState {
            is_playing: self.is_playing(),
            is_buffering: self.is_buffering(),
        }
    }

    fn snapshot(&self) -> PlaybackSnapshot {
        // A rebuffering song is not audible, restoring it must not claim otherwise
        let phase = match self.phase {
            PlaybackPhase::Loading => PlaybackPhase::Paused,
            other => other,
        };
        PlaybackSnapshot {
            active_tab: self.active_tab,
            now_playing: self.now_playing.clone(),
            phase,
        }
    }

    fn restore(&mut self, snapshot: PlaybackSnapshot) {
        self.active_tab = snapshot.active_tab;
        self.now_playing = snapshot.now_playing;
        self.phase = snapshot.phase;
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Select `song` at `index` of `list` and start loading it.
    ///
    /// Tab, index and phase change together. Returns the attempt id the
    /// backend resolution must present.
    pub fn select_song(&mut self, list: ListKey, index: usize, song: Song) -> u64 {
        // A superseded load keeps the rollback of the first attempt
        if self.phase != PlaybackPhase::Loading || self.rollback.is_none() {
            self.rollback = Some(Box::new(self.snapshot()));
        }

        self.attempts += 1;
        let attempt = self.attempts;
        self.active_tab = list.kind.tab();
        tracing::info!(list = %list.kind, index, song_id = %song.id, attempt, "Song selected");
        self.now_playing = Some(NowPlaying {
            list,
            index,
            song,
            attempt,
        });
        self.phase = PlaybackPhase::Loading;
        attempt
    }

    /// Backend reports the selected song is audible.
    pub fn mark_ready(&mut self) -> CoreResult<()> {
        match self.phase {
            PlaybackPhase::Loading => {
                self.phase = PlaybackPhase::Playing;
                self.rollback = None;
                Ok(())
            }
            other => Err(CoreError::InvalidTransition {
                action: "start playing",
                state: other.label(),
            }),
        }
    }

    /// Backend ran out of data while playing.
    pub fn mark_buffering(&mut self) -> CoreResult<()> {
        match self.phase {
            PlaybackPhase::Playing => {
                self.phase = PlaybackPhase::Loading;
                self.rollback = None;
                Ok(())
            }
            PlaybackPhase::Loading => Ok(()),
            other => Err(CoreError::InvalidTransition {
                action: "buffer",
                state: other.label(),
            }),
        }
    }

    /// The current song finished. Returns it so the caller can pick a successor.
    pub fn mark_ended(&mut self) -> Option<NowPlaying> {
        if self.phase == PlaybackPhase::Idle {
            return None;
        }
        self.phase = PlaybackPhase::Idle;
        self.rollback = None;
        self.now_playing.take()
    }

    /// The backend failed. A failed load returns to the state before the
    /// attempt; a failure during playback pauses.
    pub fn fail(&mut self) {
        match self.phase {
            PlaybackPhase::Idle => {}
            PlaybackPhase::Loading => match self.rollback.take() {
                Some(snapshot) => self.restore(*snapshot),
                None => self.phase = PlaybackPhase::Paused,
            },
            PlaybackPhase::Playing | PlaybackPhase::Paused => self.phase = PlaybackPhase::Paused,
        }
    }

    /// Undo a load attempt whose `play` request was rejected.
    ///
    /// Returns `false` when a newer attempt has superseded `attempt`.
    pub fn rollback_attempt(&mut self, attempt: u64) -> bool {
        if attempt != self.attempts || self.phase != PlaybackPhase::Loading {
            return false;
        }
        match self.rollback.take() {
            Some(snapshot) => self.restore(*snapshot),
            None => self.phase = PlaybackPhase::Paused,
        }
        true
    }

    /// `Playing ⇄ Paused`. Returns the new phase.
    pub fn toggle_pause(&mut self) -> CoreResult<PlaybackPhase> {
        self.phase = match self.phase {
            PlaybackPhase::Playing => PlaybackPhase::Paused,
            PlaybackPhase::Paused => PlaybackPhase::Playing,
            other => {
                return Err(CoreError::InvalidTransition {
                    action: "toggle pause",
                    state: other.label(),
                });
            }
        };
        Ok(self.phase)
    }

    /// Drill into a playlist. Playback is untouched; rows of the new list are
    /// only highlighted if the playing song came from this very playlist.
    pub fn open_playlist(&mut self, playlist_id: &str) {
        self.open_playlist_id = Some(playlist_id.to_string());
    }

    /// Leave the opened playlist ("Back"). Never stops playback.
    pub fn close_playlist(&mut self) -> Option<String> {
        self.open_playlist_id.take()
    }

    /// Carry the playing index over to a new version of `kind`.
    ///
    /// If the playing song is no longer in `songs` the old key is kept, so no
    /// row of the new contents is treated as current.
    pub fn relocate(&mut self, kind: &ListKind, new_key: ListKey, songs: &[Song]) {
        let Some(now) = self.now_playing.as_mut() else {
            return;
        };
        if now.list.kind != *kind {
            return;
        }

        if let Some(index) = songs.iter().position(|s| s.id == now.song.id) {
            if index != now.index {
                tracing::debug!(list = %kind, from = now.index, to = index, "Playing index carried over");
            }
            now.index = index;
            now.list = new_key;
        }
    }

    /// Whether the playing song is row `index` of list version `key`.
    pub fn is_current(&self, key: &ListKey, index: usize) -> bool {
        self.now_playing
            .as_ref()
            .is_some_and(|n| n.list == *key && n.index == index)
    }
}
