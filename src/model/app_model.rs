//! Main application model with state management
//!
//! `AppModel` is the single owner of session state. Every mutation goes
//! through one of the transition methods below; views only ever see the
//! [`Snapshot`] built by [`AppModel::snapshot`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use super::library::LibraryStore;
use super::pending::{PendingGuard, PendingOps};
use super::playback::{PlaybackController, PlaybackPhase};
use super::projection::{
    ContentProjection, DrawerProjection, SearchBar, Snapshot, SongRow, StatusProjection,
};
use super::types::{ListKey, ListKind, Playlist, RowKey, Song, Tab};
use super::ui::{Notice, UiState};

/// Main application model containing all state
#[derive(Debug, Default)]
pub struct AppModel {
    library: LibraryStore,
    playback: PlaybackController,
    pending: PendingOps,
    ui: UiState,
    should_quit: bool,
}

impl AppModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn library(&self) -> &LibraryStore {
        &self.library
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    #[cfg(test)]
    pub fn pending(&self) -> &PendingOps {
        &self.pending
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_should_quit(&mut self, quit: bool) {
        self.should_quit = quit;
    }

    pub fn seed_library(&mut self, playlists: Vec<Playlist>, favorites: Vec<Song>) {
        tracing::info!(playlists = playlists.len(), favorites = favorites.len(), "Library seeded");
        self.library.seed(playlists, favorites);
    }

    // ========================================================================
    // Lists
    // ========================================================================

    /// Song list the main content area shows, `None` for the playlists summary
    pub fn displayed_list(&self) -> Option<ListKind> {
        match self.ui.content_type {
            Tab::Search => Some(ListKind::Search),
            Tab::Favorites => Some(ListKind::Favorites),
            Tab::Playlists => self
                .playback
                .open_playlist_id()
                .map(|id| ListKind::Playlist(id.to_string())),
        }
    }

    /// Song list a content type denotes right now
    pub fn list_for(&self, content_type: Tab) -> CoreResult<ListKind> {
        match content_type {
            Tab::Search => Ok(ListKind::Search),
            Tab::Favorites => Ok(ListKind::Favorites),
            Tab::Playlists => self
                .playback
                .open_playlist_id()
                .map(|id| ListKind::Playlist(id.to_string()))
                .ok_or_else(|| CoreError::playlist_not_found("<none opened>")),
        }
    }

    pub fn song_at(&self, list: &ListKind, index: usize) -> CoreResult<Song> {
        self.library
            .songs(list)
            .and_then(|songs| songs.get(index))
            .cloned()
            .ok_or_else(|| CoreError::song_not_found(format!("{}#{}", list, index)))
    }

    pub fn locate(&self, list: &ListKind, song_id: &str) -> CoreResult<usize> {
        self.library
            .position(list, song_id)
            .ok_or_else(|| CoreError::song_not_found(song_id))
    }

    /// Whether `song_id` in the current version of `list` is the playing song
    pub fn is_now_playing(&self, list: &ListKind, song_id: &str) -> bool {
        let (Some(now), Some(key)) = (self.playback.now_playing(), self.library.list_key(list)) else {
            return false;
        };
        now.list == key && now.song.id == song_id
    }

    fn content_len(&self) -> usize {
        match self.displayed_list() {
            Some(list) => self.library.songs(&list).map_or(0, <[Song]>::len),
            None => self.library.list_playlists().len(),
        }
    }

    /// Keep playback index and pending rows consistent with a mutated list
    fn list_changed(&mut self, list: &ListKind) {
        let (Some(key), Some(songs)) = (self.library.list_key(list), self.library.songs(list)) else {
            return;
        };
        self.playback.relocate(list, key, songs);

        let library = &self.library;
        self.pending
            .retain(|row| row.list != *list || library.contains(list, &row.song_id));

        let len = self.content_len();
        self.ui.clamp_cursor(len);
        let drawer_len = self.drawer_len();
        self.ui.drawer.cursor = self.ui.drawer.cursor.min(drawer_len.saturating_sub(1));
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Select the song at `index` of `list`; tab, index and loading state change together.
    pub fn select_song(&mut self, list: &ListKind, index: usize) -> CoreResult<(u64, Song)> {
        let song = self.song_at(list, index)?;
        let key = self
            .library
            .list_key(list)
            .ok_or_else(|| CoreError::playlist_not_found(list.to_string()))?;
        let attempt = self.playback.select_song(key, index, song.clone());
        Ok((attempt, song))
    }

    pub fn begin_row(&self, list: &ListKind, song_id: &str) -> Option<PendingGuard> {
        self.pending.begin(RowKey::new(list.clone(), song_id))
    }

    pub fn toggle_pause(&mut self) -> CoreResult<PlaybackPhase> {
        self.playback.toggle_pause()
    }

    /// Undo a `toggle_pause` the backend refused
    pub fn revert_pause(&mut self, expected: PlaybackPhase) {
        if self.playback.phase() == expected {
            let _ = self.playback.toggle_pause();
        }
    }

    pub fn rollback_attempt(&mut self, attempt: u64) -> bool {
        self.playback.rollback_attempt(attempt)
    }

    pub fn on_ready(&mut self) -> CoreResult<()> {
        self.playback.mark_ready()
    }

    pub fn on_buffering(&mut self) -> CoreResult<()> {
        self.playback.mark_buffering()
    }

    pub fn on_playback_error(&mut self) {
        self.playback.fail();
    }

    /// Finish the current song and, when asked to, select the next one of the same list.
    pub fn on_ended(&mut self, auto_advance: bool) -> Option<(u64, Song)> {
        let ended = self.playback.mark_ended()?;
        if !auto_advance {
            return None;
        }

        let list = ended.list.kind.clone();
        // Only advance within the list version playback started from
        if self.library.list_key(&list) != Some(ended.list.clone()) {
            return None;
        }
        self.select_song(&list, ended.index + 1).ok()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn set_content_type(&mut self, tab: Tab) {
        if self.ui.content_type != tab {
            self.ui.content_type = tab;
            self.ui.cursor = 0;
            self.ui.is_loading = false;
        }
    }

    /// Drill into a library playlist. Returns whether its songs still need fetching.
    pub fn open_playlist(&mut self, playlist_id: &str) -> CoreResult<bool> {
        let needs_fetch = self
            .library
            .playlist(playlist_id)
            .map(|p| p.songs.is_empty())
            .ok_or_else(|| CoreError::playlist_not_found(playlist_id))?;

        self.playback.open_playlist(playlist_id);
        self.ui.content_type = Tab::Playlists;
        self.ui.cursor = 0;
        self.ui.is_loading = false;
        // Invalidate any fetch for a previously opened playlist
        self.ui.fetch_generation += 1;

        Ok(needs_fetch)
    }

    pub fn close_playlist(&mut self) -> Option<String> {
        let closed = self.playback.close_playlist();
        if closed.is_some() {
            self.ui.cursor = 0;
            self.ui.is_loading = false;
            self.ui.fetch_generation += 1;
        }
        closed
    }

    pub fn add_playlist(&mut self, playlist: Playlist) -> bool {
        self.library.add_playlist(playlist)
    }

    pub fn begin_playlist_fetch(&mut self) -> u64 {
        self.ui.fetch_generation += 1;
        self.ui.is_loading = true;
        self.ui.fetch_generation
    }

    /// Apply a fetched playlist unless the user navigated away meanwhile.
    pub fn apply_fetched_playlist(&mut self, generation: u64, playlist: Playlist) -> bool {
        let still_open = self.playback.open_playlist_id() == Some(playlist.id.as_str());
        if generation != self.ui.fetch_generation || !still_open {
            tracing::debug!(playlist_id = %playlist.id, "Discarding stale playlist fetch");
            return false;
        }
        self.ui.is_loading = false;

        let list = ListKind::Playlist(playlist.id.clone());
        if let Err(e) = self.library.replace_playlist(playlist) {
            tracing::debug!(error = %e, "Fetched playlist no longer in library");
            return false;
        }
        self.list_changed(&list);
        true
    }

    pub fn fail_playlist_fetch(&mut self, generation: u64, error: &CoreError, now: DateTime<Utc>) {
        if generation == self.ui.fetch_generation {
            self.ui.is_loading = false;
            self.raise(error, now);
        }
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub fn search_input(&mut self) -> &mut String {
        &mut self.ui.search_input
    }

    pub fn set_editing_search(&mut self, editing: bool) {
        self.ui.editing_search = editing;
    }

    pub fn begin_search(&mut self) -> u64 {
        self.ui.search_generation += 1;
        self.set_content_type(Tab::Search);
        self.ui.is_loading = true;
        self.ui.search_generation
    }

    /// Replace search results unless a newer search superseded this one.
    pub fn apply_search_results(&mut self, generation: u64, query: String, songs: Vec<Song>) -> bool {
        if generation != self.ui.search_generation {
            tracing::debug!(%query, "Discarding stale search results");
            return false;
        }
        self.ui.is_loading = false;
        self.library.set_search_results(Some(query), songs);
        self.list_changed(&ListKind::Search);
        true
    }

    pub fn fail_search(&mut self, generation: u64, error: &CoreError, now: DateTime<Utc>) {
        if generation == self.ui.search_generation {
            self.ui.is_loading = false;
            self.raise(error, now);
        }
    }

    pub fn clear_search_results(&mut self) {
        // Also cancels a search in flight
        self.ui.search_generation += 1;
        if self.ui.content_type == Tab::Search {
            self.ui.is_loading = false;
        }
        self.library.clear_search_results();
        self.list_changed(&ListKind::Search);
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    /// Synchronous store toggle. Returns the new membership.
    pub fn toggle_favorite(&mut self, song: &Song, source_index: Option<usize>) -> bool {
        let favorite = self.library.toggle_favorite(song, source_index);
        self.list_changed(&ListKind::Favorites);
        favorite
    }

    /// Apply a resolved favorite change for a row of `list`.
    ///
    /// Fails with `NotFound` if the row vanished while the change was in
    /// flight. Returns whether the store changed.
    pub fn apply_favorite(&mut self, list: &ListKind, song: &Song, favorite: bool) -> CoreResult<bool> {
        if !self.library.contains(list, &song.id) {
            return Err(CoreError::song_not_found(&song.id));
        }
        if self.library.is_favorite(&song.id) == favorite {
            return Ok(false);
        }
        self.toggle_favorite(song, None);
        Ok(true)
    }

    // ========================================================================
    // Drawer
    // ========================================================================

    pub fn open_drawer(&mut self, tab: Tab) {
        self.ui.drawer.is_open = true;
        if tab != Tab::Search {
            self.ui.drawer.active_tab = tab;
        }
        self.ui.drawer.cursor = 0;
    }

    pub fn close_drawer(&mut self) {
        self.ui.drawer.is_open = false;
    }

    pub fn set_drawer_tab(&mut self, tab: Tab) -> CoreResult<()> {
        if tab == Tab::Search {
            return Err(CoreError::InvalidTransition {
                action: "show search in the drawer",
                state: "browsing the drawer",
            });
        }
        if self.ui.drawer.active_tab != tab {
            self.ui.drawer.active_tab = tab;
            self.ui.drawer.cursor = 0;
        }
        Ok(())
    }

    /// Play favorite `index` picked from the drawer: closes the drawer and
    /// jumps the main view to favorites.
    pub fn select_favorite_from_drawer(&mut self, index: usize) -> CoreResult<(u64, Song)> {
        let selected = self.select_song(&ListKind::Favorites, index)?;
        self.ui.drawer.is_open = false;
        self.set_content_type(Tab::Favorites);
        self.ui.cursor = index;
        Ok(selected)
    }

    fn drawer_len(&self) -> usize {
        match self.ui.drawer.active_tab {
            Tab::Playlists => self.library.list_playlists().len(),
            Tab::Favorites | Tab::Search => self.library.list_favorites().len(),
        }
    }

    pub fn move_cursor_up(&mut self) {
        if self.ui.drawer.is_open {
            self.ui.drawer.cursor = self.ui.drawer.cursor.saturating_sub(1);
        } else {
            self.ui.move_cursor_up();
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.ui.drawer.is_open {
            if self.ui.drawer.cursor + 1 < self.drawer_len() {
                self.ui.drawer.cursor += 1;
            }
        } else {
            let len = self.content_len();
            self.ui.move_cursor_down(len);
        }
    }

    // ========================================================================
    // Notices
    // ========================================================================

    /// Surface `error` if it is user-visible; silent errors are only logged.
    pub fn raise(&mut self, error: &CoreError, now: DateTime<Utc>) {
        match error.notice() {
            Some(message) => {
                tracing::warn!(error = %error, "Operation failed");
                self.ui.notice = Some(Notice {
                    message,
                    raised_at: now,
                });
            }
            None => tracing::debug!(error = %error, "Ignored"),
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.ui.notice = None;
    }

    pub fn expire_notice(&mut self, now: DateTime<Utc>, timeout: chrono::Duration) {
        if self.ui.notice.as_ref().is_some_and(|n| now - n.raised_at > timeout) {
            self.ui.notice = None;
        }
    }

    // ========================================================================
    // Projection
    // ========================================================================

    fn rows(&self, list: &ListKind) -> Vec<SongRow> {
        let (Some(songs), Some(key)) = (self.library.songs(list), self.library.list_key(list)) else {
            return Vec::new();
        };
        let buffering = self.playback.is_buffering();

        songs
            .iter()
            .enumerate()
            .map(|(position, song)| {
                let is_current = self.is_current(&key, position);
                let pending = self.pending.is_pending(&RowKey::new(list.clone(), &song.id));
                SongRow {
                    position,
                    id: song.id.clone(),
                    title: song.display.title.clone(),
                    subtitle: song.display.subtitle.clone(),
                    thumbnail: song.thumbnail.clone(),
                    duration: song.duration,
                    is_favorite: self.library.is_favorite(&song.id),
                    is_current,
                    is_loading: pending || (is_current && buffering),
                }
            })
            .collect()
    }

    fn is_current(&self, key: &ListKey, position: usize) -> bool {
        self.playback.is_current(key, position)
    }

    pub fn content_projection(&self) -> ContentProjection {
        let list = self.displayed_list();
        let current_playlist = match &list {
            Some(ListKind::Playlist(id)) => self.library.playlist(id).map(Playlist::summary),
            _ => None,
        };
        let items = list.as_ref().map(|l| self.rows(l)).unwrap_or_default();

        let title = match (&list, &current_playlist) {
            (_, Some(playlist)) => playlist.name.clone(),
            (Some(ListKind::Search), _) => match self.library.search_query() {
                Some(query) => format!("Results for \"{}\"", query),
                None => "Search".to_string(),
            },
            (Some(ListKind::Favorites), _) => "Your Favorites".to_string(),
            _ => "Your Playlists".to_string(),
        };

        ContentProjection {
            title,
            content_type: self.ui.content_type,
            is_loading: self.ui.is_loading,
            current_song_index: items.iter().position(|r| r.is_current),
            loading_songs: items
                .iter()
                .filter(|r| r.is_loading)
                .map(|r| r.position)
                .collect::<BTreeSet<_>>(),
            items,
            current_playlist,
            is_playing: self.playback.is_playing(),
            active_tab: self.playback.active_tab(),
            player_state: self.playback.player_state(),
            playlists: self.library.list_playlists().iter().map(Playlist::summary).collect(),
            cursor: self.ui.cursor,
        }
    }

    pub fn drawer_projection(&self) -> DrawerProjection {
        DrawerProjection {
            is_open: self.ui.drawer.is_open,
            active_tab: self.ui.drawer.active_tab,
            playlists: self.library.list_playlists().iter().map(Playlist::summary).collect(),
            favorites: self.rows(&ListKind::Favorites),
            cursor: self.ui.drawer.cursor,
        }
    }

    pub fn status_projection(&self) -> StatusProjection {
        let now = self.playback.now_playing();
        StatusProjection {
            title: now.map(|n| n.song.display.title.clone()),
            subtitle: now.map(|n| n.song.display.subtitle.clone()),
            phase: self.playback.phase(),
            notice: self.ui.notice.as_ref().map(|n| n.message.clone()),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            content: self.content_projection(),
            drawer: self.drawer_projection(),
            status: self.status_projection(),
            search: SearchBar {
                input: self.ui.search_input.clone(),
                editing: self.ui.editing_search,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::projection::RenderMode;

    fn song(id: &str) -> Song {
        Song::new(id, format!("Song {id}"), "Artist")
    }

    fn songs(ids: &[&str]) -> Vec<Song> {
        ids.iter().map(|id| song(id)).collect()
    }

    fn playlist(id: &str, n: usize) -> Playlist {
        let tracks = (0..n).map(|i| song(&format!("{id}-{i}"))).collect();
        Playlist::new(id, format!("Playlist {id}"), tracks)
    }

    fn with_search(ids: &[&str]) -> AppModel {
        let mut model = AppModel::new();
        let generation = model.begin_search();
        assert!(model.apply_search_results(generation, "q".into(), songs(ids)));
        model
    }

    #[test]
    fn selecting_from_search_enters_loading() {
        let mut model = with_search(&["s1", "s2"]);

        let (_, selected) = model.select_song(&ListKind::Search, 1).unwrap();
        assert_eq!(selected.id, "s2");

        let view = model.content_projection();
        assert_eq!(view.active_tab, Tab::Search);
        assert_eq!(view.current_song_index, Some(1));
        assert_eq!(model.playback().phase(), PlaybackPhase::Loading);
        assert!(view.items[1].is_loading, "current row shows buffering");
        assert_eq!(view.loading_songs, BTreeSet::from([1]));
    }

    #[test]
    fn out_of_range_selection_is_not_found() {
        let mut model = with_search(&["s1"]);
        let err = model.select_song(&ListKind::Search, 4).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert_eq!(model.playback().phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn playlist_selection_survives_unrelated_search() {
        let mut model = AppModel::new();
        model.seed_library(vec![playlist("p", 5)], Vec::new());
        assert_eq!(model.open_playlist("p"), Ok(false));
        model.select_song(&ListKind::Playlist("p".into()), 3).unwrap();

        let generation = model.begin_search();
        model.apply_search_results(generation, "other".into(), songs(&["x", "y"]));

        assert_eq!(model.playback().current_song_index(), Some(3));
        assert_eq!(model.playback().open_playlist_id(), Some("p"));
        assert_eq!(model.playback().active_tab(), Tab::Playlists);
    }

    #[test]
    fn open_then_close_leaves_library_untouched() {
        let mut model = AppModel::new();
        let p = playlist("p", 3);
        model.seed_library(vec![p.clone()], songs(&["f"]));
        let before = model.library().clone();

        model.open_playlist(&p.id).unwrap();
        model.close_playlist();

        assert_eq!(model.library().list_playlists(), before.list_playlists());
        assert_eq!(model.library().list_favorites(), before.list_favorites());
        assert_eq!(model.library().search_results(), before.search_results());
    }

    #[test]
    fn drawer_cursor_follows_shrinking_favorites() {
        let mut model = AppModel::new();
        model.seed_library(Vec::new(), songs(&["f0", "f1", "f2"]));
        model.open_drawer(Tab::Favorites);
        model.move_cursor_down();
        model.move_cursor_down();
        assert_eq!(model.drawer_projection().cursor, 2);

        assert_eq!(model.apply_favorite(&ListKind::Favorites, &song("f2"), false), Ok(true));
        assert_eq!(model.drawer_projection().cursor, 1);

        let cursor = model.drawer_projection().cursor;
        let (_, selected) = model.select_favorite_from_drawer(cursor).unwrap();
        assert_eq!(selected.id, "f1");
    }

    #[test]
    fn opening_unknown_playlist_is_not_found_and_adds_nothing() {
        let mut model = AppModel::new();

        let err = model.open_playlist("p").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert!(model.close_playlist().is_none());
        assert!(model.library().list_playlists().is_empty());
    }

    #[test]
    fn opened_playlist_uses_track_list_and_fresh_highlight() {
        let mut model = AppModel::new();
        model.seed_library(vec![playlist("a", 4), playlist("b", 4)], Vec::new());
        model.open_playlist("a").unwrap();
        model.select_song(&ListKind::Playlist("a".into()), 2).unwrap();
        model.on_ready().unwrap();

        model.close_playlist();
        model.open_playlist("b").unwrap();
        let view = model.content_projection();
        assert_eq!(view.render_mode(), RenderMode::TrackList);
        assert_eq!(view.title, "Playlist b");
        assert_eq!(view.current_song_index, None, "no stale highlight from playlist a");
        assert!(view.is_playing, "playback continues while browsing");

        model.close_playlist();
        model.open_playlist("a").unwrap();
        assert_eq!(model.content_projection().current_song_index, Some(2));
    }

    #[test]
    fn same_index_in_another_list_is_not_current() {
        let mut model = with_search(&["s1", "s2", "s3"]);
        model.seed_library(Vec::new(), songs(&["f1", "f2", "f3"]));
        model.select_song(&ListKind::Search, 1).unwrap();

        model.set_content_type(Tab::Favorites);
        let view = model.content_projection();
        assert_eq!(view.current_song_index, None);
        assert!(view.items.iter().all(|r| !r.is_current));
    }

    #[test]
    fn search_replacement_carries_over_or_drops_playing_index() {
        let mut model = with_search(&["a", "b", "c"]);
        model.select_song(&ListKind::Search, 2).unwrap();

        let generation = model.begin_search();
        model.apply_search_results(generation, "q2".into(), songs(&["c", "z"]));
        assert_eq!(model.content_projection().current_song_index, Some(0));

        let generation = model.begin_search();
        model.apply_search_results(generation, "q3".into(), songs(&["x", "y", "z"]));
        assert_eq!(model.content_projection().current_song_index, None);
        assert!(model.playback().is_playing());
    }

    #[test]
    fn stale_search_results_are_discarded() {
        let mut model = AppModel::new();
        let old = model.begin_search();
        let new = model.begin_search();

        assert!(!model.apply_search_results(old, "old".into(), songs(&["o"])));
        assert!(model.ui().is_loading);
        assert!(model.apply_search_results(new, "new".into(), songs(&["n"])));
        assert!(!model.ui().is_loading);
        assert_eq!(model.library().search_results(), songs(&["n"]).as_slice());
    }

    #[test]
    fn new_search_clears_pending_rows_that_disappeared() {
        let mut model = with_search(&["a", "b"]);
        let kept = model.begin_row(&ListKind::Search, "a").unwrap();
        let dropped = model.begin_row(&ListKind::Search, "b").unwrap();
        let favorite_row = model.begin_row(&ListKind::Favorites, "b").unwrap();

        let generation = model.begin_search();
        model.apply_search_results(generation, "q".into(), songs(&["a", "c"]));

        assert!(model.pending().is_pending(kept.key()));
        assert!(!model.pending().is_pending(dropped.key()));
        assert!(model.pending().is_pending(favorite_row.key()));
    }

    #[test]
    fn drawer_favorite_selection_syncs_main_view() {
        let mut model = AppModel::new();
        model.seed_library(vec![playlist("p", 2)], songs(&["f0", "f1", "f2"]));
        model.open_drawer(Tab::Playlists);
        assert_eq!(model.drawer_projection().active_tab, Tab::Playlists);

        model.select_favorite_from_drawer(2).unwrap();

        let drawer = model.drawer_projection();
        let content = model.content_projection();
        assert!(!drawer.is_open);
        assert_eq!(content.active_tab, Tab::Favorites);
        assert_eq!(content.content_type, Tab::Favorites);
        assert_eq!(content.current_song_index, Some(2));
        assert!(drawer.favorites[2].is_current);
    }

    #[test]
    fn drawer_tab_is_independent_of_playback_tab() {
        let mut model = with_search(&["s"]);
        model.seed_library(Vec::new(), songs(&["f"]));
        model.select_song(&ListKind::Search, 0).unwrap();

        model.open_drawer(Tab::Favorites);
        model.set_drawer_tab(Tab::Playlists).unwrap();
        assert!(model.set_drawer_tab(Tab::Search).is_err());

        assert_eq!(model.drawer_projection().active_tab, Tab::Playlists);
        assert_eq!(model.playback().active_tab(), Tab::Search);
        assert_eq!(model.content_projection().current_song_index, Some(0));
    }

    #[test]
    fn removing_a_favorite_shifts_the_playing_index() {
        let mut model = AppModel::new();
        model.seed_library(Vec::new(), songs(&["a", "b", "c"]));
        model.select_song(&ListKind::Favorites, 2).unwrap();

        assert_eq!(model.apply_favorite(&ListKind::Favorites, &song("a"), false), Ok(true));
        let view = model.drawer_projection();
        assert_eq!(view.favorites.len(), 2);
        assert!(view.favorites[1].is_current);
    }

    #[test]
    fn favorite_resolution_for_vanished_row_is_rejected() {
        let mut model = with_search(&["a"]);
        let generation = model.begin_search();
        model.apply_search_results(generation, "q".into(), songs(&["b"]));

        let result = model.apply_favorite(&ListKind::Search, &song("a"), true);
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
        assert!(model.library().list_favorites().is_empty());
    }

    #[test]
    fn ended_song_advances_within_same_list_version() {
        let mut model = with_search(&["a", "b"]);
        model.select_song(&ListKind::Search, 0).unwrap();
        model.on_ready().unwrap();

        let (_, next) = model.on_ended(true).unwrap();
        assert_eq!(next.id, "b");
        assert_eq!(model.playback().current_song_index(), Some(1));

        model.on_ready().unwrap();
        assert!(model.on_ended(true).is_none());
        assert_eq!(model.playback().phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn notices_expire() {
        let mut model = AppModel::new();
        let t0 = Utc::now();
        let error = CoreError::backend("search", &anyhow::anyhow!("offline"));
        model.raise(&error, t0);
        assert!(model.status_projection().notice.is_some());

        model.expire_notice(t0 + chrono::Duration::seconds(2), chrono::Duration::seconds(5));
        assert!(model.status_projection().notice.is_some());
        model.expire_notice(t0 + chrono::Duration::seconds(6), chrono::Duration::seconds(5));
        assert!(model.status_projection().notice.is_none());

        model.raise(&CoreError::song_not_found("x"), t0);
        assert!(model.status_projection().notice.is_none());
    }

    #[test]
    fn summary_view_lists_playlists() {
        let mut model = AppModel::new();
        model.seed_library(vec![playlist("p", 3)], Vec::new());
        model.set_content_type(Tab::Playlists);

        let view = model.content_projection();
        assert!(view.shows_playlist_summary());
        assert_eq!(view.render_mode(), RenderMode::CardGrid);
        assert_eq!(view.title, "Your Playlists");
        assert_eq!(view.playlists[0].track_count, 3);
        assert!(view.empty_state().is_none());
    }
}
