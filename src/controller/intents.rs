//! User intents and their synchronous application to the model
//!
//! Every intent is applied under the model lock in arrival order. The part
//! that needs a backend comes back as an [`Effect`] which runs after the lock
//! is released.

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::model::{AppModel, ListKind, PendingGuard, PlaybackPhase, Playlist, Song, Tab};
use super::AppController;

/// Everything the presentation layer can ask for
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    /// Play `song` from the list `content_type` denotes
    PlaySong { song: Song, content_type: Tab },
    /// Toggle favorite for row `index` of the main content
    ToggleFavorite { song: Song, index: usize },
    /// Toggle favorite for a row of the drawer's favorites list
    DrawerToggleFavorite { song: Song },
    PlaylistSelect(Playlist),
    PlaylistBack,
    AddPlaylist(Playlist),
    SwitchTab(Tab),
    Search(String),
    ClearSearchResults,
    TogglePause,
    OpenDrawer(Tab),
    CloseDrawer,
    SetDrawerTab(Tab),
    DrawerSelectFavorite(usize),
    DrawerSelectPlaylist(Playlist),
    DismissNotice,
    Quit,
}

/// Backend work left over after an intent was applied
#[derive(Debug)]
pub(crate) enum Effect {
    None,
    Play {
        attempt: u64,
        song: Song,
    },
    Pause,
    Resume,
    PersistFavorite {
        list: ListKind,
        song: Song,
        favorite: bool,
        guard: PendingGuard,
    },
    Search {
        generation: u64,
        query: String,
    },
    FetchPlaylist {
        generation: u64,
        playlist_id: String,
    },
}

impl Effect {
    fn play((attempt, song): (u64, Song)) -> Self {
        Effect::Play { attempt, song }
    }
}

impl AppController {
    /// Apply `intent` and wait for its backend work to land.
    pub async fn dispatch(&self, intent: Intent) {
        let effect = self.apply(intent).await;
        self.run_effect(effect).await;
    }

    /// Apply `intent` now and let its backend work finish in the background.
    pub async fn submit(&self, intent: Intent) {
        let effect = self.apply(intent).await;
        if matches!(effect, Effect::None) {
            return;
        }
        let controller = self.clone();
        tokio::spawn(async move {
            controller.run_effect(effect).await;
        });
    }

    async fn apply(&self, intent: Intent) -> Effect {
        tracing::debug!(?intent, "Applying intent");
        let mut model = self.model.lock().await;
        match apply_intent(&mut model, intent) {
            Ok(effect) => effect,
            Err(e) => {
                model.raise(&e, Utc::now());
                Effect::None
            }
        }
    }
}

pub(crate) fn apply_intent(model: &mut AppModel, intent: Intent) -> CoreResult<Effect> {
    match intent {
        Intent::PlaySong { song, content_type } => play_song(model, &song, content_type),
        Intent::ToggleFavorite { song, index } => {
            let list = model.list_for(model.ui().content_type)?;
            tracing::debug!(%list, index, song_id = %song.id, "Favorite toggle requested");
            begin_favorite(model, list, song)
        }
        Intent::DrawerToggleFavorite { song } => begin_favorite(model, ListKind::Favorites, song),
        Intent::PlaylistSelect(playlist) => select_playlist(model, &playlist),
        Intent::PlaylistBack => {
            if model.close_playlist().is_none() {
                return Err(CoreError::InvalidTransition {
                    action: "go back",
                    state: "no playlist is open",
                });
            }
            Ok(Effect::None)
        }
        Intent::AddPlaylist(playlist) => {
            let id = playlist.id.clone();
            if model.add_playlist(playlist) {
                tracing::info!(playlist_id = %id, "Playlist added");
            }
            Ok(Effect::None)
        }
        Intent::SwitchTab(tab) => {
            model.set_content_type(tab);
            Ok(Effect::None)
        }
        Intent::Search(query) => {
            let query = query.trim().to_string();
            model.set_editing_search(false);
            if query.is_empty() {
                model.clear_search_results();
                model.set_content_type(Tab::Search);
                return Ok(Effect::None);
            }
            let generation = model.begin_search();
            Ok(Effect::Search { generation, query })
        }
        Intent::ClearSearchResults => {
            model.clear_search_results();
            Ok(Effect::None)
        }
        Intent::TogglePause => toggle_pause(model),
        Intent::OpenDrawer(tab) => {
            model.open_drawer(tab);
            Ok(Effect::None)
        }
        Intent::CloseDrawer => {
            model.close_drawer();
            Ok(Effect::None)
        }
        Intent::SetDrawerTab(tab) => {
            model.set_drawer_tab(tab)?;
            Ok(Effect::None)
        }
        Intent::DrawerSelectFavorite(index) => {
            model.select_favorite_from_drawer(index).map(Effect::play)
        }
        Intent::DrawerSelectPlaylist(playlist) => {
            model.close_drawer();
            select_playlist(model, &playlist)
        }
        Intent::DismissNotice => {
            model.dismiss_notice();
            Ok(Effect::None)
        }
        Intent::Quit => {
            tracing::info!("Quit requested");
            model.set_should_quit(true);
            Ok(Effect::None)
        }
    }
}

fn play_song(model: &mut AppModel, song: &Song, content_type: Tab) -> CoreResult<Effect> {
    let list = model.list_for(content_type)?;
    let index = model.locate(&list, &song.id)?;

    // The play button of the current song doubles as pause
    if model.is_now_playing(&list, &song.id) {
        return match model.playback().phase() {
            PlaybackPhase::Playing | PlaybackPhase::Paused => toggle_pause(model),
            _ => Err(CoreError::InvalidTransition {
                action: "restart a song",
                state: "loading it",
            }),
        };
    }

    model.select_song(&list, index).map(Effect::play)
}

fn toggle_pause(model: &mut AppModel) -> CoreResult<Effect> {
    Ok(match model.toggle_pause()? {
        PlaybackPhase::Paused => Effect::Pause,
        _ => Effect::Resume,
    })
}

fn begin_favorite(model: &mut AppModel, list: ListKind, song: Song) -> CoreResult<Effect> {
    if !model.library().contains(&list, &song.id) {
        return Err(CoreError::song_not_found(&song.id));
    }
    let guard = model.begin_row(&list, &song.id).ok_or(CoreError::InvalidTransition {
        action: "toggle favorite",
        state: "a change is pending",
    })?;
    let favorite = !model.library().is_favorite(&song.id);
    Ok(Effect::PersistFavorite {
        list,
        song,
        favorite,
        guard,
    })
}

fn select_playlist(model: &mut AppModel, playlist: &Playlist) -> CoreResult<Effect> {
    let playlist_id = playlist.id.clone();
    tracing::info!(%playlist_id, "Opening playlist");
    if !model.open_playlist(&playlist_id)? {
        return Ok(Effect::None);
    }
    let generation = model.begin_playlist_fetch();
    Ok(Effect::FetchPlaylist {
        generation,
        playlist_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::test_support::*;

    fn search_model(ids: &[&str]) -> AppModel {
        let mut model = AppModel::new();
        let generation = model.begin_search();
        model.apply_search_results(generation, "q".into(), songs(ids));
        model
    }

    #[test]
    fn play_song_locates_by_id() {
        let mut model = search_model(&["a", "b", "c"]);
        let effect = apply_intent(
            &mut model,
            Intent::PlaySong {
                song: song("c"),
                content_type: Tab::Search,
            },
        )
        .unwrap();

        assert!(matches!(effect, Effect::Play { ref song, .. } if song.id == "c"));
        assert_eq!(model.playback().current_song_index(), Some(2));
    }

    #[test]
    fn play_song_for_unknown_id_is_not_found() {
        let mut model = search_model(&["a"]);
        let result = apply_intent(
            &mut model,
            Intent::PlaySong {
                song: song("zz"),
                content_type: Tab::Search,
            },
        );
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
        assert_eq!(model.playback().phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn second_favorite_toggle_on_pending_row_is_rejected() {
        let mut model = search_model(&["a"]);
        let intent = Intent::ToggleFavorite {
            song: song("a"),
            index: 0,
        };

        let first = apply_intent(&mut model, intent.clone()).unwrap();
        assert!(matches!(first, Effect::PersistFavorite { favorite: true, .. }));
        assert!(matches!(
            apply_intent(&mut model, intent.clone()),
            Err(CoreError::InvalidTransition { .. })
        ));

        drop(first);
        assert!(apply_intent(&mut model, intent).is_ok(), "released with the effect");
    }

    #[test]
    fn back_without_open_playlist_is_invalid() {
        let mut model = AppModel::new();
        assert!(matches!(
            apply_intent(&mut model, Intent::PlaylistBack),
            Err(CoreError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn blank_search_clears_results() {
        let mut model = search_model(&["a"]);
        let effect = apply_intent(&mut model, Intent::Search("   ".into())).unwrap();
        assert!(matches!(effect, Effect::None));
        assert!(model.library().search_results().is_empty());
    }

    #[test]
    fn already_loaded_playlist_is_not_fetched_again() {
        let mut model = AppModel::new();
        model.seed_library(vec![playlist("p", 2)], Vec::new());
        let effect = apply_intent(&mut model, Intent::PlaylistSelect(playlist("p", 2))).unwrap();
        assert!(matches!(effect, Effect::None));

        let mut empty = AppModel::new();
        empty.seed_library(vec![playlist("p", 0)], Vec::new());
        let effect = apply_intent(&mut empty, Intent::PlaylistSelect(playlist("p", 0))).unwrap();
        assert!(matches!(effect, Effect::FetchPlaylist { ref playlist_id, .. } if playlist_id == "p"));
        assert!(empty.ui().is_loading);
    }

    #[test]
    fn selecting_playlist_outside_library_is_not_found() {
        let mut model = AppModel::new();
        let result = apply_intent(&mut model, Intent::PlaylistSelect(playlist("p", 2)));

        assert!(matches!(result, Err(CoreError::NotFound { .. })));
        assert!(model.library().list_playlists().is_empty());
        assert!(model.playback().open_playlist_id().is_none());
    }
}
