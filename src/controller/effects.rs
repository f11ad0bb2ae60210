//! Backend calls behind intents and how their results land in the model

use chrono::Utc;

use crate::error::CoreError;
use crate::log_backend_result;
use crate::model::PlaybackPhase;
use super::intents::Effect;
use super::AppController;

impl AppController {
    /// Run `effect` against the backends. The model lock is only taken once
    /// the backend call has resolved.
    pub(crate) async fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Play { attempt, song } => {
                let result = self.player.play(attempt, &song).await;
                log_backend_result!("play", result);
                if let Err(e) = result {
                    let mut model = self.model.lock().await;
                    if model.rollback_attempt(attempt) {
                        model.raise(&CoreError::backend("play", &e), Utc::now());
                    } else {
                        tracing::debug!(attempt, song_id = %song.id, "Failed play was already superseded");
                    }
                }
            }
            Effect::Pause => {
                let result = self.player.pause().await;
                log_backend_result!("pause", result);
                if let Err(e) = result {
                    self.revert_pause(PlaybackPhase::Paused, "pause", &e).await;
                }
            }
            Effect::Resume => {
                let result = self.player.resume().await;
                log_backend_result!("resume", result);
                if let Err(e) = result {
                    self.revert_pause(PlaybackPhase::Playing, "resume", &e).await;
                }
            }
            Effect::PersistFavorite {
                list,
                song,
                favorite,
                guard,
            } => {
                let result = self.library.set_favorite(&song.id, favorite).await;
                log_backend_result!("set favorite", result);

                let mut model = self.model.lock().await;
                match result {
                    Ok(()) => match model.apply_favorite(&list, &song, favorite) {
                        Ok(changed) => {
                            tracing::info!(song_id = %song.id, favorite, changed, "Favorite persisted")
                        }
                        Err(e) => model.raise(&e, Utc::now()),
                    },
                    Err(e) => model.raise(&CoreError::backend("update favorites", &e), Utc::now()),
                }
                // Cleared under the lock so the next snapshot sees it together with the store
                drop(guard);
            }
            Effect::Search { generation, query } => {
                let result = self.library.search(&query, self.settings.search_limit).await;
                log_backend_result!("search", result);

                let mut model = self.model.lock().await;
                match result {
                    Ok(songs) => {
                        let count = songs.len();
                        if model.apply_search_results(generation, query, songs) {
                            tracing::info!(results = count, "Search results applied");
                        }
                    }
                    Err(e) => model.fail_search(generation, &CoreError::backend("search", &e), Utc::now()),
                }
            }
            Effect::FetchPlaylist {
                generation,
                playlist_id,
            } => {
                let result = self.library.fetch_playlist(&playlist_id).await;
                log_backend_result!("fetch playlist", result);

                let mut model = self.model.lock().await;
                match result {
                    Ok(playlist) => {
                        model.apply_fetched_playlist(generation, playlist);
                    }
                    Err(e) => model.fail_playlist_fetch(
                        generation,
                        &CoreError::backend("load playlist", &e),
                        Utc::now(),
                    ),
                }
            }
        }
    }

    async fn revert_pause(&self, expected: PlaybackPhase, operation: &'static str, error: &anyhow::Error) {
        let mut model = self.model.lock().await;
        model.revert_pause(expected);
        model.raise(&CoreError::backend(operation, error), Utc::now());
    }
}
